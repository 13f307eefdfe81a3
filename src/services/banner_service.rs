use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::banners::{CreateHeroBannerRequest, HeroBannerList, UpdateHeroBannerRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::HeroBanner,
    response::{ApiResponse, Meta},
};

pub async fn list_banners(pool: &DbPool) -> AppResult<ApiResponse<HeroBannerList>> {
    let items = sqlx::query_as::<_, HeroBanner>(
        "SELECT * FROM hero_banners WHERE is_active = TRUE ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "Banners",
        HeroBannerList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_banner(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateHeroBannerRequest,
) -> AppResult<ApiResponse<HeroBanner>> {
    ensure_admin(user)?;
    if payload.title.trim().is_empty() || payload.image_url.trim().is_empty() {
        return Err(AppError::Validation(
            "title and imageUrl are required".into(),
        ));
    }

    let banner = sqlx::query_as::<_, HeroBanner>(
        "INSERT INTO hero_banners (id, title, image_url, link_url) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.title.trim())
    .bind(payload.image_url.trim())
    .bind(payload.link_url)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Banner created", banner, None))
}

pub async fn update_banner(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateHeroBannerRequest,
) -> AppResult<ApiResponse<HeroBanner>> {
    ensure_admin(user)?;
    let existing = sqlx::query_as::<_, HeroBanner>("SELECT * FROM hero_banners WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)?;

    let title = payload.title.unwrap_or(existing.title);
    let image_url = payload.image_url.unwrap_or(existing.image_url);
    let link_url = payload.link_url.or(existing.link_url);
    let is_active = payload.is_active.unwrap_or(existing.is_active);

    let banner = sqlx::query_as::<_, HeroBanner>(
        r#"
        UPDATE hero_banners
        SET title = $2, image_url = $3, link_url = $4, is_active = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(image_url)
    .bind(link_url)
    .bind(is_active)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Banner updated", banner, None))
}

pub async fn delete_banner(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("DELETE FROM hero_banners WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Banner deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
