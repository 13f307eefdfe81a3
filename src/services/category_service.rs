use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    response::{ApiResponse, Meta},
};

pub async fn list_categories(pool: &DbPool) -> AppResult<ApiResponse<CategoryList>> {
    let items = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(payload.name.trim())
        .fetch_optional(pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::Validation("Category already exists".into()));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(payload.name.trim())
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Category updated",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
