use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use uuid::Uuid;

use crate::{
    dto::banners::{CreateHeroBannerRequest, HeroBannerList, UpdateHeroBannerRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::HeroBanner,
    response::ApiResponse,
    services::banner_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_banners).post(create_banner))
        .route("/{id}", put(update_banner))
        .route("/{id}", delete(delete_banner))
}

#[utoipa::path(
    get,
    path = "/api/banners",
    responses(
        (status = 200, description = "List active hero banners", body = ApiResponse<HeroBannerList>)
    ),
    tag = "Banners"
)]
pub async fn list_banners(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HeroBannerList>>> {
    let resp = banner_service::list_banners(&state.pool).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/banners",
    request_body = CreateHeroBannerRequest,
    responses(
        (status = 200, description = "Create hero banner (admin only)", body = ApiResponse<HeroBanner>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn create_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateHeroBannerRequest>,
) -> AppResult<Json<ApiResponse<HeroBanner>>> {
    let resp = banner_service::create_banner(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/banners/{id}",
    params(
        ("id" = Uuid, Path, description = "Banner ID")
    ),
    request_body = UpdateHeroBannerRequest,
    responses(
        (status = 200, description = "Updated hero banner (admin only)", body = ApiResponse<HeroBanner>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Banner not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn update_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHeroBannerRequest>,
) -> AppResult<Json<ApiResponse<HeroBanner>>> {
    let resp = banner_service::update_banner(&state.pool, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/banners/{id}",
    params(
        ("id" = Uuid, Path, description = "Banner ID")
    ),
    responses(
        (status = 200, description = "Deleted hero banner (admin only)"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Banner not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Banners"
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = banner_service::delete_banner(&state.pool, &user, id).await?;
    Ok(Json(resp))
}
