use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::notifications::{MarkReadRequest, NotificationList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Notification,
    response::ApiResponse,
    services::notification_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/read", post(mark_notification_read))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications for the caller, newest first", body = ApiResponse<NotificationList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<NotificationList>>> {
    let resp = notification_service::list_notifications(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read",
    request_body = MarkReadRequest,
    responses(
        (status = 200, description = "Notification marked read", body = ApiResponse<Notification>),
        (status = 404, description = "Notification not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<MarkReadRequest>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let resp = notification_service::mark_notification_read(&state, &user, payload).await?;
    Ok(Json(resp))
}
