use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::payments::{
        CreatePaymentAttemptRequest, PaymentAttemptCreated, PaymentAttemptList,
        UpdatePaymentStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::PaymentAttempt,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_payment_attempt))
        .route("/update-status", patch(update_payment_status))
        .route("/all", get(list_all_payment_attempts))
        .route("/user", get(list_my_payment_attempts))
        .route("/{id}", get(get_payment_attempt))
        .route("/{id}/cancel", patch(cancel_payment_attempt))
}

#[utoipa::path(
    post,
    path = "/api/payments/create",
    request_body = CreatePaymentAttemptRequest,
    responses(
        (status = 200, description = "Payment attempt created", body = ApiResponse<PaymentAttemptCreated>),
        (status = 400, description = "Invalid amount or missing references"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment_attempt(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentAttemptRequest>,
) -> AppResult<Json<ApiResponse<PaymentAttemptCreated>>> {
    let resp = payment_service::create_payment_attempt(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/payments/update-status",
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated", body = ApiResponse<PaymentAttempt>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Payment attempt not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<PaymentAttempt>>> {
    let resp = payment_service::update_payment_status(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/all",
    responses(
        (status = 200, description = "All payment attempts (admin only)", body = ApiResponse<PaymentAttemptList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_all_payment_attempts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentAttemptList>>> {
    let resp = payment_service::list_all_payment_attempts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/user",
    responses(
        (status = 200, description = "Payment attempts for the caller", body = ApiResponse<PaymentAttemptList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn list_my_payment_attempts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PaymentAttemptList>>> {
    let resp = payment_service::list_my_payment_attempts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(
        ("id" = Uuid, Path, description = "Payment attempt ID")
    ),
    responses(
        (status = 200, description = "Payment attempt", body = ApiResponse<PaymentAttempt>),
        (status = 404, description = "Payment attempt not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_payment_attempt(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentAttempt>>> {
    let resp = payment_service::get_payment_attempt(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/payments/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Payment attempt ID")
    ),
    responses(
        (status = 200, description = "Payment attempt cancelled", body = ApiResponse<PaymentAttempt>),
        (status = 400, description = "Attempt is no longer pending"),
        (status = 404, description = "Payment attempt not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn cancel_payment_attempt(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentAttempt>>> {
    let resp = payment_service::cancel_payment_attempt(&state, &user, id).await?;
    Ok(Json(resp))
}
