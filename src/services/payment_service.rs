use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{
        CreatePaymentAttemptRequest, PaymentAttemptCreated, PaymentAttemptList,
        UpdatePaymentStatusRequest,
    },
    entity::{
        cart_items::Entity as CartItems,
        payment_attempts::{
            ActiveModel as PaymentAttemptActive, Column as AttemptCol, Entity as PaymentAttempts,
            Model as PaymentAttemptModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::PaymentAttempt,
    response::{ApiResponse, Meta},
    state::AppState,
};

const PAYMENT_STATUSES: [&str; 5] = ["pending", "processing", "completed", "failed", "cancelled"];
const PAYMENT_METHODS: [&str; 4] = ["COD", "Online", "Bank Transfer", "Cash"];

/// Pre-checkout boundary: records the client's declared payment intent. The
/// returned id is fed back into checkout, which reconciles the attempt.
pub async fn create_payment_attempt(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentAttemptRequest,
) -> AppResult<ApiResponse<PaymentAttemptCreated>> {
    if payload.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }

    let cart_ids = payload.cart_id.clone().unwrap_or_default();
    if cart_ids.is_empty() && payload.product_id.is_none() {
        return Err(AppError::Validation(
            "either cartId or productId is required".into(),
        ));
    }

    let payment_method = payload.payment_method.unwrap_or_else(|| "COD".to_string());
    if !PAYMENT_METHODS.contains(&payment_method.as_str()) {
        return Err(AppError::Validation("Invalid payment method".into()));
    }

    if let Some(first) = cart_ids.first() {
        let exists = CartItems::find_by_id(*first).one(&state.orm).await?;
        if exists.is_none() {
            return Err(AppError::Validation("Invalid cart item".into()));
        }
    }

    let metadata = (!cart_ids.is_empty())
        .then(|| serde_json::json!({ "cartItemIds": cart_ids }));

    let attempt = PaymentAttemptActive {
        id: Set(Uuid::new_v4()),
        payment_id: Set(build_payment_id()),
        amount: Set(payload.amount),
        currency: Set(payload.currency.unwrap_or_else(|| "USD".to_string())),
        status: Set("pending".into()),
        payment_method: Set(payment_method),
        buyer_id: Set(user.user_id),
        order_id: Set(None),
        metadata: Set(metadata),
        error_message: Set(None),
        notes: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_attempt_create",
        Some("payment_attempts"),
        Some(serde_json::json!({ "paymentAttemptId": attempt.id, "amount": attempt.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let data = PaymentAttemptCreated {
        payment_id: attempt.payment_id,
        payment_attempt_id: attempt.id,
        amount: attempt.amount,
        currency: attempt.currency,
        status: attempt.status,
        payment_method: attempt.payment_method,
    };

    Ok(ApiResponse::success(
        "Payment attempt created successfully",
        data,
        None,
    ))
}

pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<PaymentAttempt>> {
    if !PAYMENT_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::Validation("Invalid payment status".into()));
    }

    let attempt = PaymentAttempts::find_by_id(payload.payment_attempt_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if attempt.buyer_id != user.user_id && user.role != "admin" {
        return Err(AppError::Forbidden);
    }

    let mut active: PaymentAttemptActive = attempt.into();
    active.status = Set(payload.status.clone());
    if payload.notes.is_some() {
        active.notes = Set(payload.notes.clone());
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_status_update",
        Some("payment_attempts"),
        Some(serde_json::json!({ "paymentAttemptId": updated.id, "status": updated.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment status updated successfully",
        payment_attempt_from_entity(updated),
        None,
    ))
}

pub async fn list_all_payment_attempts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentAttemptList>> {
    ensure_admin(user)?;

    let items = PaymentAttempts::find()
        .order_by_desc(AttemptCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_attempt_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PaymentAttemptList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_my_payment_attempts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentAttemptList>> {
    let items = PaymentAttempts::find()
        .filter(AttemptCol::BuyerId.eq(user.user_id))
        .order_by_desc(AttemptCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_attempt_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        PaymentAttemptList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_payment_attempt(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentAttempt>> {
    let attempt = PaymentAttempts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if attempt.buyer_id != user.user_id && user.role != "admin" {
        return Err(AppError::Forbidden);
    }

    Ok(ApiResponse::success(
        "Ok",
        payment_attempt_from_entity(attempt),
        None,
    ))
}

/// Abandoned flows stay queryable and cancelable while still pending.
pub async fn cancel_payment_attempt(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentAttempt>> {
    let attempt = PaymentAttempts::find()
        .filter(AttemptCol::Id.eq(id))
        .filter(AttemptCol::BuyerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if attempt.status != "pending" {
        return Err(AppError::InvalidState(
            "Only pending payment attempts can be cancelled".into(),
        ));
    }

    let mut active: PaymentAttemptActive = attempt.into();
    active.status = Set("cancelled".into());
    active.updated_at = Set(Utc::now().into());
    let cancelled = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_attempt_cancel",
        Some("payment_attempts"),
        Some(serde_json::json!({ "paymentAttemptId": cancelled.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment attempt cancelled",
        payment_attempt_from_entity(cancelled),
        None,
    ))
}

fn build_payment_id() -> String {
    let date = Utc::now().format("%Y%m%d%H%M%S");
    let suffix = Uuid::new_v4().to_string();
    let short = &suffix[..8];
    format!("PAY-{date}-{short}")
}

pub fn payment_attempt_from_entity(model: PaymentAttemptModel) -> PaymentAttempt {
    PaymentAttempt {
        id: model.id,
        payment_id: model.payment_id,
        amount: model.amount,
        currency: model.currency,
        status: model.status,
        payment_method: model.payment_method,
        buyer_id: model.buyer_id,
        order_id: model.order_id,
        metadata: model.metadata,
        error_message: model.error_message,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
