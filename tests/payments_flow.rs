mod common;

use axum_marketplace_api::{
    dto::{
        cart::AddToCartRequest,
        payments::{CreatePaymentAttemptRequest, UpdatePaymentStatusRequest},
    },
    error::AppError,
    services::{cart_service, payment_service},
};

// Payment attempt lifecycle around checkout: created pending, cancelable
// while pending, and refusing bad transitions.
#[tokio::test]
async fn payment_attempt_lifecycle() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let buyer = common::create_user(&state, "user", "buyer@example.com").await?;
    let admin = common::create_user(&state, "admin", "admin@example.com").await?;
    let category = common::create_category(&state, "Grains").await?;
    let product_id = common::create_product(&state, category, "Rice", 900, 20).await?;

    let cart_item = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id,
            quantity: 2,
        },
    )
    .await?
    .data
    .unwrap();

    // Rejected shapes first.
    let no_refs = payment_service::create_payment_attempt(
        &state,
        &buyer,
        CreatePaymentAttemptRequest {
            amount: 1800,
            currency: None,
            cart_id: None,
            product_id: None,
            quantity: None,
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(no_refs, Err(AppError::Validation(_))));

    let bad_amount = payment_service::create_payment_attempt(
        &state,
        &buyer,
        CreatePaymentAttemptRequest {
            amount: 0,
            currency: None,
            cart_id: Some(vec![cart_item.id]),
            product_id: None,
            quantity: None,
            payment_method: None,
        },
    )
    .await;
    assert!(matches!(bad_amount, Err(AppError::Validation(_))));

    let created = payment_service::create_payment_attempt(
        &state,
        &buyer,
        CreatePaymentAttemptRequest {
            amount: 1800,
            currency: Some("USD".into()),
            cart_id: Some(vec![cart_item.id]),
            product_id: None,
            quantity: Some(2),
            payment_method: Some("Online".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.status, "pending");
    assert!(created.payment_id.starts_with("PAY-"));

    // An abandoned pending attempt stays queryable and cancelable.
    let fetched = payment_service::get_payment_attempt(&state, &buyer, created.payment_attempt_id)
        .await?
        .data
        .unwrap();
    assert_eq!(fetched.payment_id, created.payment_id);

    let mine = payment_service::list_my_payment_attempts(&state, &buyer)
        .await?
        .data
        .unwrap();
    assert_eq!(mine.items.len(), 1);

    let all = payment_service::list_all_payment_attempts(&state, &admin)
        .await?
        .data
        .unwrap();
    assert_eq!(all.items.len(), 1);
    // Non-admins cannot list everything.
    assert!(matches!(
        payment_service::list_all_payment_attempts(&state, &buyer).await,
        Err(AppError::Forbidden)
    ));

    let bad_status = payment_service::update_payment_status(
        &state,
        &admin,
        UpdatePaymentStatusRequest {
            payment_attempt_id: created.payment_attempt_id,
            status: "succeeded".into(),
            notes: None,
        },
    )
    .await;
    assert!(matches!(bad_status, Err(AppError::Validation(_))));

    let cancelled =
        payment_service::cancel_payment_attempt(&state, &buyer, created.payment_attempt_id)
            .await?
            .data
            .unwrap();
    assert_eq!(cancelled.status, "cancelled");

    // Cancelling twice is rejected: the attempt is no longer pending.
    let again =
        payment_service::cancel_payment_attempt(&state, &buyer, created.payment_attempt_id).await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));

    Ok(())
}
