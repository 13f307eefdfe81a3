mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use axum_marketplace_api::{
    dto::{
        cart::AddToCartRequest,
        orders::BuyProductRequest,
        payments::CreatePaymentAttemptRequest,
    },
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        orders::Entity as Orders,
        payment_attempts::Entity as PaymentAttempts,
        products::Entity as Products,
    },
    error::AppError,
    services::{cart_service, order_service, payment_service},
};

// Catalog checkout: stock decrement, cart deactivation, order creation and
// payment-attempt reconciliation all land together; failures leave nothing
// behind; a replay with consumed ids is a no-op.
#[tokio::test]
async fn checkout_decrements_stock_and_creates_orders() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let buyer = common::create_user(&state, "user", "buyer@example.com").await?;
    let category = common::create_category(&state, "Vegetables").await?;
    let product_id = common::create_product(&state, category, "Tomatoes", 250, 5).await?;

    // Quantity 3 of 5 in stock.
    let added = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id,
            quantity: 3,
        },
    )
    .await?;
    let cart_item = added.data.unwrap();
    assert_eq!(cart_item.total_amount, 750);

    let attempt = payment_service::create_payment_attempt(
        &state,
        &buyer,
        CreatePaymentAttemptRequest {
            amount: 750,
            currency: None,
            cart_id: Some(vec![cart_item.id]),
            product_id: None,
            quantity: Some(3),
            payment_method: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(attempt.status, "pending");

    let resp = order_service::place_order(
        &state,
        &buyer,
        BuyProductRequest {
            cart_id: vec![cart_item.id],
            payment_intent: Some("pi_test".into()),
            payment_attempt_id: Some(attempt.payment_attempt_id),
            delivery_address: common::test_address(),
        },
    )
    .await?;

    let orders = resp.data.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0].order;
    assert_eq!(order.quantity, 3);
    assert_eq!(order.total_amount, 750);
    assert_eq!(order.status, "initialized");
    assert_eq!(order.cart_item_id, cart_item.id);
    assert_eq!(order.product_id, Some(product_id));

    // Stock went from 5 to 2.
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(product.stock_quantity, 2);

    // The consumed cart item is inactive but still present.
    let consumed = CartItems::find_by_id(cart_item.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert!(!consumed.is_active);

    // The payment attempt was reconciled.
    let attempt = PaymentAttempts::find_by_id(attempt.payment_attempt_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(attempt.status, "completed");
    assert_eq!(attempt.order_id, Some(order.id));
    let metadata = attempt.metadata.unwrap();
    assert_eq!(
        metadata["orderIds"][0].as_str().unwrap(),
        order.id.to_string()
    );

    // Replaying the same ids finds no active items and creates nothing new.
    let replay = order_service::place_order(
        &state,
        &buyer,
        BuyProductRequest {
            cart_id: vec![cart_item.id],
            payment_intent: None,
            payment_attempt_id: None,
            delivery_address: common::test_address(),
        },
    )
    .await;
    assert!(matches!(replay, Err(AppError::Validation(_))));
    assert_eq!(Orders::find().count(&state.orm).await?, 1);

    // Asking for more than what is left aborts and changes nothing.
    let second = cart_service::add_to_cart(
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
    // Shrink the stock underneath the cart item.
    let scarce = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();
    order_service::place_order(
        &state,
        &buyer,
        BuyProductRequest {
            cart_id: vec![scarce.id],
            payment_intent: None,
            payment_attempt_id: None,
            delivery_address: common::test_address(),
        },
    )
    .await?;
    // Stock is now 1 while `second` still wants 2.
    let failed = order_service::place_order(
        &state,
        &buyer,
        BuyProductRequest {
            cart_id: vec![second.id],
            payment_intent: None,
            payment_attempt_id: None,
            delivery_address: common::test_address(),
        },
    )
    .await;
    assert!(matches!(failed, Err(AppError::InsufficientStock { .. })));

    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(product.stock_quantity, 1, "failed checkout must not decrement");

    let still_active = CartItems::find()
        .filter(CartCol::Id.eq(second.id))
        .filter(CartCol::IsActive.eq(true))
        .one(&state.orm)
        .await?;
    assert!(still_active.is_some(), "failed checkout must not consume the cart item");

    assert_eq!(Orders::find().count(&state.orm).await?, 2);

    Ok(())
}
