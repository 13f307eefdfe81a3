mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use axum_marketplace_api::{
    dto::{cart::AddToCartRequest, orders::BuyProductRequest},
    entity::{
        listings::Entity as Listings,
        notifications::{Column as NotificationCol, Entity as Notifications},
        orders::Entity as Orders,
        products::Entity as Products,
    },
    error::AppError,
    services::{cart_service, order_service},
};

// Listing-backed checkout plus the oversell race: two buyers contending for
// the last unit, at most one wins and stock never goes negative.
#[tokio::test]
async fn concurrent_checkouts_cannot_oversell() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::create_user(&state, "user", "seller@example.com").await?;
    let alice = common::create_user(&state, "user", "alice@example.com").await?;
    let bob = common::create_user(&state, "user", "bob@example.com").await?;
    let category = common::create_category(&state, "Fruits").await?;
    let product_id = common::create_product(&state, category, "Apples", 300, 50).await?;

    // One unit left on the seller's listing.
    let listing_id =
        common::create_listing(&state, &seller, product_id, category, Some(400), 1).await?;

    let alice_item = cart_service::add_to_cart(
        &state,
        &alice,
        AddToCartRequest {
            product_id: listing_id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();
    let bob_item = cart_service::add_to_cart(
        &state,
        &bob,
        AddToCartRequest {
            product_id: listing_id,
            quantity: 1,
        },
    )
    .await?
    .data
    .unwrap();

    // Listing price, not catalog price, governs the line total.
    assert_eq!(alice_item.total_amount, 400);

    let state_a = state.clone();
    let state_b = state.clone();
    let alice_task = tokio::spawn(async move {
        order_service::place_order(
            &state_a,
            &alice,
            BuyProductRequest {
                cart_id: vec![alice_item.id],
                payment_intent: None,
                payment_attempt_id: None,
                delivery_address: common::test_address(),
            },
        )
        .await
    });
    let bob_task = tokio::spawn(async move {
        order_service::place_order(
            &state_b,
            &bob,
            BuyProductRequest {
                cart_id: vec![bob_item.id],
                payment_intent: None,
                payment_attempt_id: None,
                delivery_address: common::test_address(),
            },
        )
        .await
    });

    let (alice_result, bob_result) = (alice_task.await?, bob_task.await?);
    let winners = [&alice_result, &bob_result]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(winners, 1, "exactly one racing checkout may win the last unit");

    for result in [alice_result, bob_result] {
        if let Err(err) = result {
            assert!(matches!(err, AppError::InsufficientStock { .. }));
        }
    }

    let listing = Listings::find_by_id(listing_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(listing.quantity, 0, "stock must never go negative");

    assert_eq!(Orders::find().count(&state.orm).await?, 1);

    // The winning order carries the seller context from the listing.
    let order = Orders::find().one(&state.orm).await?.unwrap();
    assert_eq!(order.seller_id, Some(seller.user_id));
    assert_eq!(order.listing_id, Some(listing_id));
    assert_eq!(order.product_id, Some(product_id));
    assert_eq!(order.total_amount, 400);

    // Catalog stock is untouched by a listing sale.
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(product.stock_quantity, 50);

    // The seller was notified about the purchase.
    let seller_notes = Notifications::find()
        .filter(NotificationCol::UserId.eq(seller.user_id))
        .count(&state.orm)
        .await?;
    assert!(seller_notes >= 1);

    Ok(())
}
