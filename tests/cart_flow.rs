mod common;

use sea_orm::EntityTrait;

use axum_marketplace_api::{
    dto::cart::{AddToCartRequest, DeleteCartItemsRequest, UpdateCartItemsRequest},
    entity::cart_items::Entity as CartItems,
    error::AppError,
    services::cart_service,
};

// Cart mutations: totals are computed server-side from the current unit
// price, unpriced listings are rejected, and explicit delete only flips the
// active flag.
#[tokio::test]
async fn cart_mutations_recompute_totals() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let buyer = common::create_user(&state, "user", "buyer@example.com").await?;
    let seller = common::create_user(&state, "user", "seller@example.com").await?;
    let category = common::create_category(&state, "Dairy").await?;
    let product_id = common::create_product(&state, category, "Milk", 150, 30).await?;

    // Unknown reference.
    let missing = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id: uuid::Uuid::new_v4(),
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // A listing without a price cannot be carted.
    let unpriced =
        common::create_listing(&state, &seller, product_id, category, None, 10).await?;
    let no_price = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id: unpriced,
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(no_price, Err(AppError::InvalidState(_))));

    // Asking for more than the catalog has is rejected at add time.
    let too_many = cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id,
            quantity: 31,
        },
    )
    .await;
    assert!(matches!(too_many, Err(AppError::InvalidState(_))));

    let item = cart_service::add_to_cart(
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
    assert_eq!(item.total_amount, 300);

    // The total is recomputed from the current unit price, never taken from
    // the client.
    let updated = cart_service::update_cart_items(
        &state,
        &buyer,
        UpdateCartItemsRequest {
            id: item.id,
            quantity: 4,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.quantity, 4);
    assert_eq!(updated.total_amount, 600);

    // Another user cannot touch this cart item.
    let foreign = cart_service::update_cart_items(
        &state,
        &seller,
        UpdateCartItemsRequest {
            id: item.id,
            quantity: 1,
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    // Listing the cart shows the single active line.
    let list = cart_service::list_cart(&state, &buyer).await?.data.unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].total_amount, 600);

    // Delete is a soft removal: the row survives, inactive.
    cart_service::delete_cart_items(&state, &buyer, DeleteCartItemsRequest { id: item.id })
        .await?;
    let row = CartItems::find_by_id(item.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert!(!row.is_active);

    let list = cart_service::list_cart(&state, &buyer).await?.data.unwrap();
    assert!(list.items.is_empty());

    // And deleting it again is a NotFound, not a double-flip.
    let again =
        cart_service::delete_cart_items(&state, &buyer, DeleteCartItemsRequest { id: item.id })
            .await;
    assert!(matches!(again, Err(AppError::NotFound)));

    Ok(())
}
