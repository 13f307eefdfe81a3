use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        CategoryBrief, ProductBrief,
        cart::{
            AddToCartRequest, CartItemDto, CartList, DeleteCartItemsRequest, ListingBrief,
            UpdateCartItemsRequest,
        },
    },
    entity::{
        cart_items::{
            ActiveModel as CartItemActive, Column as CartCol, Entity as CartItems,
            Model as CartItemModel,
        },
        listings::Entity as Listings,
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, InventoryRef},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct CartRow {
    cart_id: Uuid,
    quantity: i32,
    total_amount: i64,
    listing_id: Option<Uuid>,
    seller_id: Option<Uuid>,
    listing_price: Option<i64>,
    listing_quantity: Option<i32>,
    listing_unit: Option<String>,
    product_id: Option<Uuid>,
    product_name: Option<String>,
    image_url: Option<String>,
    category_id: Option<Uuid>,
    category_name: Option<String>,
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = sqlx::query_as::<_, CartRow>(
        r#"
        SELECT ci.id AS cart_id, ci.quantity, ci.total_amount,
               l.id AS listing_id, l.seller_id, l.price AS listing_price,
               l.quantity AS listing_quantity, l.unit AS listing_unit,
               p.id AS product_id, p.name AS product_name, p.image_url,
               c.id AS category_id, c.name AS category_name
        FROM cart_items ci
        LEFT JOIN listings l ON l.id = ci.listing_id
        LEFT JOIN products p ON p.id = ci.product_id
        LEFT JOIN categories c ON c.id = ci.category_id
        WHERE ci.user_id = $1 AND ci.is_active = TRUE
        ORDER BY ci.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| CartItemDto {
            id: row.cart_id,
            quantity: row.quantity,
            total_amount: row.total_amount,
            listing: row.listing_id.map(|id| ListingBrief {
                id,
                seller_id: row.seller_id.unwrap_or_default(),
                price: row.listing_price,
                quantity: row.listing_quantity.unwrap_or_default(),
                unit: row.listing_unit.clone().unwrap_or_default(),
            }),
            product: row.product_id.map(|id| ProductBrief {
                id,
                name: row.product_name.clone().unwrap_or_default(),
                image_url: row.image_url.clone(),
            }),
            category: row.category_id.map(|id| CategoryBrief {
                id,
                name: row.category_name.clone().unwrap_or_default(),
            }),
        })
        .collect();

    Ok(ApiResponse::success(
        "OK",
        CartList { items },
        Some(Meta::empty()),
    ))
}

/// Resolve the reference (listings probed first, then the catalog), validate
/// price and current stock, snapshot the line total, and persist the item.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let listing = Listings::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;

    let item = if let Some(listing) = listing {
        let price = listing
            .price
            .ok_or_else(|| AppError::InvalidState("Listing price not set".to_string()))?;
        if listing.quantity < payload.quantity {
            return Err(AppError::InvalidState(format!(
                "Insufficient stock for listing {}",
                listing.id
            )));
        }
        let total_amount = price * payload.quantity as i64;

        CartItemActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            listing_id: Set(Some(listing.id)),
            product_id: Set(listing.product_id),
            category_id: Set(listing.category_id),
            quantity: Set(payload.quantity),
            total_amount: Set(total_amount),
            is_active: Set(true),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    } else {
        let product = Products::find_by_id(payload.product_id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;
        if product.stock_quantity < payload.quantity {
            return Err(AppError::InvalidState(format!(
                "Insufficient stock for product {}",
                product.id
            )));
        }
        let total_amount = product.price * payload.quantity as i64;

        CartItemActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            listing_id: Set(None),
            product_id: Set(Some(product.id)),
            category_id: Set(Some(product.category_id)),
            quantity: Set(payload.quantity),
            total_amount: Set(total_amount),
            is_active: Set(true),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "cartItemId": item.id, "quantity": item.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Cart added successfully",
        cart_item_from_entity(item),
        None,
    ))
}

/// Recompute the line from the current inventory snapshot. The stock check
/// here is advisory; checkout's conditional decrement is the authoritative
/// one, so a race between update and checkout is acceptable.
pub async fn update_cart_items(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateCartItemsRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let item = CartItems::find()
        .filter(CartCol::Id.eq(payload.id))
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let inventory = InventoryRef::resolve(item.listing_id, item.product_id).ok_or_else(|| {
        AppError::InvalidState(format!("cart item {} has no inventory reference", item.id))
    })?;

    let unit_price = match inventory {
        InventoryRef::Listing(listing_id) => {
            let listing = Listings::find_by_id(listing_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            if listing.quantity < payload.quantity {
                return Err(AppError::InvalidState(format!(
                    "Insufficient stock for listing {listing_id}"
                )));
            }
            listing
                .price
                .ok_or_else(|| AppError::InvalidState("Listing price not set".to_string()))?
        }
        InventoryRef::CatalogProduct(product_id) => {
            let product = Products::find_by_id(product_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            if product.stock_quantity < payload.quantity {
                return Err(AppError::InvalidState(format!(
                    "Insufficient stock for product {product_id}"
                )));
            }
            product.price
        }
    };

    let mut active: CartItemActive = item.into();
    active.quantity = Set(payload.quantity);
    active.total_amount = Set(unit_price * payload.quantity as i64);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "cartItemId": updated.id, "quantity": updated.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "OK",
        cart_item_from_entity(updated),
        None,
    ))
}

/// Explicit removal flips the item inactive rather than deleting the row, so
/// orders that may reference it keep a resolvable target.
pub async fn delete_cart_items(
    state: &AppState,
    user: &AuthUser,
    payload: DeleteCartItemsRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let item = CartItems::find()
        .filter(CartCol::Id.eq(payload.id))
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CartItemActive = item.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now().into());
    let removed = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cartItemId": removed.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Cart deleted successfully",
        cart_item_from_entity(removed),
        Some(Meta::empty()),
    ))
}

pub fn cart_item_from_entity(model: CartItemModel) -> CartItem {
    CartItem {
        id: model.id,
        user_id: model.user_id,
        listing_id: model.listing_id,
        product_id: model.product_id,
        category_id: model.category_id,
        quantity: model.quantity,
        total_amount: model.total_amount,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
