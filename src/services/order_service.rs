use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        AdminOrderList, BuyProductRequest, MyOrdersRequest, OrderDto, OrderList, OrderWithPayment,
        UpdateOrderStatusRequest,
    },
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        listings::{Column as ListingCol, Entity as Listings, Model as ListingModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        payment_attempts::{
            ActiveModel as PaymentAttemptActive, Column as AttemptCol, Entity as PaymentAttempts,
        },
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult, InventorySource},
    middleware::auth::{AuthUser, ensure_admin},
    models::{DeliveryAddress, GeoPoint, InventoryRef, Listing, Order, Product},
    response::{ApiResponse, Meta},
    services::{notification_service, payment_service},
    state::AppState,
};

const ORDER_STATUSES: [&str; 3] = ["initialized", "pending", "complete"];

/// Everything needed to write one order row, captured while its inventory
/// decrement is applied.
struct OrderDraft {
    cart_item_id: Uuid,
    quantity: i32,
    total_amount: i64,
    seller_id: Option<Uuid>,
    listing_id: Option<Uuid>,
    product_id: Option<Uuid>,
    category_id: Option<Uuid>,
}

/// Checkout coordinator. Converts the buyer's active cart items into orders
/// as one transaction: conditional inventory decrements first, then cart
/// deactivation, order inserts and payment-attempt reconciliation. Any
/// failure drops the transaction before commit, so either every step lands
/// or none do.
pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: BuyProductRequest,
) -> AppResult<ApiResponse<Vec<OrderDto>>> {
    payload.validate()?;
    let address = payload.delivery_address.clone();

    let txn = state.orm.begin().await?;

    let items = CartItems::find()
        .filter(CartCol::Id.is_in(payload.cart_id.clone()))
        .filter(CartCol::UserId.eq(user.user_id))
        .filter(CartCol::IsActive.eq(true))
        .all(&txn)
        .await?;

    // Replays with already-consumed ids land here; callers treat this as
    // "already checked out", not a fresh failure.
    if items.is_empty() {
        return Err(AppError::Validation(
            "No active cart items to purchase".into(),
        ));
    }

    let mut drafts = Vec::with_capacity(items.len());
    for item in &items {
        if item.quantity <= 0 {
            return Err(AppError::InvalidState(format!(
                "cart item {} has an invalid quantity",
                item.id
            )));
        }

        let inventory =
            InventoryRef::resolve(item.listing_id, item.product_id).ok_or_else(|| {
                AppError::InvalidState(format!("cart item {} has no inventory reference", item.id))
            })?;

        match inventory {
            InventoryRef::Listing(listing_id) => {
                let listing = Listings::find_by_id(listing_id)
                    .one(&txn)
                    .await?
                    .ok_or(AppError::InsufficientStock {
                        kind: InventorySource::Listing,
                        id: listing_id,
                    })?;

                let update = Listings::update_many()
                    .col_expr(
                        ListingCol::Quantity,
                        Expr::col(ListingCol::Quantity).sub(item.quantity),
                    )
                    .filter(ListingCol::Id.eq(listing_id))
                    .filter(ListingCol::Quantity.gte(item.quantity))
                    .exec(&txn)
                    .await?;
                if update.rows_affected == 0 {
                    tracing::info!(
                        buyer = %user.user_id,
                        cart_item = %item.id,
                        listing = %listing_id,
                        wanted = item.quantity,
                        "checkout aborted: insufficient listing stock"
                    );
                    return Err(AppError::InsufficientStock {
                        kind: InventorySource::Listing,
                        id: listing_id,
                    });
                }

                drafts.push(OrderDraft {
                    cart_item_id: item.id,
                    quantity: item.quantity,
                    total_amount: item.total_amount,
                    seller_id: Some(listing.seller_id),
                    listing_id: Some(listing_id),
                    product_id: item.product_id.or(listing.product_id),
                    category_id: item.category_id.or(listing.category_id),
                });
            }
            InventoryRef::CatalogProduct(product_id) => {
                let update = Products::update_many()
                    .col_expr(
                        ProdCol::StockQuantity,
                        Expr::col(ProdCol::StockQuantity).sub(item.quantity),
                    )
                    .filter(ProdCol::Id.eq(product_id))
                    .filter(ProdCol::StockQuantity.gte(item.quantity))
                    .exec(&txn)
                    .await?;
                if update.rows_affected == 0 {
                    tracing::info!(
                        buyer = %user.user_id,
                        cart_item = %item.id,
                        product = %product_id,
                        wanted = item.quantity,
                        "checkout aborted: insufficient product stock"
                    );
                    return Err(AppError::InsufficientStock {
                        kind: InventorySource::CatalogProduct,
                        id: product_id,
                    });
                }

                drafts.push(OrderDraft {
                    cart_item_id: item.id,
                    quantity: item.quantity,
                    total_amount: item.total_amount,
                    seller_id: None,
                    listing_id: None,
                    product_id: Some(product_id),
                    category_id: item.category_id,
                });
            }
        }
    }

    let consumed: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    CartItems::update_many()
        .col_expr(CartCol::IsActive, Expr::value(false))
        .filter(CartCol::Id.is_in(consumed.clone()))
        .exec(&txn)
        .await?;

    let mut created: Vec<OrderModel> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            seller_id: Set(draft.seller_id),
            cart_item_id: Set(draft.cart_item_id),
            listing_id: Set(draft.listing_id),
            product_id: Set(draft.product_id),
            category_id: Set(draft.category_id),
            quantity: Set(draft.quantity),
            total_amount: Set(draft.total_amount),
            status: Set("initialized".into()),
            payment_intent: Set(payload.payment_intent.clone()),
            payment_method: Set("COD".into()),
            // Settlement happens out of band; orders are accepted as paid here.
            is_paid: Set(true),
            is_active: Set(true),
            address_label: Set(address.label.clone()),
            street: Set(address.street.clone()),
            city: Set(address.city.clone()),
            state: Set(address.state.clone()),
            postal_code: Set(address.postal_code.clone()),
            country: Set(address.country.clone()),
            longitude: Set(address.location.as_ref().map(|p| p.longitude)),
            latitude: Set(address.location.as_ref().map(|p| p.latitude)),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;
        created.push(order);
    }

    if let Some(attempt_id) = payload.payment_attempt_id {
        match PaymentAttempts::find_by_id(attempt_id).one(&txn).await? {
            Some(attempt) => {
                let order_ids: Vec<Uuid> = created.iter().map(|o| o.id).collect();
                let mut active: PaymentAttemptActive = attempt.into();
                active.status = Set("completed".into());
                active.order_id = Set((created.len() == 1).then(|| created[0].id));
                active.metadata = Set(Some(serde_json::json!({ "orderIds": order_ids })));
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?;
            }
            None => {
                tracing::warn!(
                    buyer = %user.user_id,
                    payment_attempt = %attempt_id,
                    "payment attempt not found during checkout, skipping link"
                );
            }
        }
    }

    txn.commit().await?;

    notify_sellers(state, user, &created).await;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({
            "orderIds": created.iter().map(|o| o.id).collect::<Vec<_>>(),
            "cartItemIds": consumed,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let mut orders = Vec::with_capacity(created.len());
    for model in created {
        orders.push(resolve_order(&state.orm, model).await?);
    }

    Ok(ApiResponse::success(
        "Products purchased successfully!",
        orders,
        Some(Meta::empty()),
    ))
}

pub async fn get_my_orders(
    state: &AppState,
    user: &AuthUser,
    payload: MyOrdersRequest,
) -> AppResult<ApiResponse<OrderList>> {
    let column = if payload.is_seller.unwrap_or(false) {
        OrderCol::SellerId
    } else {
        OrderCol::UserId
    };

    let models = Orders::find()
        .filter(column.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(resolve_order(&state.orm, model).await?);
    }

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    if !ORDER_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::Validation("Invalid order status".into()));
    }

    let existing = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.clone());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "orderId": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

/// Admin view: every order, with payment attempt details attached when one
/// was linked by checkout or created against the order.
pub async fn get_all_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminOrderList>> {
    ensure_admin(user)?;

    let models = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        let attempt = PaymentAttempts::find()
            .filter(AttemptCol::OrderId.eq(model.id))
            .one(&state.orm)
            .await?
            .map(payment_service::payment_attempt_from_entity);
        let order = resolve_order(&state.orm, model).await?;
        items.push(OrderWithPayment {
            order,
            payment_attempt: attempt,
        });
    }

    Ok(ApiResponse::success(
        "Ok",
        AdminOrderList { items },
        Some(Meta::empty()),
    ))
}

/// Persist a purchase notification for each legacy-listing seller. Runs after
/// commit; a failure here must not undo the checkout.
async fn notify_sellers(state: &AppState, buyer: &AuthUser, orders: &[OrderModel]) {
    let buyer_name = match Users::find_by_id(buyer.user_id).one(&state.orm).await {
        Ok(Some(user)) => user.full_name,
        _ => "A buyer".to_string(),
    };

    for order in orders {
        let Some(seller_id) = order.seller_id else {
            continue;
        };

        let product_name = match order.product_id {
            Some(product_id) => match Products::find_by_id(product_id).one(&state.orm).await {
                Ok(Some(product)) => product.name,
                _ => "your product".to_string(),
            },
            None => "your product".to_string(),
        };

        let title = "Your product has been purchased".to_string();
        let body = format!(
            "{buyer_name} has purchased {} x {product_name}.",
            order.quantity
        );
        if let Err(err) =
            notification_service::push_notification(&state.orm, seller_id, &title, &body).await
        {
            tracing::warn!(error = %err, seller = %seller_id, "seller notification failed");
        }
    }
}

/// Attach the resolved listing/product records to an order for the response.
pub async fn resolve_order<C: ConnectionTrait>(conn: &C, model: OrderModel) -> AppResult<OrderDto> {
    let product = match model.product_id {
        Some(id) => Products::find_by_id(id)
            .one(conn)
            .await?
            .map(product_from_entity),
        None => None,
    };
    let listing = match model.listing_id {
        Some(id) => Listings::find_by_id(id)
            .one(conn)
            .await?
            .map(listing_from_entity),
        None => None,
    };

    Ok(OrderDto {
        order: order_from_entity(model),
        product,
        listing,
    })
}

pub fn order_from_entity(model: OrderModel) -> Order {
    let location = match (model.longitude, model.latitude) {
        (Some(longitude), Some(latitude)) => Some(GeoPoint {
            longitude,
            latitude,
        }),
        _ => None,
    };

    Order {
        id: model.id,
        user_id: model.user_id,
        seller_id: model.seller_id,
        cart_item_id: model.cart_item_id,
        listing_id: model.listing_id,
        product_id: model.product_id,
        category_id: model.category_id,
        quantity: model.quantity,
        total_amount: model.total_amount,
        status: model.status,
        payment_intent: model.payment_intent,
        payment_method: model.payment_method,
        is_paid: model.is_paid,
        is_active: model.is_active,
        delivery_address: DeliveryAddress {
            label: model.address_label,
            street: model.street,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            country: model.country,
            location,
        },
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        image_url: model.image_url,
        price: model.price,
        stock_quantity: model.stock_quantity,
        unit: model.unit,
        category_id: model.category_id,
        is_active: model.is_active,
        is_featured: model.is_featured,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub fn listing_from_entity(model: ListingModel) -> Listing {
    Listing {
        id: model.id,
        seller_id: model.seller_id,
        product_id: model.product_id,
        category_id: model.category_id,
        price: model.price,
        quantity: model.quantity,
        total_quantity: model.total_quantity,
        minimum_sell: model.minimum_sell,
        unit: model.unit,
        longitude: model.longitude,
        latitude: model.latitude,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
