use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartList, DeleteCartItemsRequest, UpdateCartItemsRequest},
        orders::{
            AdminOrderList, BuyProductRequest, MyOrdersRequest, OrderDto, OrderList,
            UpdateOrderStatusRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CartItem, Order},
    response::ApiResponse,
    services::{cart_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-toCart", post(add_to_cart))
        .route("/get-cartItems", get(get_cart_items))
        .route("/update-cartItems", post(update_cart_items))
        .route("/delete-cartItems", post(delete_cart_items))
        .route("/buy-product", post(buy_product))
        .route("/get-myOrders", post(get_my_orders))
        .route("/get-allOrders", post(get_all_orders))
        .route("/update-order-status", post(update_order_status))
}

#[utoipa::path(
    post,
    path = "/add-toCart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add item to cart", body = ApiResponse<CartItem>),
        (status = 400, description = "Invalid quantity or insufficient stock"),
        (status = 404, description = "Inventory record not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_to_cart(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/get-cartItems",
    responses(
        (status = 200, description = "Active cart items with resolved references", body = ApiResponse<CartList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn get_cart_items(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let resp = cart_service::list_cart(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/update-cartItems",
    request_body = UpdateCartItemsRequest,
    responses(
        (status = 200, description = "Updated cart item", body = ApiResponse<CartItem>),
        (status = 400, description = "Invalid quantity"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn update_cart_items(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateCartItemsRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_cart_items(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/delete-cartItems",
    request_body = DeleteCartItemsRequest,
    responses(
        (status = 200, description = "Deactivated cart item", body = ApiResponse<CartItem>),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn delete_cart_items(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeleteCartItemsRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::delete_cart_items(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/buy-product",
    request_body = BuyProductRequest,
    responses(
        (status = 200, description = "Orders created", body = ApiResponse<Vec<OrderDto>>),
        (status = 400, description = "Empty cart, invalid address or insufficient stock"),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn buy_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BuyProductRequest>,
) -> AppResult<Json<ApiResponse<Vec<OrderDto>>>> {
    let resp = order_service::place_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/get-myOrders",
    request_body = MyOrdersRequest,
    responses(
        (status = 200, description = "Orders for the caller", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn get_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<MyOrdersRequest>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::get_my_orders(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/get-allOrders",
    responses(
        (status = 200, description = "All orders with payment details (admin only)", body = ApiResponse<AdminOrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn get_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminOrderList>>> {
    let resp = order_service::get_all_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/update-order-status",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order (admin only)", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Trade"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, payload).await?;
    Ok(Json(resp))
}
