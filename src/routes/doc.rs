use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{AddToCartRequest, CartItemDto, CartList, ListingBrief},
        listings::{CreateListingRequest, ListingDto, ListingList},
        orders::{AdminOrderList, BuyProductRequest, OrderDto, OrderList, OrderWithPayment},
        payments::{CreatePaymentAttemptRequest, PaymentAttemptCreated, PaymentAttemptList},
    },
    models::{
        CartItem, Category, DeliveryAddress, GeoPoint, HeroBanner, Listing, Notification, Order,
        PaymentAttempt, Product, User,
    },
    response::{ApiResponse, Meta},
    routes::{auth, banners, categories, health, listings, notifications, payments, products, trade},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        trade::add_to_cart,
        trade::get_cart_items,
        trade::update_cart_items,
        trade::delete_cart_items,
        trade::buy_product,
        trade::get_my_orders,
        trade::get_all_orders,
        trade::update_order_status,
        payments::create_payment_attempt,
        payments::update_payment_status,
        payments::list_all_payment_attempts,
        payments::list_my_payment_attempts,
        payments::get_payment_attempt,
        payments::cancel_payment_attempt,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        listings::create_listing,
        listings::list_all_listings,
        listings::list_my_listings,
        banners::list_banners,
        banners::create_banner,
        banners::update_banner,
        banners::delete_banner,
        notifications::list_notifications,
        notifications::mark_notification_read
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            Listing,
            CartItem,
            Order,
            PaymentAttempt,
            Notification,
            HeroBanner,
            DeliveryAddress,
            GeoPoint,
            AddToCartRequest,
            CartItemDto,
            CartList,
            ListingBrief,
            BuyProductRequest,
            OrderDto,
            OrderList,
            OrderWithPayment,
            AdminOrderList,
            CreatePaymentAttemptRequest,
            PaymentAttemptCreated,
            PaymentAttemptList,
            CreateListingRequest,
            ListingDto,
            ListingList,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<CartList>,
            ApiResponse<PaymentAttempt>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Trade", description = "Cart and checkout endpoints"),
        (name = "Payments", description = "Payment attempt endpoints"),
        (name = "Products", description = "Catalog product endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Listings", description = "Seller listing endpoints"),
        (name = "Banners", description = "Hero banner endpoints"),
        (name = "Notifications", description = "Notification endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
