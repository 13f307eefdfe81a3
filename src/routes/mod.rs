use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod banners;
pub mod categories;
pub mod doc;
pub mod health;
pub mod listings;
pub mod notifications;
pub mod params;
pub mod payments;
pub mod products;
pub mod trade;

// Build the API router without binding state; it will be provided at the top level.
// Trade endpoints keep their historical root-level paths; everything else
// lives under /api.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(trade::router())
        .nest("/api/auth", auth::router())
        .nest("/api/products", products::router())
        .nest("/api/categories", categories::router())
        .nest("/api/listings", listings::router())
        .nest("/api/banners", banners::router())
        .nest("/api/notifications", notifications::router())
        .nest("/api/payments", payments::router())
}
