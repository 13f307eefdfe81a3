use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::listings::{CreateListingRequest, ListingList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Listing,
    response::ApiResponse,
    services::listing_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_listings).post(create_listing))
        .route("/mine", get(list_my_listings))
}

#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Create a seller listing", body = ApiResponse<Listing>),
        (status = 400, description = "Invalid quantity or price"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateListingRequest>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let resp = listing_service::create_listing(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/listings",
    responses(
        (status = 200, description = "All listings with resolved references", body = ApiResponse<ListingList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn list_all_listings(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<ListingList>>> {
    let resp = listing_service::list_all_listings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/listings/mine",
    responses(
        (status = 200, description = "Listings owned by the caller", body = ApiResponse<ListingList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Listings"
)]
pub async fn list_my_listings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ListingList>>> {
    let resp = listing_service::list_my_listings(&state, &user).await?;
    Ok(Json(resp))
}
