use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::{
        CategoryBrief, ProductBrief, UserBrief,
        listings::{CreateListingRequest, ListingDto, ListingList},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Listing, Product},
    response::{ApiResponse, Meta},
    services::notification_service,
    state::AppState,
};

#[derive(FromRow)]
struct ListingRow {
    id: Uuid,
    seller_id: Uuid,
    product_id: Option<Uuid>,
    category_id: Option<Uuid>,
    price: Option<i64>,
    quantity: i32,
    total_quantity: i32,
    minimum_sell: Option<String>,
    unit: String,
    longitude: f64,
    latitude: f64,
    created_at: DateTime<Utc>,
    seller_name: Option<String>,
    seller_email: Option<String>,
    product_name: Option<String>,
    image_url: Option<String>,
    category_name: Option<String>,
}

const LISTING_SELECT: &str = r#"
    SELECT l.id, l.seller_id, l.product_id, l.category_id, l.price, l.quantity,
           l.total_quantity, l.minimum_sell, l.unit, l.longitude, l.latitude, l.created_at,
           u.full_name AS seller_name, u.email AS seller_email,
           p.name AS product_name, p.image_url,
           c.name AS category_name
    FROM listings l
    JOIN users u ON u.id = l.seller_id
    LEFT JOIN products p ON p.id = l.product_id
    LEFT JOIN categories c ON c.id = l.category_id
"#;

pub async fn create_listing(
    state: &AppState,
    user: &AuthUser,
    payload: CreateListingRequest,
) -> AppResult<ApiResponse<Listing>> {
    if payload.quantity <= 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".into(),
        ));
    }
    if payload.price < 0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }

    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        INSERT INTO listings (id, seller_id, product_id, category_id, price, quantity,
                              total_quantity, minimum_sell, unit, longitude, latitude)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(product.id)
    .bind(product.category_id)
    .bind(payload.price)
    .bind(payload.quantity)
    .bind(payload.quantity)
    .bind(payload.minimum_sell)
    .bind(payload.unit.unwrap_or_else(|| product.unit.clone()))
    .bind(payload.location.longitude)
    .bind(payload.location.latitude)
    .fetch_one(&state.pool)
    .await?;

    // Tell everyone else a new listing is up. Best effort.
    let audience: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id <> $1")
        .bind(user.user_id)
        .fetch_all(&state.pool)
        .await
        .unwrap_or_default();
    let audience: Vec<Uuid> = audience.into_iter().map(|(id,)| id).collect();
    let title = format!("New listing: {}", product.name);
    let body = format!("{} is now available for purchase.", product.name);
    if let Err(err) =
        notification_service::push_notifications_bulk(&state.orm, &audience, &title, &body).await
    {
        tracing::warn!(error = %err, "listing notification fanout failed");
    }

    Ok(ApiResponse::success("Listing created", listing, None))
}

pub async fn list_all_listings(state: &AppState) -> AppResult<ApiResponse<ListingList>> {
    let sql = format!("{LISTING_SELECT} ORDER BY l.created_at DESC");
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .fetch_all(&state.pool)
        .await?;

    let items = rows.into_iter().map(listing_dto_from_row).collect();
    Ok(ApiResponse::success(
        "Ok",
        ListingList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_my_listings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ListingList>> {
    let sql = format!("{LISTING_SELECT} WHERE l.seller_id = $1 ORDER BY l.created_at DESC");
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(user.user_id)
        .fetch_all(&state.pool)
        .await?;

    let items = rows.into_iter().map(listing_dto_from_row).collect();
    Ok(ApiResponse::success(
        "Ok",
        ListingList { items },
        Some(Meta::empty()),
    ))
}

fn listing_dto_from_row(row: ListingRow) -> ListingDto {
    ListingDto {
        listing: Listing {
            id: row.id,
            seller_id: row.seller_id,
            product_id: row.product_id,
            category_id: row.category_id,
            price: row.price,
            quantity: row.quantity,
            total_quantity: row.total_quantity,
            minimum_sell: row.minimum_sell,
            unit: row.unit,
            longitude: row.longitude,
            latitude: row.latitude,
            created_at: row.created_at,
        },
        seller: row.seller_name.map(|full_name| UserBrief {
            id: row.seller_id,
            full_name,
            email: row.seller_email.unwrap_or_default(),
        }),
        product: row.product_id.map(|id| ProductBrief {
            id,
            name: row.product_name.unwrap_or_default(),
            image_url: row.image_url,
        }),
        category: row.category_id.map(|id| CategoryBrief {
            id,
            name: row.category_name.unwrap_or_default(),
        }),
    }
}
