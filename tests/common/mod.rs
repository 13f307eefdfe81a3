#![allow(dead_code)]

use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

use axum_marketplace_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        listings::ActiveModel as ListingActive, products::ActiveModel as ProductActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    models::{DeliveryAddress, GeoPoint},
    state::AppState,
};

/// Connect, migrate and wipe the database. Returns `None` (and prints a
/// notice) when no test database is configured, so the suite can skip.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE payment_attempts, orders, cart_items, notifications, listings, products, hero_banners, audit_logs, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(Some(AppState { pool, orm }))
}

pub async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set(format!("Test {role}")),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: role.into(),
    })
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
        .bind(id)
        .bind(name)
        .execute(&state.pool)
        .await?;
    Ok(id)
}

pub async fn create_product(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        description: Set(Some("A product for testing".into())),
        image_url: Set(None),
        price: Set(price),
        stock_quantity: Set(stock),
        unit: Set("kg".into()),
        category_id: Set(category_id),
        is_active: Set(true),
        is_featured: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

pub async fn create_listing(
    state: &AppState,
    seller: &AuthUser,
    product_id: Uuid,
    category_id: Uuid,
    price: Option<i64>,
    quantity: i32,
) -> anyhow::Result<Uuid> {
    let listing = ListingActive {
        id: Set(Uuid::new_v4()),
        seller_id: Set(seller.user_id),
        product_id: Set(Some(product_id)),
        category_id: Set(Some(category_id)),
        price: Set(price),
        quantity: Set(quantity),
        total_quantity: Set(quantity),
        minimum_sell: Set(None),
        unit: Set("kg".into()),
        longitude: Set(-89.65),
        latitude: Set(39.78),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(listing.id)
}

pub fn test_address() -> DeliveryAddress {
    DeliveryAddress {
        label: Some("Home".into()),
        street: "12 Market Rd".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        postal_code: "62704".into(),
        country: "US".into(),
        location: Some(GeoPoint {
            longitude: -89.65,
            latitude: 39.78,
        }),
    }
}
