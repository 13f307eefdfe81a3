use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use axum_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};

/// Seed a demo admin, a category and a couple of catalog products so the API
/// is usable straight after a fresh migration.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(b"admin12345", &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, 'admin')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("Admin")
    .bind("admin@example.com")
    .bind(password_hash)
    .execute(&pool)
    .await?;

    let category_id = Uuid::new_v4();
    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
        .bind(category_id)
        .bind("Vegetables")
        .execute(&pool)
        .await?;

    let category: (Uuid,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind("Vegetables")
        .fetch_one(&pool)
        .await?;

    for (name, price, stock) in [("Tomatoes", 250_i64, 100_i32), ("Potatoes", 120, 250)] {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock_quantity, category_id)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(format!("Fresh {}", name.to_lowercase()))
        .bind(price)
        .bind(stock)
        .bind(category.0)
        .execute(&pool)
        .await?;
    }

    println!("Seed data applied");
    Ok(())
}
