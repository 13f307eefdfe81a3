use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

pub async fn list_products(
    pool: &DbPool,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE is_active = TRUE ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM products WHERE is_active = TRUE")
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(pool: &DbPool, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if payload.price < 0 || payload.stock_quantity < 0 {
        return Err(AppError::Validation(
            "price and stockQuantity must not be negative".into(),
        ));
    }

    let category: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM categories WHERE id = $1")
        .bind(payload.category_id)
        .fetch_optional(pool)
        .await?;
    if category.is_none() {
        return Err(AppError::Validation("category not found".into()));
    }

    let id = Uuid::new_v4();
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (id, name, description, image_url, price, stock_quantity, unit, category_id, is_featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.name)
    .bind(payload.description)
    .bind(payload.image_url)
    .bind(payload.price)
    .bind(payload.stock_quantity)
    .bind(payload.unit.unwrap_or_else(|| "kg".to_string()))
    .bind(payload.category_id)
    .bind(payload.is_featured.unwrap_or(false))
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = payload.name.unwrap_or(existing.name);
    let description = payload.description.or(existing.description);
    let image_url = payload.image_url.or(existing.image_url);
    let price = payload.price.unwrap_or(existing.price);
    let stock_quantity = payload.stock_quantity.unwrap_or(existing.stock_quantity);
    let unit = payload.unit.unwrap_or(existing.unit);
    let category_id = payload.category_id.unwrap_or(existing.category_id);
    let is_active = payload.is_active.unwrap_or(existing.is_active);
    let is_featured = payload.is_featured.unwrap_or(existing.is_featured);

    if price < 0 || stock_quantity < 0 {
        return Err(AppError::Validation(
            "price and stockQuantity must not be negative".into(),
        ));
    }

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, description = $3, image_url = $4, price = $5, stock_quantity = $6,
            unit = $7, category_id = $8, is_active = $9, is_featured = $10, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(image_url)
    .bind(price)
    .bind(stock_quantity)
    .bind(unit)
    .bind(category_id)
    .bind(is_active)
    .bind(is_featured)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
