use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Centrally stocked catalog product.
#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: i64,
    pub stock_quantity: i32,
    pub unit: String,
    pub category_id: Uuid,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Legacy seller-owned inventory. `price` is nullable: listings created before
/// pricing was mandatory may still lack one.
#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub product_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub price: Option<i64>,
    pub quantity: i32,
    pub total_quantity: i32,
    pub minimum_sell: Option<String>,
    pub unit: String,
    pub longitude: f64,
    pub latitude: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub quantity: i32,
    pub total_amount: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The single inventory record governing a cart item. A cart item created
/// from a listing also carries the listing's catalog reference, so the
/// listing takes precedence when both columns are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryRef {
    Listing(Uuid),
    CatalogProduct(Uuid),
}

impl InventoryRef {
    pub fn resolve(listing_id: Option<Uuid>, product_id: Option<Uuid>) -> Option<Self> {
        match (listing_id, product_id) {
            (Some(id), _) => Some(InventoryRef::Listing(id)),
            (None, Some(id)) => Some(InventoryRef::CatalogProduct(id)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub label: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub cart_item_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub quantity: i32,
    pub total_amount: i64,
    pub status: String,
    pub payment_intent: Option<String>,
    pub payment_method: String,
    pub is_paid: bool,
    pub is_active: bool,
    pub delivery_address: DeliveryAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAttempt {
    pub id: Uuid,
    pub payment_id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
    pub buyer_id: Uuid,
    pub order_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HeroBanner {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_ref_prefers_listing() {
        let listing = Uuid::new_v4();
        let product = Uuid::new_v4();
        assert_eq!(
            InventoryRef::resolve(Some(listing), Some(product)),
            Some(InventoryRef::Listing(listing))
        );
        assert_eq!(
            InventoryRef::resolve(None, Some(product)),
            Some(InventoryRef::CatalogProduct(product))
        );
        assert_eq!(InventoryRef::resolve(None, None), None);
    }
}
