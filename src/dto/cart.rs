use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{CategoryBrief, ProductBrief};

/// `productId` may name either a legacy listing or a catalog product; the
/// service probes listings first, matching the source system's lookup order.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemsRequest {
    pub id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteCartItemsRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingBrief {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub price: Option<i64>,
    pub quantity: i32,
    pub unit: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub id: Uuid,
    pub quantity: i32,
    pub total_amount: i64,
    pub listing: Option<ListingBrief>,
    pub product: Option<ProductBrief>,
    pub category: Option<CategoryBrief>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItemDto>,
}
