use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{CategoryBrief, ProductBrief, UserBrief};
use crate::models::{GeoPoint, Listing};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub location: GeoPoint,
    pub quantity: i32,
    pub price: i64,
    pub product_id: Uuid,
    pub minimum_sell: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
    #[serde(flatten)]
    pub listing: Listing,
    pub seller: Option<UserBrief>,
    pub product: Option<ProductBrief>,
    pub category: Option<CategoryBrief>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingList {
    pub items: Vec<ListingDto>,
}
