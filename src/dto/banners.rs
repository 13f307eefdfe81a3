use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::HeroBanner;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHeroBannerRequest {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHeroBannerRequest {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HeroBannerList {
    pub items: Vec<HeroBanner>,
}
