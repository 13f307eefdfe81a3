use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::PaymentAttempt;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentAttemptRequest {
    /// Amount in minor units; must be positive.
    pub amount: i64,
    pub currency: Option<String>,
    /// Cart items this payment is meant to cover.
    pub cart_id: Option<Vec<Uuid>>,
    /// Direct-purchase product, when not paying for a cart.
    pub product_id: Option<Uuid>,
    pub quantity: Option<i32>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    pub payment_attempt_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAttemptCreated {
    pub payment_id: String,
    pub payment_attempt_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentAttemptList {
    pub items: Vec<PaymentAttempt>,
}
