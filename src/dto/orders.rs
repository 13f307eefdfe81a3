use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{DeliveryAddress, Listing, Order, PaymentAttempt, Product};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuyProductRequest {
    /// Ids of the cart items to purchase.
    pub cart_id: Vec<Uuid>,
    pub payment_intent: Option<String>,
    pub payment_attempt_id: Option<Uuid>,
    pub delivery_address: DeliveryAddress,
}

impl BuyProductRequest {
    /// Boundary validation; the coordinator never re-derives business data
    /// from raw input past this point.
    pub fn validate(&self) -> AppResult<()> {
        if self.cart_id.is_empty() {
            return Err(AppError::Validation("cartId must not be empty".into()));
        }
        validate_address(&self.delivery_address)
    }
}

pub fn validate_address(address: &DeliveryAddress) -> AppResult<()> {
    let required = [
        ("street", &address.street),
        ("city", &address.city),
        ("state", &address.state),
        ("postalCode", &address.postal_code),
        ("country", &address.country),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "deliveryAddress.{field} is required"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyOrdersRequest {
    /// When true, return orders where the caller is the seller.
    pub is_seller: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: Uuid,
    pub status: String,
}

/// An order with its inventory references resolved for the response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    #[serde(flatten)]
    pub order: Order,
    pub product: Option<Product>,
    pub listing: Option<Listing>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderDto>,
}

/// Admin projection pairing each order with its payment attempt, if one was
/// ever linked.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithPayment {
    #[serde(flatten)]
    pub order: OrderDto,
    pub payment_attempt: Option<PaymentAttempt>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderList {
    pub items: Vec<OrderWithPayment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn address() -> DeliveryAddress {
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

    #[test]
    fn accepts_complete_address() {
        assert!(validate_address(&address()).is_ok());
    }

    #[test]
    fn rejects_blank_required_field() {
        let mut addr = address();
        addr.postal_code = "  ".into();
        let err = validate_address(&addr).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("postalCode")));
    }

    #[test]
    fn rejects_empty_cart_id_list() {
        let req = BuyProductRequest {
            cart_id: vec![],
            payment_intent: None,
            payment_attempt_id: None,
            delivery_address: address(),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}
