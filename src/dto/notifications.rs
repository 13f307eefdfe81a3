use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Notification;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkReadRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationList {
    pub items: Vec<Notification>,
}
