use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::cart::CartItemRequest;
use crate::models::OrderState;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineDto {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub display_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_price: Decimal,
    pub state: OrderState,
    pub lines: Vec<OrderLineDto>,
}

/// Only product id and quantity are read from each item; price and name
/// are snapshotted server-side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<CartItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStateRequest {
    pub state: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderDto>,
}
