use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::products::ProductDto;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub product_id: Uuid,
    pub quantity: i32,
    pub product: Option<ProductDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartDto {
    pub customer_id: Uuid,
    pub items: Vec<CartItemDto>,
}
