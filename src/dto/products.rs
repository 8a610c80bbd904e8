use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::products;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Uuid,
    pub is_deactive: bool,
    /// Free-form attributes; persisted as JSON text on the entity.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub display_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Uuid,
    #[serde(default)]
    pub is_deactive: bool,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<ProductDto>,
}

pub fn from_entity(model: products::Model) -> ProductDto {
    // Unreadable attribute text degrades to an empty map.
    let attributes = serde_json::from_str(&model.attributes).unwrap_or_default();
    ProductDto {
        id: model.id,
        display_name: model.display_name,
        description: model.description,
        price: model.price,
        category_id: model.category_id,
        is_deactive: model.is_deactive,
        attributes,
    }
}

pub fn attributes_to_text(attributes: &Map<String, Value>) -> String {
    serde_json::to_string(attributes).unwrap_or_else(|_| "{}".to_string())
}
