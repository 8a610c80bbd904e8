use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity row as stored; never serialized at the API boundary,
/// handlers expose `dto::auth::UserInfo` instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an order. Stored as text in the orders table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderState {
    CheckingOut,
    Placed,
    ReadyToShip,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::CheckingOut => "CheckingOut",
            OrderState::Placed => "Placed",
            OrderState::ReadyToShip => "ReadyToShip",
            OrderState::Shipped => "Shipped",
            OrderState::Delivered => "Delivered",
            OrderState::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CheckingOut" => Some(OrderState::CheckingOut),
            "Placed" => Some(OrderState::Placed),
            "ReadyToShip" => Some(OrderState::ReadyToShip),
            "Shipped" => Some(OrderState::Shipped),
            "Delivered" => Some(OrderState::Delivered),
            "Cancelled" => Some(OrderState::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
