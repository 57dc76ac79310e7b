use crate::domain::cart::CartLine;
use crate::domain::menu::{Menu, MenuSize};
use crate::domain::user::User;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub menu_id: String,
    pub size: MenuSize,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub phone: String,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub cart_items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart: Vec<CartLine>,
    pub customer_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    #[serde(flatten)]
    pub item: CartItem,
    pub menu: Menu,
}

/// Order joined with its owner and the menus of its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub phone: String,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub formatted_total: String,
    pub user: Option<User>,
    pub cart_items: Vec<CartItemView>,
}
