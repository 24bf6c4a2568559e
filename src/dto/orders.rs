use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{AddressId, BranchId, FoodId, Money, OrderId, OrderStatus, UserId};

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DeliveryInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub note: Option<String>,
    /// Saved address filling in `phone` and `address` when those are blank.
    #[serde(default)]
    pub address_id: Option<AddressId>,
}

impl DeliveryInfo {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub food_id: FoodId,
    pub quantity: i32,
}

/// Order creation body sent to the gateway's `/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: Option<UserId>,
    pub branch_id: BranchId,
    pub items: Vec<CheckoutItem>,
    pub coupon_code: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub total_price: Money,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRequest {
    pub order_id: OrderId,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    #[schema(value_type = f64)]
    pub total_price: Money,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
