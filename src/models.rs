use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type FoodId = i64;
pub type BranchId = i64;
pub type OrderId = i64;
pub type UserId = i64;
pub type AddressId = i64;

/// Amount in the marketplace currency (VND).
pub type Money = Decimal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    pub name: String,
    #[schema(value_type = f64)]
    pub unit_price: Money,
    pub quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A coupon as verified by the gateway for one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub code: String,
    pub discount_percent: u8,
    pub valid: bool,
    pub branch_id: BranchId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
}

/// A delivery address from the buyer's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SavedAddress {
    pub id: AddressId,
    pub title: String,
    pub address: String,
    pub phone: String,
}

/// One vendor's offer for a food name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodOption {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    #[serde(default)]
    pub branch_name: String,
    #[schema(value_type = f64)]
    pub original_price: Money,
    #[serde(default)]
    pub discount: u8,
    #[schema(value_type = f64)]
    pub final_price: Money,
}

/// Search hit grouped by food name across branches.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodGroup {
    pub name: String,
    #[schema(value_type = f64)]
    pub min_price: Money,
    #[schema(value_type = f64)]
    pub max_price: Money,
    #[serde(default)]
    pub branch_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Food {
    pub id: FoodId,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Money,
    #[serde(default)]
    pub discount: u8,
    pub branch_id: BranchId,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Food {
    /// Price after the item's own discount, which is what the gateway charges.
    pub fn effective_price(&self) -> Money {
        let percent = Decimal::from(self.discount.min(100));
        self.price - self.price * percent / Decimal::ONE_HUNDRED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[serde(alias = "PENDING")]
    PendingPayment,
    Paid,
    Shipping,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Transitions a seller may request from this status.
    pub fn seller_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::PendingPayment => &[OrderStatus::Cancelled],
            OrderStatus::Paid => &[OrderStatus::Shipping, OrderStatus::Cancelled],
            OrderStatus::Shipping => &[OrderStatus::Completed],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.seller_transitions().contains(&next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub food_id: FoodId,
    #[serde(default)]
    pub food_name: String,
    #[schema(value_type = f64)]
    pub price: Money,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub branch_id: BranchId,
    #[schema(value_type = f64)]
    pub total_price: Money,
    pub status: OrderStatus,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub discount_amount: Money,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}
