use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    cart::{Cart, CartTotals},
    models::{BranchId, CartLine, Coupon, FoodId},
};

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    pub food_id: FoodId,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// Minimal cart line as the gateway stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCartItem {
    pub food_id: FoodId,
    pub branch_id: BranchId,
    pub quantity: i32,
}

/// Coupon verification answer before it is bound to a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponVerification {
    pub code: String,
    pub discount_percent: u8,
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl CouponVerification {
    pub fn for_branch(self, branch_id: BranchId) -> Coupon {
        Coupon {
            code: self.code,
            discount_percent: self.discount_percent,
            valid: self.valid,
            branch_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub vendor: Option<BranchId>,
    pub vendor_name: Option<String>,
    pub lines: Vec<CartLine>,
    pub coupon: Option<Coupon>,
    pub totals: CartTotals,
}

impl CartView {
    pub fn new(cart: &Cart, vendor_name: Option<String>) -> Self {
        Self {
            vendor: cart.vendor(),
            vendor_name,
            lines: cart.lines().to_vec(),
            coupon: cart.coupon().cloned(),
            totals: cart.totals(),
        }
    }
}
