use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{BranchId, Money};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFoodRequest {
    pub name: String,
    #[schema(value_type = f64)]
    pub price: Money,
    #[serde(default)]
    pub discount: u8,
}

/// Form body of the menu service's `POST /foods`. The branch comes from the
/// seller's session, never from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodForm {
    pub name: String,
    pub price: Money,
    pub discount: u8,
    pub branch_id: BranchId,
}

impl FoodForm {
    pub fn for_branch(request: CreateFoodRequest, branch_id: BranchId) -> Self {
        Self {
            name: request.name,
            price: request.price,
            discount: request.discount,
            branch_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_percent: u8,
}
