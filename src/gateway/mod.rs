//! Contract with the remote Catalog/Order Gateway.
//!
//! Everything the storefront knows about foods, carts, coupons and orders comes
//! through [`Gateway`]. Calls that act on behalf of a shopper take the bearer
//! token from their session.

use async_trait::async_trait;

use crate::{
    dto::{
        auth::{GatewayLoginResponse, GatewayRegisterRequest, LoginRequest},
        cart::{CouponVerification, RemoteCartItem, UpdateCartRequest},
        orders::{CheckoutRequest, CheckoutResponse, PayRequest},
        profile::NewAddressRequest,
        seller::{CreateCouponRequest, FoodForm},
    },
    error::GatewayResult,
    models::{
        Branch, BranchId, Food, FoodGroup, FoodId, FoodOption, Order, OrderId, OrderStatus,
        SavedAddress, UserId,
    },
};

pub mod http;

pub use http::HttpGateway;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<GatewayLoginResponse>;

    async fn register(&self, request: &GatewayRegisterRequest) -> GatewayResult<()>;

    async fn addresses(&self, token: &str) -> GatewayResult<Vec<SavedAddress>>;

    async fn add_address(&self, token: &str, request: &NewAddressRequest) -> GatewayResult<()>;

    async fn branch(&self, branch_id: BranchId) -> GatewayResult<Branch>;

    async fn search_foods(&self, query: &str) -> GatewayResult<Vec<FoodGroup>>;

    async fn food_options(&self, name: &str) -> GatewayResult<Vec<FoodOption>>;

    async fn food(&self, food_id: FoodId) -> GatewayResult<Food>;

    async fn branch_foods(&self, token: &str, branch_id: BranchId) -> GatewayResult<Vec<Food>>;

    async fn create_food(&self, token: &str, form: &FoodForm) -> GatewayResult<()>;

    async fn delete_food(&self, token: &str, food_id: FoodId) -> GatewayResult<()>;

    async fn get_cart(&self, token: &str) -> GatewayResult<Vec<RemoteCartItem>>;

    /// Answers 409 when the remote cart already holds another branch.
    async fn add_to_cart(&self, token: &str, item: &RemoteCartItem) -> GatewayResult<()>;

    async fn update_cart(&self, token: &str, request: &UpdateCartRequest) -> GatewayResult<()>;

    async fn clear_cart(&self, token: &str) -> GatewayResult<()>;

    async fn verify_coupon(
        &self,
        token: &str,
        code: &str,
        branch_id: BranchId,
    ) -> GatewayResult<CouponVerification>;

    async fn create_coupon(&self, token: &str, request: &CreateCouponRequest) -> GatewayResult<()>;

    async fn delete_coupon(&self, token: &str, code: &str) -> GatewayResult<()>;

    async fn create_order(
        &self,
        token: &str,
        request: &CheckoutRequest,
    ) -> GatewayResult<CheckoutResponse>;

    async fn pay(&self, token: &str, request: &PayRequest) -> GatewayResult<()>;

    async fn my_orders(&self, token: &str, user_id: UserId) -> GatewayResult<Vec<Order>>;

    async fn branch_orders(&self, token: &str, branch_id: BranchId) -> GatewayResult<Vec<Order>>;

    async fn update_order_status(
        &self,
        token: &str,
        order_id: OrderId,
        status: OrderStatus,
    ) -> GatewayResult<()>;
}
