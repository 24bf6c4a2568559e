use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    dto::{
        auth::{GatewayLoginResponse, GatewayRegisterRequest, LoginRequest},
        cart::{CouponVerification, RemoteCartItem, UpdateCartRequest},
        orders::{CheckoutRequest, CheckoutResponse, PayRequest},
        profile::NewAddressRequest,
        seller::{CreateCouponRequest, FoodForm},
    },
    error::{GatewayError, GatewayResult},
    gateway::Gateway,
    models::{
        Branch, BranchId, Food, FoodGroup, FoodId, FoodOption, Order, OrderId, OrderStatus,
        SavedAddress, UserId,
    },
};

/// [`Gateway`] over the marketplace's REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.bearer_auth(token)
    }

    async fn send(&self, builder: RequestBuilder) -> GatewayResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = %status, "gateway call");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            detail: error_detail(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Gateway error")
                    .to_string()
            }),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(builder).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute(&self, builder: RequestBuilder) -> GatewayResult<()> {
        self.send(builder).await.map(|_| ())
    }
}

/// Turns the gateway's `detail` field into something a shopper can read.
///
/// `detail` is either a plain string, a list of field validation entries
/// (`{"loc": [..], "msg": ..}`), or an arbitrary object.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(entries) => {
            let messages: Vec<String> = entries
                .iter()
                .map(|entry| {
                    let field = entry
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .map(|f| match f {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .unwrap_or_default();
                    let msg = entry.get("msg").and_then(Value::as_str).unwrap_or("invalid");
                    if field.is_empty() {
                        msg.to_string()
                    } else {
                        format!("{field}: {msg}")
                    }
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<GatewayLoginResponse> {
        self.fetch(self.client.post(self.url("/login")).json(request))
            .await
    }

    async fn register(&self, request: &GatewayRegisterRequest) -> GatewayResult<()> {
        self.execute(self.client.post(self.url("/register")).json(request))
            .await
    }

    async fn addresses(&self, token: &str) -> GatewayResult<Vec<SavedAddress>> {
        let builder = self.client.get(self.url("/users/addresses"));
        self.fetch(self.authed(builder, token)).await
    }

    async fn add_address(&self, token: &str, request: &NewAddressRequest) -> GatewayResult<()> {
        let builder = self.client.post(self.url("/users/addresses")).json(request);
        self.execute(self.authed(builder, token)).await
    }

    async fn branch(&self, branch_id: BranchId) -> GatewayResult<Branch> {
        self.fetch(self.client.get(self.url(&format!("/branches/{branch_id}"))))
            .await
    }

    async fn search_foods(&self, query: &str) -> GatewayResult<Vec<FoodGroup>> {
        self.fetch(
            self.client
                .get(self.url("/foods/search"))
                .query(&[("q", query)]),
        )
        .await
    }

    async fn food_options(&self, name: &str) -> GatewayResult<Vec<FoodOption>> {
        self.fetch(
            self.client
                .get(self.url("/foods/options"))
                .query(&[("name", name)]),
        )
        .await
    }

    async fn food(&self, food_id: FoodId) -> GatewayResult<Food> {
        self.fetch(self.client.get(self.url(&format!("/foods/{food_id}"))))
            .await
    }

    async fn branch_foods(&self, token: &str, branch_id: BranchId) -> GatewayResult<Vec<Food>> {
        let builder = self
            .client
            .get(self.url("/foods"))
            .query(&[("branch_id", branch_id)]);
        self.fetch(self.authed(builder, token)).await
    }

    async fn create_food(&self, token: &str, form: &FoodForm) -> GatewayResult<()> {
        // The menu service reads food fields as form data.
        let builder = self.client.post(self.url("/foods")).form(form);
        self.execute(self.authed(builder, token)).await
    }

    async fn delete_food(&self, token: &str, food_id: FoodId) -> GatewayResult<()> {
        let builder = self.client.delete(self.url(&format!("/foods/{food_id}")));
        self.execute(self.authed(builder, token)).await
    }

    async fn get_cart(&self, token: &str) -> GatewayResult<Vec<RemoteCartItem>> {
        let builder = self.client.get(self.url("/cart"));
        self.fetch(self.authed(builder, token)).await
    }

    async fn add_to_cart(&self, token: &str, item: &RemoteCartItem) -> GatewayResult<()> {
        let builder = self.client.post(self.url("/cart")).json(item);
        self.execute(self.authed(builder, token)).await
    }

    async fn update_cart(&self, token: &str, request: &UpdateCartRequest) -> GatewayResult<()> {
        let builder = self.client.put(self.url("/cart")).json(request);
        self.execute(self.authed(builder, token)).await
    }

    async fn clear_cart(&self, token: &str) -> GatewayResult<()> {
        let builder = self.client.delete(self.url("/cart"));
        self.execute(self.authed(builder, token)).await
    }

    async fn verify_coupon(
        &self,
        token: &str,
        code: &str,
        branch_id: BranchId,
    ) -> GatewayResult<CouponVerification> {
        let builder = self
            .client
            .get(self.url("/coupons/verify"))
            .query(&[("code", code.to_string()), ("branch_id", branch_id.to_string())]);
        self.fetch(self.authed(builder, token)).await
    }

    async fn create_coupon(&self, token: &str, request: &CreateCouponRequest) -> GatewayResult<()> {
        let builder = self.client.post(self.url("/coupons")).json(request);
        self.execute(self.authed(builder, token)).await
    }

    async fn delete_coupon(&self, token: &str, code: &str) -> GatewayResult<()> {
        let builder = self.client.delete(self.url(&format!("/coupons/{code}")));
        self.execute(self.authed(builder, token)).await
    }

    async fn create_order(
        &self,
        token: &str,
        request: &CheckoutRequest,
    ) -> GatewayResult<CheckoutResponse> {
        let builder = self.client.post(self.url("/checkout")).json(request);
        self.fetch(self.authed(builder, token)).await
    }

    async fn pay(&self, token: &str, request: &PayRequest) -> GatewayResult<()> {
        let builder = self.client.post(self.url("/pay")).json(request);
        self.execute(self.authed(builder, token)).await
    }

    async fn my_orders(&self, token: &str, user_id: UserId) -> GatewayResult<Vec<Order>> {
        let builder = self
            .client
            .get(self.url("/orders/my-orders"))
            .query(&[("user_id", user_id)]);
        self.fetch(self.authed(builder, token)).await
    }

    async fn branch_orders(&self, token: &str, branch_id: BranchId) -> GatewayResult<Vec<Order>> {
        let builder = self
            .client
            .get(self.url("/orders"))
            .query(&[("branch_id", branch_id)]);
        self.fetch(self.authed(builder, token)).await
    }

    async fn update_order_status(
        &self,
        token: &str,
        order_id: OrderId,
        status: OrderStatus,
    ) -> GatewayResult<()> {
        let builder = self
            .client
            .put(self.url(&format!("/orders/{order_id}/status")))
            .query(&[("status", status.as_str())]);
        self.execute(self.authed(builder, token)).await
    }
}
