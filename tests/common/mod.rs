#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use food_storefront::{
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
    session::Session,
};

pub const BUYER_ID: UserId = 7;
pub const SELLER_BRANCH: BranchId = 1;

pub fn money(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

fn status(code: u16, detail: &str) -> GatewayError {
    GatewayError::Status {
        status: code,
        detail: detail.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub foods: HashMap<FoodId, Food>,
    pub cart: Vec<RemoteCartItem>,
    pub coupons: HashMap<(String, BranchId), u8>,
    pub orders: Vec<Order>,
    pub branches: HashMap<BranchId, String>,
    pub addresses: Vec<SavedAddress>,
    pub food_forms: Vec<FoodForm>,
    pub payments: Vec<PayRequest>,
    pub order_requests: Vec<CheckoutRequest>,
    pub calls: Vec<&'static str>,
    pub next_order_id: OrderId,
    /// Price the gateway puts on the next order instead of computing it.
    pub priced_total: Option<Decimal>,
    pub unavailable_foods: HashSet<FoodId>,
    pub fail_create_order: bool,
    pub fail_pay: bool,
    pub fail_clear_cart: bool,
    pub fail_my_orders: bool,
}

/// In-memory marketplace standing in for the remote gateway.
#[derive(Debug, Clone, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.state();
            state.next_order_id = 100;
            for food in [
                food(1, "Pho Bo", "50000", 0, 1),
                food(2, "Bun Cha", "40000", 10, 1),
                food(3, "Banh Mi", "20000", 0, 2),
            ] {
                state.foods.insert(food.id, food);
            }
            state.coupons.insert(("SAVE10".to_string(), 1), 10);
            state.branches.insert(1, "Pho Ha Noi".to_string());
            state.addresses.push(SavedAddress {
                id: 11,
                title: "Home".into(),
                address: "12 Hang Bac".into(),
                phone: "0901".into(),
            });
        }
        gateway
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake gateway state")
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) -> MutexGuard<'_, FakeState> {
        let mut state = self.state();
        state.calls.push(name);
        state
    }
}

pub fn food(id: FoodId, name: &str, price: &str, discount: u8, branch_id: BranchId) -> Food {
    Food {
        id,
        name: name.to_string(),
        price: money(price),
        discount,
        branch_id,
        image_url: None,
    }
}

pub fn buyer_session() -> Session {
    Session {
        id: Uuid::new_v4(),
        token: "buyer-token".into(),
        user_id: Some(BUYER_ID),
        role: "buyer".into(),
        branch_id: None,
        seller_mode: false,
        created_at: Utc::now(),
    }
}

pub fn seller_session() -> Session {
    Session {
        id: Uuid::new_v4(),
        token: "seller-token".into(),
        user_id: Some(2),
        role: "seller".into(),
        branch_id: Some(SELLER_BRANCH),
        seller_mode: true,
        created_at: Utc::now(),
    }
}

pub fn order(id: OrderId, branch_id: BranchId, status: OrderStatus) -> Order {
    Order {
        id,
        user_id: Some(BUYER_ID),
        user_name: None,
        branch_id,
        total_price: money("50000"),
        status,
        delivery_address: None,
        customer_phone: None,
        note: None,
        coupon_code: None,
        discount_amount: Decimal::ZERO,
        created_at: None,
        items: Vec::new(),
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<GatewayLoginResponse> {
        let _state = self.record("login");
        if request.password != "secret" {
            return Err(status(401, "Incorrect email or password"));
        }
        let seller = request.email.starts_with("seller");
        Ok(GatewayLoginResponse {
            access_token: format!("token-{}", request.email),
            role: if seller { "seller" } else { "buyer" }.into(),
            seller_mode: Some(serde_json::Value::Bool(seller)),
            branch_id: seller.then_some(SELLER_BRANCH),
            id: Some(if seller { 2 } else { BUYER_ID }),
        })
    }

    async fn register(&self, request: &GatewayRegisterRequest) -> GatewayResult<()> {
        let _state = self.record("register");
        if request.email.contains("taken") {
            return Err(status(400, "Email already registered"));
        }
        Ok(())
    }

    async fn addresses(&self, token: &str) -> GatewayResult<Vec<SavedAddress>> {
        let state = self.record("addresses");
        if token.is_empty() {
            return Err(status(401, "Not authenticated"));
        }
        Ok(state.addresses.clone())
    }

    async fn add_address(&self, _token: &str, request: &NewAddressRequest) -> GatewayResult<()> {
        let mut state = self.record("add_address");
        let id = state.addresses.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        state.addresses.push(SavedAddress {
            id,
            title: request.title.clone(),
            address: request.address.clone(),
            phone: request.phone.clone(),
        });
        Ok(())
    }

    async fn branch(&self, branch_id: BranchId) -> GatewayResult<Branch> {
        let state = self.record("branch");
        state
            .branches
            .get(&branch_id)
            .map(|name| Branch {
                id: branch_id,
                name: name.clone(),
            })
            .ok_or_else(|| status(404, "Branch not found"))
    }

    async fn search_foods(&self, query: &str) -> GatewayResult<Vec<FoodGroup>> {
        let state = self.record("search_foods");
        let mut groups: Vec<FoodGroup> = Vec::new();
        for food in state.foods.values() {
            if !food.name.to_lowercase().contains(&query.to_lowercase()) {
                continue;
            }
            let price = food.effective_price();
            match groups.iter_mut().find(|g| g.name == food.name) {
                Some(group) => {
                    group.min_price = group.min_price.min(price);
                    group.max_price = group.max_price.max(price);
                    group.branch_count += 1;
                }
                None => groups.push(FoodGroup {
                    name: food.name.clone(),
                    min_price: price,
                    max_price: price,
                    branch_count: 1,
                }),
            }
        }
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn food_options(&self, name: &str) -> GatewayResult<Vec<FoodOption>> {
        let state = self.record("food_options");
        Ok(state
            .foods
            .values()
            .filter(|f| f.name == name)
            .map(|f| FoodOption {
                food_id: f.id,
                branch_id: f.branch_id,
                branch_name: format!("Branch {}", f.branch_id),
                original_price: f.price,
                discount: f.discount,
                final_price: f.effective_price(),
            })
            .collect())
    }

    async fn food(&self, food_id: FoodId) -> GatewayResult<Food> {
        let state = self.record("food");
        if state.unavailable_foods.contains(&food_id) {
            return Err(status(503, "Menu service down"));
        }
        state
            .foods
            .get(&food_id)
            .cloned()
            .ok_or_else(|| status(404, "Food not found"))
    }

    async fn branch_foods(&self, _token: &str, branch_id: BranchId) -> GatewayResult<Vec<Food>> {
        let state = self.record("branch_foods");
        Ok(state
            .foods
            .values()
            .filter(|f| f.branch_id == branch_id)
            .cloned()
            .collect())
    }

    async fn create_food(&self, _token: &str, form: &FoodForm) -> GatewayResult<()> {
        let mut state = self.record("create_food");
        state.food_forms.push(form.clone());
        if !state.branches.contains_key(&form.branch_id) {
            return Err(status(422, "branch_id: unknown branch"));
        }
        let id = state.foods.keys().max().copied().unwrap_or(0) + 1;
        state.foods.insert(
            id,
            Food {
                id,
                name: form.name.clone(),
                price: form.price,
                discount: form.discount,
                branch_id: form.branch_id,
                image_url: None,
            },
        );
        Ok(())
    }

    async fn delete_food(&self, _token: &str, food_id: FoodId) -> GatewayResult<()> {
        let mut state = self.record("delete_food");
        state
            .foods
            .remove(&food_id)
            .map(|_| ())
            .ok_or_else(|| status(404, "Food not found"))
    }

    async fn get_cart(&self, _token: &str) -> GatewayResult<Vec<RemoteCartItem>> {
        let state = self.record("get_cart");
        Ok(state.cart.clone())
    }

    async fn add_to_cart(&self, _token: &str, item: &RemoteCartItem) -> GatewayResult<()> {
        let mut state = self.record("add_to_cart");
        if state.cart.iter().any(|i| i.branch_id != item.branch_id) {
            return Err(status(409, "Cart contains items from another branch"));
        }
        match state.cart.iter_mut().find(|i| i.food_id == item.food_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => state.cart.push(item.clone()),
        }
        Ok(())
    }

    async fn update_cart(&self, _token: &str, request: &UpdateCartRequest) -> GatewayResult<()> {
        let mut state = self.record("update_cart");
        let line = state
            .cart
            .iter_mut()
            .find(|i| i.food_id == request.food_id)
            .ok_or_else(|| status(404, "Item not in cart"))?;
        line.quantity = request.quantity;
        Ok(())
    }

    async fn clear_cart(&self, _token: &str) -> GatewayResult<()> {
        let mut state = self.record("clear_cart");
        if state.fail_clear_cart {
            return Err(status(500, "Cart service down"));
        }
        state.cart.clear();
        Ok(())
    }

    async fn verify_coupon(
        &self,
        _token: &str,
        code: &str,
        branch_id: BranchId,
    ) -> GatewayResult<CouponVerification> {
        let state = self.record("verify_coupon");
        let percent = state
            .coupons
            .get(&(code.to_string(), branch_id))
            .copied()
            .ok_or_else(|| status(400, "Coupon is not valid for this branch"))?;
        Ok(CouponVerification {
            code: code.to_string(),
            discount_percent: percent,
            valid: true,
        })
    }

    async fn create_coupon(&self, _token: &str, request: &CreateCouponRequest) -> GatewayResult<()> {
        let mut state = self.record("create_coupon");
        state
            .coupons
            .insert((request.code.clone(), SELLER_BRANCH), request.discount_percent);
        Ok(())
    }

    async fn delete_coupon(&self, _token: &str, code: &str) -> GatewayResult<()> {
        let mut state = self.record("delete_coupon");
        state
            .coupons
            .remove(&(code.to_string(), SELLER_BRANCH))
            .map(|_| ())
            .ok_or_else(|| status(404, "Coupon not found"))
    }

    async fn create_order(
        &self,
        _token: &str,
        request: &CheckoutRequest,
    ) -> GatewayResult<CheckoutResponse> {
        let mut state = self.record("create_order");
        state.order_requests.push(request.clone());
        if state.fail_create_order {
            return Err(status(500, "Order service down"));
        }

        let subtotal: Decimal = request
            .items
            .iter()
            .filter_map(|item| {
                state
                    .foods
                    .get(&item.food_id)
                    .map(|f| f.effective_price() * Decimal::from(item.quantity))
            })
            .sum();
        let percent = request
            .coupon_code
            .as_ref()
            .and_then(|code| state.coupons.get(&(code.clone(), request.branch_id)))
            .copied()
            .unwrap_or(0);
        let computed = subtotal - subtotal * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        let total_price = state.priced_total.unwrap_or(computed);

        let order_id = state.next_order_id;
        state.next_order_id += 1;
        let mut created = order(order_id, request.branch_id, OrderStatus::PendingPayment);
        created.user_id = request.user_id;
        created.total_price = total_price;
        created.coupon_code = request.coupon_code.clone();
        state.orders.push(created);

        Ok(CheckoutResponse {
            order_id,
            total_price,
            status: OrderStatus::PendingPayment,
        })
    }

    async fn pay(&self, _token: &str, request: &PayRequest) -> GatewayResult<()> {
        let mut state = self.record("pay");
        state.payments.push(request.clone());
        if state.fail_pay {
            return Err(status(402, "Card declined"));
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == request.order_id)
            .ok_or_else(|| status(404, "Order not found"))?;
        order.status = OrderStatus::Paid;
        Ok(())
    }

    async fn my_orders(&self, _token: &str, user_id: UserId) -> GatewayResult<Vec<Order>> {
        let state = self.record("my_orders");
        if state.fail_my_orders {
            return Err(status(503, "Order service down"));
        }
        Ok(state
            .orders
            .iter()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn branch_orders(&self, _token: &str, branch_id: BranchId) -> GatewayResult<Vec<Order>> {
        let state = self.record("branch_orders");
        Ok(state
            .orders
            .iter()
            .filter(|o| o.branch_id == branch_id)
            .cloned()
            .collect())
    }

    async fn update_order_status(
        &self,
        _token: &str,
        order_id: OrderId,
        status_to: OrderStatus,
    ) -> GatewayResult<()> {
        let mut state = self.record("update_order_status");
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| status(404, "Order not found"))?;
        order.status = status_to;
        Ok(())
    }
}

pub mod http {
    use std::{sync::Arc, time::Duration};

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use food_storefront::{routes::create_app, session::SessionStore, state::AppState};

    use super::FakeGateway;

    pub fn app(gateway: &FakeGateway) -> (Router, AppState) {
        let state = AppState::new(
            Arc::new(gateway.clone()),
            SessionStore::in_memory(),
            Duration::from_secs(5),
        );
        (create_app(state.clone()), state)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = session {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {session}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Logs in through the edge and returns the session id to send as bearer.
    pub async fn login(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": "secret" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["session_id"]
            .as_str()
            .expect("session id")
            .to_string()
    }
}
