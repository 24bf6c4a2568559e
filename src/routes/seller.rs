use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::{
        orders::UpdateOrderStatusRequest,
        seller::{CreateCouponRequest, CreateFoodRequest},
    },
    error::AppResult,
    middleware::auth::CurrentSession,
    models::{Food, FoodId, Order, OrderId},
    response::{ApiResponse, Meta},
    services::{catalog_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/{id}", delete(delete_food))
        .route("/coupons", post(create_coupon))
        .route("/coupons/{code}", delete(delete_coupon))
}

fn done(message: &str) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        message,
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/seller/orders",
    responses(
        (status = 200, description = "Orders for the seller's branch", body = ApiResponse<Vec<Order>>),
        (status = 403, description = "Not a seller")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = order_service::branch_orders(state.gateway.as_ref(), &session).await?;
    Ok(Json(ApiResponse::list("Ok", orders)))
}

#[utoipa::path(
    put,
    path = "/api/seller/orders/{id}/status",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<OrderId>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order =
        order_service::update_order_status(state.gateway.as_ref(), &session, id, payload.status)
            .await?;
    Ok(Json(ApiResponse::success("Order status updated", order, None)))
}

#[utoipa::path(
    get,
    path = "/api/seller/foods",
    responses(
        (status = 200, description = "The branch's menu", body = ApiResponse<Vec<Food>>)
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn list_foods(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<Vec<Food>>>> {
    let foods = catalog_service::menu(state.gateway.as_ref(), &session).await?;
    Ok(Json(ApiResponse::list("OK", foods)))
}

#[utoipa::path(
    post,
    path = "/api/seller/foods",
    request_body = CreateFoodRequest,
    responses(
        (status = 201, description = "Food created", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid food")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn create_food(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<CreateFoodRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    catalog_service::create_food(state.gateway.as_ref(), &session, payload).await?;
    Ok((StatusCode::CREATED, done("Food created")))
}

#[utoipa::path(
    delete,
    path = "/api/seller/foods/{id}",
    params(
        ("id" = i64, Path, description = "Food ID")
    ),
    responses(
        (status = 200, description = "Food deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Food not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn delete_food(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<FoodId>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    catalog_service::delete_food(state.gateway.as_ref(), &session, id).await?;
    Ok(done("Food deleted"))
}

#[utoipa::path(
    post,
    path = "/api/seller/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 201, description = "Coupon created", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid coupon")
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    catalog_service::create_coupon(state.gateway.as_ref(), &session, payload).await?;
    Ok((StatusCode::CREATED, done("Coupon created")))
}

#[utoipa::path(
    delete,
    path = "/api/seller/coupons/{code}",
    params(
        ("code" = String, Path, description = "Coupon code")
    ),
    responses(
        (status = 200, description = "Coupon deleted", body = ApiResponse<serde_json::Value>)
    ),
    security(("bearer_auth" = [])),
    tag = "Seller"
)]
pub async fn delete_coupon(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    catalog_service::delete_coupon(state.gateway.as_ref(), &session, &code).await?;
    Ok(done("Coupon deleted"))
}
