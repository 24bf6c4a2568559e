use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::cart::{AddToCartRequest, ApplyCouponRequest, CartView, UpdateCartRequest},
    error::AppResult,
    middleware::auth::CurrentSession,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(cart_view)
                .post(add_to_cart)
                .put(update_quantity)
                .delete(clear_cart),
        )
        .route("/replace", post(replace_cart))
        .route("/coupon", post(apply_coupon))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart reloaded from the gateway with totals", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn cart_view(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    workspace
        .reload_cart(state.gateway.as_ref(), &session)
        .await?;
    let view = workspace.cart_view(state.gateway.as_ref()).await;
    Ok(Json(ApiResponse::success("OK", view, None)))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartView>),
        (status = 409, description = "Cart holds another branch's items"),
        (status = 422, description = "Quantity below 1"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    let cart = workspace
        .synced_cart(state.gateway.as_ref(), &session)
        .await?;
    cart_service::add_item(state.gateway.as_ref(), &session, cart, payload).await?;
    Ok(Json(ApiResponse::success(
        "Added to cart",
        workspace.cart_view(state.gateway.as_ref()).await,
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/cart/replace",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Cart cleared and item added", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn replace_cart(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    let cart = workspace
        .synced_cart(state.gateway.as_ref(), &session)
        .await?;
    cart_service::replace_with(state.gateway.as_ref(), &session, cart, payload).await?;
    Ok(Json(ApiResponse::success(
        "Cart replaced",
        workspace.cart_view(state.gateway.as_ref()).await,
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/cart",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartView>),
        (status = 404, description = "Food not in cart"),
        (status = 422, description = "Quantity below 1"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    let cart = workspace
        .synced_cart(state.gateway.as_ref(), &session)
        .await?;
    cart_service::update_quantity(state.gateway.as_ref(), &session, cart, payload).await?;
    Ok(Json(ApiResponse::success(
        "Quantity updated",
        workspace.cart_view(state.gateway.as_ref()).await,
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    cart_service::clear(state.gateway.as_ref(), &session, &mut workspace.cart).await?;
    Ok(Json(ApiResponse::success(
        "Cart cleared",
        workspace.cart_view(state.gateway.as_ref()).await,
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/cart/coupon",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon applied", body = ApiResponse<CartView>),
        (status = 400, description = "Empty cart or coupon rejected"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    let cart = workspace
        .synced_cart(state.gateway.as_ref(), &session)
        .await?;
    let coupon =
        cart_service::apply_coupon(state.gateway.as_ref(), &session, cart, &payload.code).await?;
    Ok(Json(ApiResponse::success(
        format!("Coupon {} applied: {}% off", coupon.code, coupon.discount_percent),
        workspace.cart_view(state.gateway.as_ref()).await,
        None,
    )))
}
