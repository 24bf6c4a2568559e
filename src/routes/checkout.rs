use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::orders::{CheckoutReceipt, DeliveryInfo},
    error::AppResult,
    middleware::auth::CurrentSession,
    response::ApiResponse,
    services::{checkout_service::CheckoutState, profile_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(checkout_state).post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Where the shopper's checkout stands", body = ApiResponse<CheckoutState>)
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn checkout_state(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<CheckoutState>>> {
    let workspace = state.workspaces.get_or_create(session.id).await;
    let workspace = workspace.lock().await;
    Ok(Json(ApiResponse::success(
        "OK",
        workspace.checkout.state().clone(),
        None,
    )))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = DeliveryInfo,
    responses(
        (status = 200, description = "Order created and paid", body = ApiResponse<CheckoutReceipt>),
        (status = 404, description = "Unknown saved address"),
        (status = 422, description = "Missing delivery fields"),
        (status = 402, description = "Order created but payment failed"),
        (status = 502, description = "Gateway failure while creating the order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(delivery): Json<DeliveryInfo>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let delivery =
        profile_service::resolve_delivery(state.gateway.as_ref(), &session, delivery).await?;
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    workspace
        .synced_cart(state.gateway.as_ref(), &session)
        .await?;

    let workspace = &mut *workspace;
    if workspace.checkout.is_completed() && !workspace.cart.is_empty() {
        workspace.checkout.reset();
    }
    let receipt = workspace
        .checkout
        .submit(
            state.gateway.as_ref(),
            &session,
            &delivery,
            &mut workspace.cart,
        )
        .await?;

    Ok(Json(ApiResponse::success("Checkout success", receipt, None)))
}
