use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult, middleware::auth::CurrentSession, poller::OrderHistory,
    response::ApiResponse, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(order_history))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Latest snapshot of the buyer's order history; `loading` is true until the first fetch lands", body = ApiResponse<OrderHistory>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn order_history(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<OrderHistory>>> {
    session.require_user_id()?;
    let workspace = state.workspaces.get_or_create(session.id).await;
    let mut workspace = workspace.lock().await;
    let history = workspace.order_history(
        state.gateway.clone(),
        &session,
        state.order_refresh,
        state.history_idle,
    );
    Ok(Json(ApiResponse::success("Ok", history, None)))
}
