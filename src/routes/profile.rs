use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    dto::profile::NewAddressRequest,
    error::AppResult,
    middleware::auth::CurrentSession,
    models::SavedAddress,
    response::{ApiResponse, Meta},
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/addresses", get(list_addresses).post(add_address))
}

#[utoipa::path(
    get,
    path = "/api/profile/addresses",
    responses(
        (status = 200, description = "The buyer's saved delivery addresses", body = ApiResponse<Vec<SavedAddress>>)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<Vec<SavedAddress>>>> {
    let addresses = profile_service::list_addresses(state.gateway.as_ref(), &session).await?;
    Ok(Json(ApiResponse::list("OK", addresses)))
}

#[utoipa::path(
    post,
    path = "/api/profile/addresses",
    request_body = NewAddressRequest,
    responses(
        (status = 201, description = "Address saved", body = ApiResponse<serde_json::Value>),
        (status = 422, description = "Blank title, address or phone")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn add_address(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<NewAddressRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    profile_service::add_address(state.gateway.as_ref(), &session, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Address saved",
            serde_json::json!({}),
            Some(Meta::empty()),
        )),
    ))
}
