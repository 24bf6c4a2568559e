use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    middleware::auth::CurrentSession,
    response::{ApiResponse, Meta},
    services::auth_service::{login_user, logout_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Buyer account created", body = ApiResponse<serde_json::Value>),
        (status = 422, description = "Missing fields"),
        (status = 400, description = "Password confirmation mismatch or rejected by gateway")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    register_user(state.gateway.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Registered",
            serde_json::json!({}),
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let session = login_user(state.gateway.as_ref(), &state.sessions, payload).await?;
    let data = LoginResponse {
        session_id: session.id,
        role: session.role,
        user_id: session.user_id,
        branch_id: session.branch_id,
    };
    Ok(Json(ApiResponse::success("Logged in", data, None)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session closed", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "No session")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.workspaces.close(session.id).await;
    logout_user(&state.sessions, &session).await?;
    Ok(Json(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
