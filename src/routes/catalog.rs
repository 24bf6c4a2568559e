use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    error::AppResult,
    models::{FoodGroup, FoodOption},
    response::ApiResponse,
    routes::params::{OptionsQuery, SearchQuery},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/options", get(options))
}

#[utoipa::path(
    get,
    path = "/api/catalog/search",
    params(
        ("q" = Option<String>, Query, description = "Food name to look for; empty lists everything")
    ),
    responses(
        (status = 200, description = "Foods grouped by name", body = ApiResponse<Vec<FoodGroup>>)
    ),
    tag = "Catalog"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<FoodGroup>>>> {
    let foods = catalog_service::search(state.gateway.as_ref(), query.q.as_deref()).await?;
    Ok(Json(ApiResponse::list("OK", foods)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/options",
    params(
        ("name" = String, Query, description = "Exact food name")
    ),
    responses(
        (status = 200, description = "Branches selling the food", body = ApiResponse<Vec<FoodOption>>),
        (status = 400, description = "Missing name")
    ),
    tag = "Catalog"
)]
pub async fn options(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> AppResult<Json<ApiResponse<Vec<FoodOption>>>> {
    let options = catalog_service::options(state.gateway.as_ref(), &query.name).await?;
    Ok(Json(ApiResponse::list("OK", options)))
}
