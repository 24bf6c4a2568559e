use rust_decimal::Decimal;

use crate::{
    dto::seller::{CreateCouponRequest, CreateFoodRequest, FoodForm},
    error::{AppError, AppResult},
    gateway::Gateway,
    middleware::auth::ensure_seller,
    models::{BranchId, Food, FoodGroup, FoodId, FoodOption},
    session::Session,
};

pub async fn search(gateway: &dyn Gateway, query: Option<&str>) -> AppResult<Vec<FoodGroup>> {
    let query = query.map(str::trim).unwrap_or_default();
    Ok(gateway.search_foods(query).await?)
}

pub async fn options(gateway: &dyn Gateway, name: &str) -> AppResult<Vec<FoodOption>> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("food name is required".into()));
    }
    Ok(gateway.food_options(name).await?)
}

/// Display name of a branch. Falls back to `Branch #<id>` when the gateway
/// can't say.
pub async fn branch_name(gateway: &dyn Gateway, branch_id: BranchId) -> String {
    match gateway.branch(branch_id).await {
        Ok(branch) => branch.name,
        Err(err) => {
            tracing::warn!(branch_id, error = %err, "branch lookup failed");
            format!("Branch #{branch_id}")
        }
    }
}

pub async fn menu(gateway: &dyn Gateway, session: &Session) -> AppResult<Vec<Food>> {
    let branch_id = ensure_seller(session)?;
    Ok(gateway.branch_foods(&session.token, branch_id).await?)
}

pub async fn create_food(
    gateway: &dyn Gateway,
    session: &Session,
    mut payload: CreateFoodRequest,
) -> AppResult<()> {
    let branch_id = ensure_seller(session)?;
    payload.name = payload.name.trim().to_string();
    if payload.name.is_empty() {
        return Err(AppError::Validation("food name is required".into()));
    }
    if payload.price <= Decimal::ZERO {
        return Err(AppError::Validation("price must be greater than 0".into()));
    }
    if payload.discount > 100 {
        return Err(AppError::Validation("discount must be between 0 and 100".into()));
    }

    let form = FoodForm::for_branch(payload, branch_id);
    gateway.create_food(&session.token, &form).await?;
    tracing::info!(branch_id, name = %form.name, "food created");
    Ok(())
}

pub async fn delete_food(gateway: &dyn Gateway, session: &Session, food_id: FoodId) -> AppResult<()> {
    let branch_id = ensure_seller(session)?;
    gateway.delete_food(&session.token, food_id).await?;
    tracing::info!(branch_id, food_id, "food deleted");
    Ok(())
}

pub async fn create_coupon(
    gateway: &dyn Gateway,
    session: &Session,
    mut payload: CreateCouponRequest,
) -> AppResult<()> {
    let branch_id = ensure_seller(session)?;
    payload.code = payload.code.trim().to_uppercase();
    if payload.code.is_empty() {
        return Err(AppError::Validation("coupon code is required".into()));
    }
    if !(1..=100).contains(&payload.discount_percent) {
        return Err(AppError::Validation(
            "discount_percent must be between 1 and 100".into(),
        ));
    }

    gateway.create_coupon(&session.token, &payload).await?;
    tracing::info!(branch_id, code = %payload.code, "coupon created");
    Ok(())
}

pub async fn delete_coupon(gateway: &dyn Gateway, session: &Session, code: &str) -> AppResult<()> {
    let branch_id = ensure_seller(session)?;
    let code = code.trim().to_uppercase();
    gateway.delete_coupon(&session.token, &code).await?;
    tracing::info!(branch_id, code = %code, "coupon deleted");
    Ok(())
}
