use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::{BranchId, FoodId, OrderId},
    response::{ApiResponse, Meta},
};

/// Failure talking to the remote Catalog/Order Gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway answered with a non-success status.
    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("Gateway unreachable: {0}")]
    Transport(String),

    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    Validation(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Quantity {0} is out of range")]
    InvalidQuantity(i32),

    #[error("Cart is empty")]
    EmptyCart,

    #[error(
        "Cart holds items from branch {current_branch}; food {food_id} belongs to branch {attempted_branch}"
    )]
    VendorConflict {
        food_id: FoodId,
        attempted_branch: BranchId,
        current_branch: BranchId,
    },

    #[error("Coupon rejected: {0}")]
    CouponRejected(String),

    #[error("Order creation failed: {0}")]
    OrderCreationFailed(#[source] GatewayError),

    #[error("Payment for order {order_id} failed: {source}")]
    PaymentFailed {
        order_id: OrderId,
        #[source]
        source: GatewayError,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflict: Option<ConflictData>,
}

#[derive(Serialize)]
struct ConflictData {
    food_id: FoodId,
    attempted_branch: BranchId,
    current_branch: BranchId,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::EmptyCart => StatusCode::BAD_REQUEST,
            AppError::MissingFields(_) | AppError::InvalidQuantity(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::VendorConflict { .. } => StatusCode::CONFLICT,
            AppError::CouponRejected(_) => StatusCode::BAD_REQUEST,
            AppError::PaymentFailed { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::OrderCreationFailed(err) | AppError::Gateway(err) => gateway_status(err),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// 4xx from the gateway is the caller's problem and is passed through; anything
// else means the upstream is broken.
fn gateway_status(err: &GatewayError) -> StatusCode {
    err.status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|code| code.is_client_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let conflict = match &self {
            AppError::VendorConflict {
                food_id,
                attempted_branch,
                current_branch,
            } => Some(ConflictData {
                food_id: *food_id,
                attempted_branch: *attempted_branch,
                current_branch: *current_branch,
            }),
            _ => None,
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
                conflict,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type GatewayResult<T> = Result<T, GatewayError>;
