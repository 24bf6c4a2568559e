use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{BranchId, UserId};

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body of the gateway's `/register`; accounts created here are always buyers.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GatewayRegisterRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub address: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GatewayLoginResponse {
    pub access_token: String,
    pub role: String,
    #[serde(default)]
    pub seller_mode: Option<serde_json::Value>,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    #[serde(default)]
    pub id: Option<UserId>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub role: String,
    pub user_id: Option<UserId>,
    pub branch_id: Option<BranchId>,
}
