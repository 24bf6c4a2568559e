use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewAddressRequest {
    pub title: String,
    pub address: String,
    pub phone: String,
}
