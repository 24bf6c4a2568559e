use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{error::AppError, models::BranchId, session::Session, state::AppState};

/// The caller's session, resolved from `Authorization: Bearer <session id>`.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// Seller endpoints act on the seller's own branch.
pub fn ensure_seller(session: &Session) -> Result<BranchId, AppError> {
    if !session.is_seller() {
        return Err(AppError::Forbidden);
    }
    session.branch_id.ok_or(AppError::Forbidden)
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;
        let Some(raw) = auth_str.strip_prefix("Bearer ") else {
            return Err(AppError::Unauthorized);
        };
        let session_id = Uuid::parse_str(raw.trim()).map_err(|_| AppError::Unauthorized)?;

        let session = state
            .sessions
            .get(session_id)
            .await
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentSession(session))
    }
}
