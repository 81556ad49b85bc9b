use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::extract_token;
use crate::inbound::http::router::AppState;

/// Issue a new token for the one presented. Mounted behind `authenticate`,
/// so the token has already been verified once.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    let token = extract_token(&headers)
        .map_err(|_| ApiError::Unauthorized("Missing authorization token".to_string()))?;

    let token = state.jwt_handler.refresh_token(token)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshTokenResponseData {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_handler.expiration().num_seconds(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}
