use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed email cannot belong to an account.
    let email = EmailAddress::new(body.email).map_err(|_| UserError::InvalidCredentials)?;

    let identity = state
        .user_service
        .login(LoginCommand {
            email,
            password: body.password,
        })
        .await?;

    let token = state.jwt_handler.generate_token(
        identity.subject_id(),
        identity.display_name(),
        identity.role(),
    )?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.jwt_handler.expiration().num_seconds(),
            user: (&identity).into(),
        },
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: IdentityData,
}
