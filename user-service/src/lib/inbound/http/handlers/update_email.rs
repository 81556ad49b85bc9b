use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Identity;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Change the caller's login email. Returns the caller's own account view.
pub async fn update_email(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<UpdateEmailRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let email = EmailAddress::new(body.new_email).map_err(UserError::from)?;

    state
        .user_service
        .update_email(&identity.subject_id(), email)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, UserData::private(user)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEmailRequest {
    new_email: String,
}
