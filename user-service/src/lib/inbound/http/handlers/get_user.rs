use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::Identity;
use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Public profile lookup. The email address is included only when the caller
/// is the profile owner or an admin.
pub async fn get_user(
    State(state): State<AppState>,
    identity: Option<Identity>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let user = state.user_service.get_user(&user_id).await?;

    let sees_private = identity.is_some_and(|identity| {
        identity.subject_id() == user.id || identity.role() == Role::Admin.as_str()
    });
    let data = if sees_private {
        UserData::private(&user)
    } else {
        UserData::public(&user)
    };

    Ok(ApiSuccess::new(StatusCode::OK, data))
}
