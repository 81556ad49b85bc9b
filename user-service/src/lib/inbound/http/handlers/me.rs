use axum::http::StatusCode;

use super::ApiSuccess;
use super::IdentityData;
use crate::domain::user::models::Identity;

pub async fn me(identity: Identity) -> ApiSuccess<IdentityData> {
    ApiSuccess::new(StatusCode::OK, (&identity).into())
}
