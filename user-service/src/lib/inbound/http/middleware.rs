use std::fmt;
use std::sync::Arc;

use auth::JwtHandler;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::context::IdentityContext;
use super::handlers::ApiError;
use crate::domain::user::models::Identity;
use crate::domain::user::models::UserId;

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request could not be authenticated. Never carries the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingToken,
    MalformedHeader,
    InvalidToken,
    ExpiredToken,
    InvalidSubject,
}

impl Rejection {
    fn as_str(&self) -> &'static str {
        match self {
            Rejection::MissingToken => "missing token",
            Rejection::MalformedHeader => "malformed authorization header",
            Rejection::InvalidToken => "invalid token",
            Rejection::ExpiredToken => "expired token",
            Rejection::InvalidSubject => "invalid subject claim",
        }
    }

    fn into_response(self) -> Response {
        let message = match self {
            Rejection::MissingToken => "Missing authorization token",
            Rejection::MalformedHeader => "Invalid authorization header",
            Rejection::ExpiredToken => "Token expired",
            Rejection::InvalidToken | Rejection::InvalidSubject => "Invalid token",
        };
        ApiError::Unauthorized(message.to_string()).into_response()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pull the token out of the `Authorization` header.
///
/// Accepts `Bearer <token>` or a bare token. An absent or blank header is
/// `MissingToken`; `Bearer ` with nothing after it is `MalformedHeader`.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, Rejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Rejection::MissingToken)?
        .to_str()
        .map_err(|_| Rejection::MalformedHeader)?;

    if value.trim().is_empty() {
        return Err(Rejection::MissingToken);
    }

    match value.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some("") => Err(Rejection::MalformedHeader),
        Some(token) => Ok(token),
        // "Bearer " arrives as "Bearer" once surrounding whitespace is stripped
        None if value.trim() == BEARER_PREFIX.trim_end() => Err(Rejection::MalformedHeader),
        None => Ok(value.trim()),
    }
}

/// Verify the request's token and build the identity it carries.
fn identify(jwt_handler: &JwtHandler, headers: &HeaderMap) -> Result<Identity, Rejection> {
    let token = extract_token(headers)?;

    let claims = jwt_handler.parse_token(token).map_err(|e| match e {
        auth::JwtError::TokenExpired => Rejection::ExpiredToken,
        _ => Rejection::InvalidToken,
    })?;

    let subject_id = UserId::from_string(&claims.sub).map_err(|_| Rejection::InvalidSubject)?;

    Ok(Identity::new(subject_id, claims.username, claims.role))
}

/// Middleware that validates the bearer token and attaches an [`Identity`]
/// to the request extensions. Rejects with 401 before the handler runs.
pub async fn authenticate(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    match identify(&jwt_handler, req.headers()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(rejection) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                reason = %rejection,
                "Authentication rejected"
            );
            Err(rejection.into_response())
        }
    }
}

/// Like [`authenticate`], but a missing or invalid token lets the request
/// through anonymously instead of rejecting it.
pub async fn optional_authenticate(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Response {
    match identify(&jwt_handler, req.headers()) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
        }
        Err(Rejection::MissingToken) => {}
        Err(rejection) => {
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                reason = %rejection,
                "Ignoring unusable token on optional authentication route"
            );
        }
    }

    next.run(req).await
}

/// Roles allowed through [`require_role`]. Matching is exact string equality.
#[derive(Debug, Clone)]
pub struct RequiredRoles(Arc<[String]>);

impl RequiredRoles {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn permits(&self, role: &str) -> bool {
        self.0.iter().any(|required| required == role)
    }
}

/// Authorization guard. Must be layered inside [`authenticate`].
///
/// Responds 403 when the caller's role is not one of the required roles, or
/// when no identity is present at all.
pub async fn require_role(
    State(required): State<RequiredRoles>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let permitted = match req.role() {
        Ok(role) if required.permits(role) => true,
        Ok(role) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                role = %role,
                required = ?required.0,
                "Authorization denied"
            );
            false
        }
        Err(_) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                "Authorization guard reached without an identity"
            );
            false
        }
    };

    if !permitted {
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()).into_response());
    }

    Ok(next.run(req).await)
}
