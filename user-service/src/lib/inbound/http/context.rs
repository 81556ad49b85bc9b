use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use http::Extensions;
use http::Request;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::user::models::Identity;
use crate::domain::user::models::UserId;

/// Returned by identity accessors on a request that was never authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No authenticated identity on this request")]
pub struct IdentityMissing;

/// Read access to the identity attached by the authentication middleware.
///
/// The `must_*` accessors are for handlers mounted behind `authenticate`,
/// where a missing identity means the route was wired wrong. They panic.
pub trait IdentityContext {
    fn identity(&self) -> Option<&Identity>;

    fn subject_id(&self) -> Result<UserId, IdentityMissing> {
        self.identity()
            .map(Identity::subject_id)
            .ok_or(IdentityMissing)
    }

    fn display_name(&self) -> Result<&str, IdentityMissing> {
        self.identity()
            .map(Identity::display_name)
            .ok_or(IdentityMissing)
    }

    fn role(&self) -> Result<&str, IdentityMissing> {
        self.identity().map(Identity::role).ok_or(IdentityMissing)
    }

    fn must_subject_id(&self) -> UserId {
        match self.subject_id() {
            Ok(id) => id,
            Err(e) => panic!("{e}: route is not behind the authentication middleware"),
        }
    }

    fn must_display_name(&self) -> &str {
        match self.display_name() {
            Ok(name) => name,
            Err(e) => panic!("{e}: route is not behind the authentication middleware"),
        }
    }

    fn must_role(&self) -> &str {
        match self.role() {
            Ok(role) => role,
            Err(e) => panic!("{e}: route is not behind the authentication middleware"),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    fn has_role(&self, role: &str) -> bool {
        self.role().is_ok_and(|r| r == role)
    }

    fn has_any_role(&self, roles: &[&str]) -> bool {
        self.role().is_ok_and(|r| roles.contains(&r))
    }
}

impl IdentityContext for Extensions {
    fn identity(&self) -> Option<&Identity> {
        self.get::<Identity>()
    }
}

impl<B> IdentityContext for Request<B> {
    fn identity(&self) -> Option<&Identity> {
        self.extensions().identity()
    }
}

impl IdentityContext for Parts {
    fn identity(&self) -> Option<&Identity> {
        self.extensions.identity()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .identity()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn authenticated_request(role: &str) -> (Request<Body>, UserId) {
        let user_id = UserId::new();
        let mut request = Request::new(Body::empty());
        request
            .extensions_mut()
            .insert(Identity::new(user_id, "alice", role));
        (request, user_id)
    }

    #[test]
    fn test_accessors_on_authenticated_request() {
        let (request, user_id) = authenticated_request("admin");

        assert_eq!(request.subject_id(), Ok(user_id));
        assert_eq!(request.display_name(), Ok("alice"));
        assert_eq!(request.role(), Ok("admin"));
        assert_eq!(request.must_subject_id(), user_id);
        assert_eq!(request.must_display_name(), "alice");
        assert_eq!(request.must_role(), "admin");
        assert!(request.is_authenticated());
    }

    #[test]
    fn test_accessors_on_anonymous_request() {
        let request = Request::new(Body::empty());

        assert_eq!(request.subject_id(), Err(IdentityMissing));
        assert_eq!(request.display_name(), Err(IdentityMissing));
        assert_eq!(request.role(), Err(IdentityMissing));
        assert!(!request.is_authenticated());
        assert!(!request.has_role("user"));
        assert!(!request.has_any_role(&["user", "admin"]));
    }

    #[test]
    #[should_panic(expected = "No authenticated identity")]
    fn test_must_subject_id_panics_without_identity() {
        Request::new(Body::empty()).must_subject_id();
    }

    #[test]
    fn test_role_predicates_use_exact_match() {
        let (request, _) = authenticated_request("admin");

        assert!(request.has_role("admin"));
        assert!(!request.has_role("Admin"));
        assert!(!request.has_role("user"));
        assert!(request.has_any_role(&["user", "admin"]));
        assert!(!request.has_any_role(&["user", "moderator"]));
        assert!(!request.has_any_role(&[]));
    }

    #[tokio::test]
    async fn test_extractor() {
        let (request, user_id) = authenticated_request("user");
        let (mut parts, _) = request.into_parts();
        assert_eq!(parts.subject_id(), Ok(user_id));

        let identity = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.subject_id(), user_id);

        let (mut anonymous, _) = Request::new(Body::empty()).into_parts();
        let rejection = Identity::from_request_parts(&mut anonymous, &())
            .await
            .unwrap_err();
        assert!(matches!(rejection, ApiError::Unauthorized(_)));
    }
}
