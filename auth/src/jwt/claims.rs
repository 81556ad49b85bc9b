use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session claims carried by every access token.
///
/// `exp` is always `iat` plus the configured token lifetime. Once signed the
/// claims are fixed; renewing a session means issuing a new token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display name of the subject
    pub username: String,

    /// Role tag used for authorization
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user session.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `username` - Display name
    /// * `role` - Role tag
    /// * `issued_at` - Issue instant
    /// * `lifetime` - Token lifetime added to `issued_at`
    pub fn new(
        subject: impl ToString,
        username: impl Into<String>,
        role: impl Into<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            username: username.into(),
            role: role.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let now = Utc::now();
        let claims = Claims::new("user123", "alice", "user", now, Duration::hours(24));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_wire_field_names() {
        let issued_at = DateTime::from_timestamp(10, 0).unwrap();
        let claims = Claims::new("42", "alice", "admin", issued_at, Duration::seconds(60));

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sub": "42",
                "username": "alice",
                "role": "admin",
                "iat": 10,
                "exp": 70
            })
        );
    }
}
