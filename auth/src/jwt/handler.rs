use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use super::settings::JwtSettings;

/// Algorithms accepted when parsing. Anything outside the HMAC-SHA family is
/// rejected before the signature is looked at.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT token handler: issues, parses and renews session tokens.
///
/// Signs with HS256 using the shared secret from [`JwtSettings`]. Holds no
/// mutable state and can be shared behind an `Arc` by every request task.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiration: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler from validated settings.
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret()),
            decoding_key: DecodingKey::from_secret(settings.secret()),
            algorithm: Algorithm::HS256,
            expiration: settings.expiration(),
        }
    }

    /// Lifetime of every token this handler issues.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }

    /// Issue a token for a subject.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `username` - Display name
    /// * `role` - Role tag
    ///
    /// # Returns
    /// Signed JWT string expiring `expiration()` from now
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn generate_token(
        &self,
        subject: impl ToString,
        username: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, username, role, Utc::now(), self.expiration);
        self.encode(&claims)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim is in the past (no leeway)
    /// * `UnexpectedAlgorithm` - The header names a non-HMAC algorithm
    /// * `InvalidToken` - Bad signature, malformed token or missing claims
    pub fn parse_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidAlgorithm => JwtError::UnexpectedAlgorithm,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Renew a still-valid token.
    ///
    /// The new token carries the same subject, username and role with a
    /// fresh issue time and expiry. Timestamps have second precision, so the
    /// new issue time is at least one second after the old one and the
    /// expiry always moves forward. An expired or tampered token cannot be
    /// renewed.
    pub fn refresh_token(&self, token: &str) -> Result<String, JwtError> {
        let claims = self.parse_token(token)?;
        let issued_at = DateTime::from_timestamp(claims.iat + 1, 0)
            .map_or_else(Utc::now, |next| next.max(Utc::now()));

        self.encode(&Claims::new(
            &claims.sub,
            claims.username,
            claims.role,
            issued_at,
            self.expiration,
        ))
    }

    fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "my_secret_key_at_least_32_bytes_long!";

    fn handler_with(secret: &str, expiration: Duration) -> JwtHandler {
        JwtHandler::new(&JwtSettings::new(secret, expiration).unwrap())
    }

    fn handler() -> JwtHandler {
        handler_with(SECRET, Duration::hours(1))
    }

    fn split(token: &str) -> Vec<&str> {
        token.split('.').collect()
    }

    #[test]
    fn test_generate_and_parse() {
        let handler = handler();

        let token = handler
            .generate_token("user123", "alice", "admin")
            .expect("Failed to generate token");
        assert_eq!(split(&token).len(), 3);

        let claims = handler.parse_token(&token).expect("Failed to parse token");
        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_parse_invalid_token() {
        let result = handler().parse_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_parse_empty_token() {
        assert!(handler().parse_token("").is_err());
    }

    #[test]
    fn test_parse_with_wrong_secret() {
        let issuer = handler_with("secret1_at_least_32_bytes_long_key!", Duration::hours(1));
        let verifier = handler_with("secret2_at_least_32_bytes_long_key!", Duration::hours(1));

        let token = issuer.generate_token("user123", "alice", "user").unwrap();

        let result = verifier.parse_token(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_parse_expired_token() {
        let handler = handler();
        let issued_at = Utc::now() - Duration::hours(2);
        let claims = Claims::new("user123", "alice", "user", issued_at, Duration::hours(1));
        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.parse_token(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_parse_just_expired_token_has_no_leeway() {
        let handler = handler();
        let issued_at = Utc::now() - Duration::seconds(70);
        let claims = Claims::new("user123", "alice", "user", issued_at, Duration::seconds(60));
        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.parse_token(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_parse_tampered_payload() {
        let handler = handler();
        let user_token = handler.generate_token("user123", "alice", "user").unwrap();
        let admin_token = handler.generate_token("user123", "alice", "admin").unwrap();

        let user_parts = split(&user_token);
        let admin_parts = split(&admin_token);
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        let result = handler.parse_token(&forged);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_parse_rejects_non_hmac_algorithm() {
        let handler = handler();
        let token = handler.generate_token("user123", "alice", "user").unwrap();
        let parts = split(&token);

        // {"alg":"RS256","typ":"JWT"}
        let forged = format!(
            "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}.{}",
            parts[1], parts[2]
        );

        assert_eq!(
            handler.parse_token(&forged),
            Err(JwtError::UnexpectedAlgorithm)
        );
    }

    #[test]
    fn test_parse_rejects_none_algorithm() {
        let handler = handler();
        let token = handler.generate_token("user123", "alice", "user").unwrap();
        let parts = split(&token);

        // {"alg":"none","typ":"JWT"}
        let forged = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", parts[1]);

        assert!(handler.parse_token(&forged).is_err());
    }

    #[test]
    fn test_parse_accepts_other_hmac_variants() {
        let handler = handler();
        let claims = Claims::new("user123", "alice", "user", Utc::now(), Duration::hours(1));
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(handler.parse_token(&token), Ok(claims));
    }

    #[test]
    fn test_refresh_extends_expiry() {
        let handler = handler();
        let issued_at = Utc::now() - Duration::minutes(10);
        let old_claims = Claims::new("user123", "alice", "user", issued_at, Duration::hours(1));
        let old_token = handler.encode(&old_claims).unwrap();

        let new_token = handler.refresh_token(&old_token).expect("Failed to refresh");
        let new_claims = handler.parse_token(&new_token).unwrap();

        assert!(new_claims.exp > old_claims.exp);
        assert_eq!(new_claims.sub, old_claims.sub);
        assert_eq!(new_claims.username, old_claims.username);
        assert_eq!(new_claims.role, old_claims.role);
    }

    #[test]
    fn test_refresh_of_fresh_token_moves_expiry_forward() {
        let handler = handler();

        for _ in 0..20 {
            let token = handler.generate_token("user123", "alice", "user").unwrap();
            let refreshed = handler.refresh_token(&token).unwrap();

            assert_ne!(refreshed, token);
            let old_claims = handler.parse_token(&token).unwrap();
            let new_claims = handler.parse_token(&refreshed).unwrap();
            assert!(new_claims.iat > old_claims.iat);
            assert!(new_claims.exp > old_claims.exp);
            assert_eq!(new_claims.exp - new_claims.iat, handler.expiration().num_seconds());
        }
    }

    #[test]
    fn test_refresh_chain_keeps_moving_forward() {
        let handler = handler();
        let first = handler.generate_token("user123", "alice", "user").unwrap();
        let second = handler.refresh_token(&first).unwrap();
        let third = handler.refresh_token(&second).unwrap();

        let second_exp = handler.parse_token(&second).unwrap().exp;
        let third_exp = handler.parse_token(&third).unwrap().exp;
        assert!(third_exp > second_exp);
    }

    #[test]
    fn test_refresh_expired_token_fails() {
        let handler = handler();
        let issued_at = Utc::now() - Duration::hours(2);
        let claims = Claims::new("user123", "alice", "user", issued_at, Duration::hours(1));
        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.refresh_token(&token), Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_refresh_tampered_token_fails() {
        let handler = handler();
        let token = handler.generate_token("user123", "alice", "user").unwrap();
        let forged = format!("{}x", token);

        assert!(handler.refresh_token(&forged).is_err());
    }

    #[test]
    fn test_rejections_are_not_server_errors() {
        assert!(JwtError::TokenExpired.is_rejection());
        assert!(JwtError::UnexpectedAlgorithm.is_rejection());
        assert!(JwtError::InvalidToken("bad".to_string()).is_rejection());
        assert!(!JwtError::EncodingFailed("boom".to_string()).is_rejection());
    }
}
