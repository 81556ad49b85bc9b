use std::fmt;

use chrono::Duration;

use super::errors::JwtConfigError;

/// Validated token settings: the shared HMAC secret and the token lifetime.
///
/// Built once at startup and handed to [`super::JwtHandler::new`]. Rotating
/// the secret invalidates every token issued under the previous one.
#[derive(Clone)]
pub struct JwtSettings {
    secret: String,
    expiration: Duration,
}

impl JwtSettings {
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Shortest accepted token lifetime.
    pub fn min_expiration() -> Duration {
        Duration::minutes(1)
    }

    /// Longest accepted token lifetime.
    pub fn max_expiration() -> Duration {
        Duration::days(30)
    }

    /// Validate and build token settings.
    ///
    /// # Arguments
    /// * `secret` - Shared HMAC secret, at least 32 bytes
    /// * `expiration` - Token lifetime, between 1 minute and 30 days
    ///
    /// # Errors
    /// * `SecretTooShort` - Secret is shorter than 32 bytes
    /// * `ExpirationTooShort` / `ExpirationTooLong` - Lifetime out of bounds
    pub fn new(secret: impl Into<String>, expiration: Duration) -> Result<Self, JwtConfigError> {
        let secret = secret.into();

        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtConfigError::SecretTooShort {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }
        if expiration < Self::min_expiration() {
            return Err(JwtConfigError::ExpirationTooShort {
                min_seconds: Self::min_expiration().num_seconds(),
                actual_seconds: expiration.num_seconds(),
            });
        }
        if expiration > Self::max_expiration() {
            return Err(JwtConfigError::ExpirationTooLong {
                max_seconds: Self::max_expiration().num_seconds(),
                actual_seconds: expiration.num_seconds(),
            });
        }

        Ok(Self { secret, expiration })
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}
