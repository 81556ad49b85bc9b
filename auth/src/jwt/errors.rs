use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token uses an unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}

impl JwtError {
    /// True for every failure caused by the presented token rather than by
    /// the server (expired, forged, malformed or wrongly signed).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, JwtError::EncodingFailed(_))
    }
}

/// Invalid token settings. Fatal at process start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtConfigError {
    #[error("JWT secret must be at least {min} bytes long (got {actual})")]
    SecretTooShort { min: usize, actual: usize },

    #[error("JWT expiration must be at least {min_seconds} seconds (got {actual_seconds})")]
    ExpirationTooShort {
        min_seconds: i64,
        actual_seconds: i64,
    },

    #[error("JWT expiration must not exceed {max_seconds} seconds (got {actual_seconds})")]
    ExpirationTooLong {
        max_seconds: i64,
        actual_seconds: i64,
    },
}
