use thiserror::Error;

/// Error type for password operations.
///
/// Verification has no error variant: a mismatch and a corrupt stored hash
/// are both reported as `false` by [`super::PasswordHasher::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
