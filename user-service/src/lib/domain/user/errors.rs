use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username contains invalid characters (only letters, digits and underscore allowed)")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for new passwords that do not meet the password policy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Password too weak: use at least two of uppercase letters, lowercase letters, digits and symbols"
    )]
    TooWeak,
}

/// Error for stored password hashes that are not well-formed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordHashError {
    #[error("Password hash is not a PHC string")]
    InvalidFormat,

    #[error("Password hash length out of range: expected {min}-{max}, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },
}

/// Error for role or status tags that are not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown user status: {0}")]
    UnknownStatus(String),
}

/// Coarse classification of a [`UserError`], used by adapters to pick a
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Permission,
    Conflict,
    NotFound,
    Internal,
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid password hash: {0}")]
    InvalidPasswordHash(#[from] PasswordHashError),

    #[error("Invalid value: {0}")]
    InvalidTag(#[from] TagError),

    // Domain-level errors
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Account is banned")]
    AccountBanned,

    #[error("Old password is incorrect")]
    OldPasswordIncorrect,

    #[error("User not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidTag(_) => ErrorKind::Validation,
            UserError::InvalidCredentials | UserError::OldPasswordIncorrect => {
                ErrorKind::Authentication
            }
            UserError::AccountInactive | UserError::AccountBanned => ErrorKind::Permission,
            UserError::UsernameTaken(_) | UserError::EmailAlreadyExists(_) => ErrorKind::Conflict,
            UserError::NotFound(_) => ErrorKind::NotFound,
            // A malformed stored hash is corrupt data, not bad input.
            UserError::InvalidPasswordHash(_)
            | UserError::PasswordHashing(_)
            | UserError::DatabaseError(_) => ErrorKind::Internal,
        }
    }
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::PasswordHashing(err.to_string())
    }
}
