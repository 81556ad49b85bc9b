//! Credential and session token primitives.
//!
//! - Password hashing (Argon2id, PHC strings, constant-time verification)
//! - HS256 session tokens with validated settings
//!
//! Services adapt these into their own ports; nothing here knows about users,
//! storage or HTTP.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Sup3rSecret!").unwrap();
//! assert!(hasher.verify("Sup3rSecret!", &hash));
//! assert!(!hasher.verify("wrong", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{JwtHandler, JwtSettings};
//! use chrono::Duration;
//!
//! let settings = JwtSettings::new("secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//! let handler = JwtHandler::new(&settings);
//!
//! let token = handler.generate_token(42, "alice", "user").unwrap();
//! let claims = handler.parse_token(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert_eq!(claims.role, "user");
//! ```

pub mod jwt;
pub mod password;

pub use jwt::Claims;
pub use jwt::JwtConfigError;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::JwtSettings;
pub use password::PasswordError;
pub use password::PasswordHasher;
