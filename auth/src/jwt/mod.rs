pub mod claims;
pub mod errors;
pub mod handler;
pub mod settings;

pub use claims::Claims;
pub use errors::JwtConfigError;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use settings::JwtSettings;
