use std::env;

use auth::JwtConfigError;
use auth::JwtSettings;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Secret used when none is configured and `RUN_MODE` is `development`.
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-key-change-in-production-min-32-chars";

const DEVELOPMENT_MODE: &str = "development";
const PRODUCTION_MODE: &str = "production";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

fn default_expiration_minutes() -> i64 {
    24 * 60
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

impl JwtConfig {
    /// Validate the token configuration.
    ///
    /// A missing secret is only tolerated in development mode, where the
    /// built-in [`DEVELOPMENT_JWT_SECRET`] is used and a warning is logged.
    ///
    /// # Arguments
    /// * `run_mode` - Value of `RUN_MODE`
    ///
    /// # Errors
    /// * `SecretTooShort` - Secret missing outside development, or under 32 bytes
    /// * `ExpirationTooShort` / `ExpirationTooLong` - Lifetime outside 1 minute to 30 days
    pub fn settings(&self, run_mode: &str) -> Result<JwtSettings, JwtConfigError> {
        let secret = match (&self.secret, run_mode) {
            (Some(secret), _) if !secret.is_empty() => secret.clone(),
            (_, DEVELOPMENT_MODE) => {
                tracing::warn!("JWT secret not configured, using the development secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
            (secret, _) => secret.clone().unwrap_or_default(),
        };

        JwtSettings::new(
            secret,
            chrono::Duration::minutes(self.expiration_minutes),
        )
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", Self::run_mode())).required(false))
            // Example: JWT__EXPIRATION_MINUTES=60 overrides jwt.expiration_minutes
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    /// Current run mode, `production` unless `RUN_MODE` says otherwise.
    ///
    /// The development secret fallback therefore needs an explicit
    /// `RUN_MODE=development`.
    pub fn run_mode() -> String {
        run_mode_or_default(env::var("RUN_MODE").ok())
    }
}

fn run_mode_or_default(value: Option<String>) -> String {
    value
        .map(|mode| mode.trim().to_string())
        .filter(|mode| !mode.is_empty())
        .unwrap_or_else(|| PRODUCTION_MODE.to_string())
}
