//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup, validated, and then passed by
//! value to the components that need it. Nothing reads the environment after
//! startup.
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite URL (default: `sqlite://urls.db?mode=rwc`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `BASE_URL` - Public prefix for short URLs, e.g. `https://s.example.com`.
//!   When unset, short URLs are built from the request `Host` header.
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `ID_STRATEGY` - `random`, `base36` or `hex` (default: `random`)
//! - `ID_LENGTH` - Length of random identifiers (default: 6)
//! - `ID_MAX_ATTEMPTS` - Identifier collision retries per insert (default: 100)
//! - `DUPLICATE_POLICY` - `reuse` or `always_new` (default: `reuse`)
//! - `SESSION_SECRET` - Key for signing edit tokens. A random key is generated
//!   when unset, which invalidates outstanding tokens on restart.
//! - `EDIT_TOKEN_TTL_SECONDS` - Edit token lifetime (default: 3600)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_CONNECT_TIMEOUT` - Acquire and busy timeout in seconds (default: 30)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::application::services::DuplicatePolicy;
use crate::infrastructure::persistence::sqlite_url_repository::DEFAULT_MAX_ATTEMPTS;
use crate::utils::id_codec::{DEFAULT_RANDOM_LENGTH, IdCodec};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub base_url: Option<String>,
    pub log_level: String,
    pub log_format: String,
    pub id_codec: IdCodec,
    pub id_max_attempts: usize,
    pub duplicate_policy: DuplicatePolicy,
    /// HMAC key for edit tokens. Never logged.
    pub session_secret: String,
    pub edit_token_ttl_seconds: u64,

    // ── Pool settings ───────────────────────────────────────────────────────
    pub db_max_connections: u32,
    pub db_connect_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://urls.db?mode=rwc".to_string());
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let base_url = env::var("BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim_end_matches('/').to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let id_length: usize = parse_var("ID_LENGTH", DEFAULT_RANDOM_LENGTH)?;
        let id_codec = match env::var("ID_STRATEGY") {
            Ok(v) => IdCodec::from_str(&v).map_err(anyhow::Error::msg)?,
            Err(_) => IdCodec::default(),
        };
        let id_codec = match id_codec {
            IdCodec::Random { .. } => IdCodec::Random { length: id_length },
            sequential => sequential,
        };

        let id_max_attempts = parse_var("ID_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;

        let duplicate_policy = match env::var("DUPLICATE_POLICY") {
            Ok(v) => DuplicatePolicy::from_str(&v).map_err(anyhow::Error::msg)?,
            Err(_) => DuplicatePolicy::default(),
        };

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(v) if !v.is_empty() => v,
            _ => generate_secret().context("Failed to generate SESSION_SECRET")?,
        };

        let edit_token_ttl_seconds = parse_var("EDIT_TOKEN_TTL_SECONDS", 3600)?;
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 5)?;
        let db_connect_timeout = parse_var("DB_CONNECT_TIMEOUT", 30)?;

        Ok(Self {
            database_url,
            listen_addr,
            base_url,
            log_level,
            log_format,
            id_codec,
            id_max_attempts,
            duplicate_policy,
            session_secret,
            edit_token_ttl_seconds,
            db_max_connections,
            db_connect_timeout,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or malformed.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if let Some(ref base_url) = self.base_url
            && !base_url.starts_with("http://")
            && !base_url.starts_with("https://")
        {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                base_url
            );
        }

        if let IdCodec::Random { length } = self.id_codec
            && !(4..=32).contains(&length)
        {
            anyhow::bail!("ID_LENGTH must be between 4 and 32, got {}", length);
        }

        if self.id_max_attempts == 0 || self.id_max_attempts > 10_000 {
            anyhow::bail!(
                "ID_MAX_ATTEMPTS must be between 1 and 10000, got {}",
                self.id_max_attempts
            );
        }

        if self.session_secret.len() < 16 {
            anyhow::bail!("SESSION_SECRET must be at least 16 characters");
        }

        if self.edit_token_ttl_seconds == 0 {
            anyhow::bail!("EDIT_TOKEN_TTL_SECONDS must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary (without secrets).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        match self.base_url {
            Some(ref base_url) => tracing::info!("  Base URL: {}", base_url),
            None => tracing::info!("  Base URL: from Host header"),
        }
        tracing::info!("  Identifier strategy: {}", self.id_codec);
        tracing::info!("  Duplicate policy: {}", self.duplicate_policy);
        tracing::info!("  Edit token TTL: {}s", self.edit_token_ttl_seconds);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses an optional environment variable, falling back to `default`.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} is invalid: {e}")),
        Err(_) => Ok(default),
    }
}

/// Generates a random 32-byte key, hex encoded.
fn generate_secret() -> Result<String> {
    let mut buffer = [0u8; 32];
    getrandom::fill(&mut buffer).map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(hex::encode(buffer))
}

/// Loads and validates configuration from environment variables.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
