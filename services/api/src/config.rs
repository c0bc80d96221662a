//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use essay_review_core::{DefaultCredentialPolicy, DEFAULT_CREDENTIAL};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where submissions are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// One `<key>.json` file per submission.
    Directory(PathBuf),
    /// Process-local map, seeded at startup from a snapshot of this
    /// directory when it exists. Nothing written later persists.
    Memory(PathBuf),
}

/// Credentials handed to the browser client by `GET /config`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientCredentials {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl ClientCredentials {
    /// Names of the mandatory variables that are unset.
    pub fn missing_mandatory(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("FIREBASE_API_KEY");
        }
        if self.project_id.is_none() {
            missing.push("FIREBASE_PROJECT_ID");
        }
        missing
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub teacher_password: String,
    pub default_credential_policy: DefaultCredentialPolicy,
    pub store_backend: StoreBackend,
    pub store_timeout: Duration,
    pub store_fetch_concurrency: usize,
    pub essays_path: PathBuf,
    pub client_credentials: ClientCredentials,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Access Control ---
        let teacher_password =
            var("TEACHER_PASSWORD").unwrap_or_else(|| DEFAULT_CREDENTIAL.to_string());
        let default_credential_policy = match var("ACCEPT_DEFAULT_PASSWORD") {
            None => DefaultCredentialPolicy::AlwaysAccept,
            Some(raw) => {
                if parse_bool("ACCEPT_DEFAULT_PASSWORD", &raw)? {
                    DefaultCredentialPolicy::AlwaysAccept
                } else {
                    DefaultCredentialPolicy::WhenUnconfigured
                }
            }
        };

        // --- Submission Store ---
        let store_path = var("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/submissions"));
        let store_backend = match var("STORE_BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("dir") => StoreBackend::Directory(store_path),
            Some("memory") => StoreBackend::Memory(store_path),
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "STORE_BACKEND".to_string(),
                    format!("'{}' is not one of 'dir', 'memory'", other),
                ))
            }
        };
        let store_timeout = Duration::from_millis(parse_number("STORE_TIMEOUT_MS", var("STORE_TIMEOUT_MS"), 5000)?);
        let store_fetch_concurrency =
            parse_number("STORE_FETCH_CONCURRENCY", var("STORE_FETCH_CONCURRENCY"), 16)?;
        if store_fetch_concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "STORE_FETCH_CONCURRENCY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let essays_path = var("ESSAYS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./essays"));

        // --- Client Credentials (each has a build-tool alias) ---
        let credential = |name: &str| var(name).or_else(|| var(&format!("VITE_{}", name)));
        let client_credentials = ClientCredentials {
            api_key: credential("FIREBASE_API_KEY"),
            auth_domain: credential("FIREBASE_AUTH_DOMAIN"),
            project_id: credential("FIREBASE_PROJECT_ID"),
            storage_bucket: credential("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: credential("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: credential("FIREBASE_APP_ID"),
        };

        Ok(Self {
            bind_address,
            log_level,
            teacher_password,
            default_credential_policy,
            store_backend,
            store_timeout,
            store_fetch_concurrency,
            essays_path,
            client_credentials,
        })
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(
            name.to_string(),
            format!("'{}' is not a boolean", raw),
        )),
    }
}

fn parse_number<T>(name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
    }
}
