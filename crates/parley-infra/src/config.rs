//! Server configuration loader for Parley.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! environment variables (a `.env` file in the working directory is loaded
//! first). CLI flags are applied on top by the binary.

use std::path::Path;

use secrecy::SecretString;

use parley_types::config::ServerConfig;
use parley_types::error::ConfigError;

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "parley.toml";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Load `.env` into the process environment, if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Failed to load .env: {err}"),
    }
}

/// Load the config file.
///
/// - With an explicit `path`, a missing or malformed file is an error.
/// - Without one, `parley.toml` is read if it exists; a missing file yields
///   the defaults, and a malformed one logs a warning and yields the defaults.
pub async fn load_config_file(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let (config_path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
    };

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {} found, using defaults", config_path.display());
            return Ok(ServerConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => Ok(config),
        Err(err) if !explicit => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            Ok(ServerConfig::default())
        }
        Err(err) => Err(ConfigError::Parse {
            path: config_path.display().to_string(),
            message: err.to_string(),
        }),
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Taking a lookup function keeps this testable without touching the real
/// process environment.
pub fn apply_env_overrides<F>(config: &mut ServerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("PARLEY_HOST") {
        config.host = host;
    }
    if let Some(port) = lookup("PARLEY_PORT") {
        config.port = port.parse().map_err(|_| ConfigError::InvalidValue {
            key: "PARLEY_PORT".to_string(),
            value: port.clone(),
        })?;
    }
    if let Some(model) = lookup("PARLEY_DEFAULT_MODEL") {
        config.default_model = model;
    }
    if let Some(rate) = lookup("LLM_RATE_LIMIT") {
        config.rate_limit_secs = rate.parse().map_err(|_| ConfigError::InvalidValue {
            key: "LLM_RATE_LIMIT".to_string(),
            value: rate.clone(),
        })?;
    }
    if let Some(url) = lookup("GEMINI_BASE_URL") {
        config.gemini_base_url = url;
    }
    if let Some(dir) = lookup("PARLEY_STATIC_DIR") {
        config.static_dir = dir;
    }
    validate(config)
}

/// Reject values that cannot be used at runtime.
pub fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if std::time::Duration::try_from_secs_f64(config.rate_limit_secs).is_err() {
        return Err(ConfigError::InvalidValue {
            key: "rate_limit_secs".to_string(),
            value: config.rate_limit_secs.to_string(),
        });
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "request_timeout_secs".to_string(),
            value: "0".to_string(),
        });
    }
    Ok(())
}

/// Read the Gemini API key from the environment. Empty values count as unset.
pub fn resolve_api_key() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
}
