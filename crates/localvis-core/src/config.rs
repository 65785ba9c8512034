use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("LOCALVIS_ENV", "development"))?;

    let bind_addr = or_default("LOCALVIS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LOCALVIS_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("LOCALVIS_LOG_LEVEL", "info");

    let engine_config_path = PathBuf::from(or_default(
        "LOCALVIS_ENGINE_CONFIG_PATH",
        "./config/engine.yaml",
    ));

    let default_weight_table = lookup("LOCALVIS_DEFAULT_WEIGHT_TABLE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let rate_limit_per_minute = or_default("LOCALVIS_RATE_LIMIT_PER_MINUTE", "30")
        .parse::<usize>()
        .map_err(|e| invalid("LOCALVIS_RATE_LIMIT_PER_MINUTE", e.to_string()))?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "LOCALVIS_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    let trust_forwarded_for = parse_flag(
        "LOCALVIS_TRUST_FORWARDED_FOR",
        &or_default("LOCALVIS_TRUST_FORWARDED_FOR", "false"),
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        engine_config_path,
        default_weight_table,
        rate_limit_per_minute,
        trust_forwarded_for,
    })
}

fn parse_flag(var: &str, s: &str) -> Result<bool, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected true or false, got '{other}'"),
        }),
    }
}

/// Parse `LOCALVIS_ENV`. Unknown values are rejected rather than guessed.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOCALVIS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
