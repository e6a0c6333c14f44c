use std::path::PathBuf;

use crate::app_config::AppConfig;
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
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let or_default = |var: &str, default: String| -> String { lookup(var).unwrap_or(default) };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let parse_timeout = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let log_level = or_default("SHOPCOLLECT_LOG_LEVEL", defaults.log_level);
    let locate_timeout_ms =
        parse_timeout("SHOPCOLLECT_LOCATE_TIMEOUT_MS", defaults.locate_timeout_ms)?;
    let next_control_timeout_ms = parse_timeout(
        "SHOPCOLLECT_NEXT_TIMEOUT_MS",
        defaults.next_control_timeout_ms,
    )?;
    let settle_delay_ms = parse_u64("SHOPCOLLECT_SETTLE_DELAY_MS", defaults.settle_delay_ms)?;
    let render_delay_ms = parse_u64("SHOPCOLLECT_RENDER_DELAY_MS", defaults.render_delay_ms)?;
    let export_dir = lookup("SHOPCOLLECT_EXPORT_DIR").map_or(defaults.export_dir, PathBuf::from);

    Ok(AppConfig {
        log_level,
        locate_timeout_ms,
        next_control_timeout_ms,
        settle_delay_ms,
        render_delay_ms,
        export_dir,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
