use std::path::PathBuf;

use crate::app_config::{AppConfig, DEFAULT_DESKTOP_USER_AGENT, DEFAULT_MOBILE_USER_AGENT};
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
/// Every variable is optional; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("PRICESCAN_LOG_LEVEL", "info");
    let page_load_timeout_secs = parse_u64("PRICESCAN_PAGE_LOAD_TIMEOUT_SECS", "30")?;
    let ready_timeout_secs = parse_u64("PRICESCAN_READY_TIMEOUT_SECS", "15")?;
    let load_attempts = parse_u32("PRICESCAN_LOAD_ATTEMPTS", "3")?;
    let retry_pause_ms = parse_u64("PRICESCAN_RETRY_PAUSE_MS", "1000")?;
    let scroll_pause_ms = parse_u64("PRICESCAN_SCROLL_PAUSE_MS", "1000")?;

    if load_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICESCAN_LOAD_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if page_load_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICESCAN_PAGE_LOAD_TIMEOUT_SECS".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let headless_raw = or_default("PRICESCAN_HEADLESS", "true");
    let headless = parse_bool(&headless_raw).ok_or_else(|| ConfigError::InvalidEnvVar {
        var: "PRICESCAN_HEADLESS".to_string(),
        reason: format!("expected a boolean, got \"{headless_raw}\""),
    })?;

    Ok(AppConfig {
        log_level,
        page_load_timeout_secs,
        ready_timeout_secs,
        load_attempts,
        retry_pause_ms,
        scroll_pause_ms,
        block_signatures_path: optional("PRICESCAN_BLOCK_SIGNATURES_PATH").map(PathBuf::from),
        chrome_executable: optional("PRICESCAN_CHROME_EXECUTABLE").map(PathBuf::from),
        remote_browser_url: optional("PRICESCAN_REMOTE_BROWSER_URL"),
        proxy_url: optional("PRICESCAN_PROXY_URL"),
        headless,
        user_agent: or_default("PRICESCAN_USER_AGENT", DEFAULT_DESKTOP_USER_AGENT),
        mobile_user_agent: or_default("PRICESCAN_MOBILE_USER_AGENT", DEFAULT_MOBILE_USER_AGENT),
    })
}

/// Accepts the usual truthy/falsy spellings (`1`, `true`, `yes`, `t`, ...).
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "t" | "on" => Some(true),
        "0" | "false" | "no" | "f" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
