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
/// Every setting has a default; only malformed values are errors. Decoupled
/// from the real environment so it can be tested with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("VOUCHWATCH_LOG_LEVEL", "info");

    let wait_timeout_secs = parse_u64("VOUCHWATCH_WAIT_TIMEOUT_SECS", "10")?;
    if wait_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VOUCHWATCH_WAIT_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1 second".to_string(),
        });
    }
    let wait_poll_ms = parse_u64("VOUCHWATCH_WAIT_POLL_MS", "250")?;
    let pacing_ms = parse_u64("VOUCHWATCH_PACING_MS", "1000")?;

    let chrome_path = lookup("VOUCHWATCH_CHROME_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let smtp_host = or_default("VOUCHWATCH_SMTP_HOST", "smtp.gmail.com");
    let smtp_port = parse_u16("VOUCHWATCH_SMTP_PORT", "465")?;

    Ok(AppConfig {
        log_level,
        wait_timeout_secs,
        wait_poll_ms,
        pacing_ms,
        chrome_path,
        smtp_host,
        smtp_port,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
