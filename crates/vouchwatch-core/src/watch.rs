use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Settings for watching one vendor page.
///
/// Field names follow the JSON config file; the `env_var_*` spellings are
/// accepted for the credential variable names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    pub url: String,
    pub data_dir: PathBuf,
    pub new_discount_alert: bool,
    pub min_discount: u8,
    /// Name of the environment variable holding the mail account.
    #[serde(alias = "env_var_user")]
    pub email_user_var: String,
    /// Name of the environment variable holding the mail password.
    #[serde(alias = "env_var_pass")]
    pub email_pass_var: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

fn default_headless() -> bool {
    true
}

/// Load and validate the watch configuration.
///
/// Files ending in `.yaml`/`.yml` are read as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watch_config(path: &Path) -> Result<WatchConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parse_error = |reason: String| ConfigError::ConfigFileParse {
        path: path.display().to_string(),
        reason,
    };

    let config: WatchConfig = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    };

    validate_watch_config(&config)?;

    Ok(config)
}

fn validate_watch_config(config: &WatchConfig) -> Result<(), ConfigError> {
    let url = config.url.trim();
    if url.is_empty() {
        return Err(ConfigError::Validation("url must be non-empty".to_string()));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ConfigError::Validation(format!(
            "url '{url}' must start with http:// or https://"
        )));
    }

    if config.min_discount > 100 {
        return Err(ConfigError::Validation(format!(
            "min_discount {} is not a percentage (0-100)",
            config.min_discount
        )));
    }

    for (field, value) in [
        ("email_user_var", &config.email_user_var),
        ("email_pass_var", &config.email_pass_var),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{field} must name an environment variable"
            )));
        }
    }

    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir must be non-empty".to_string(),
        ));
    }

    Ok(())
}
