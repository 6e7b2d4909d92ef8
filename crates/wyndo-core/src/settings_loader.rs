//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `WYNDO_DEBUG` | `debug` |
//! | `WYNDO_BASE_URL` | `base_url` |
//! | `WYNDO_LOGIN_URL` | `login_url` |
//! | `WYNDO_WISHLIST_PATH` | `wishlist_path` |
//! | `WYNDO_DELETE_IMAGE_PATH` | `delete_image_path` |
//! | `WYNDO_LOG_LEVEL` | `log_level` |
//! | `WYNDO_IMAGE_EXTENSIONS` | `forms.image_extensions` (comma-separated) |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use wyndo_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/wyndo.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::WyndoError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values, including keys
/// nested inside the `[forms]` table.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, WyndoError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| WyndoError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, WyndoError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, WyndoError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, WyndoError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| WyndoError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, WyndoError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `WYNDO_*` environment variable overrides to a settings struct.
///
/// `WYNDO_DEBUG` accepts "true"/"1"/"yes" as true; anything else is false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("WYNDO_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("WYNDO_BASE_URL") {
        settings.base_url = val;
    }

    if let Ok(val) = std::env::var("WYNDO_LOGIN_URL") {
        settings.login_url = val;
    }

    if let Ok(val) = std::env::var("WYNDO_WISHLIST_PATH") {
        settings.wishlist_path = val;
    }

    if let Ok(val) = std::env::var("WYNDO_DELETE_IMAGE_PATH") {
        settings.delete_image_path = val;
    }

    if let Ok(val) = std::env::var("WYNDO_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("WYNDO_IMAGE_EXTENSIONS") {
        settings.forms.image_extensions = val
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, WyndoError> {
    std::fs::read_to_string(path).map_err(|e| {
        WyndoError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, WyndoError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        WyndoError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        WyndoError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            base_url = "https://shop.example"
            debug = false
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.base_url, "https://shop.example");
        assert!(!settings.debug);
        // Defaults preserved
        assert_eq!(settings.login_url, "/login/");
    }

    #[test]
    fn test_from_toml_str_partial_forms_table() {
        let toml = r"
            [forms]
            description_max_length = 500
        ";

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.forms.description_max_length, 500);
        assert_eq!(settings.forms.name_max_length, 36);
        assert_eq!(settings.forms.image_extensions.len(), 4);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.wishlist_path, "/api/toggle-wishlist/");
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("this is = = not toml");
        assert!(matches!(result, Err(WyndoError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"sometimes\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{"login_url": "/accounts/login/", "forms": {"password_min_length": 10}}"#;
        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.login_url, "/accounts/login/");
        assert_eq!(settings.forms.password_min_length, 10);
        assert_eq!(settings.forms.name_max_length, 36);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{").is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = std::env::temp_dir().join("wyndo_test_toml");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wyndo.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.log_level, "debug");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_json_file() {
        let dir = std::env::temp_dir().join("wyndo_test_json");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wyndo.json");
        std::fs::write(&path, r#"{"base_url": "http://localhost:9000"}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.base_url, "http://localhost:9000");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/wyndo.toml");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read TOML"));
    }

    #[test]
    fn test_apply_env_overrides_login_url() {
        let mut settings = Settings::default();
        std::env::set_var("WYNDO_LOGIN_URL", "/signin/");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.login_url, "/signin/");
        std::env::remove_var("WYNDO_LOGIN_URL");
    }

    #[test]
    fn test_apply_env_overrides_debug() {
        let mut settings = Settings::default();
        std::env::set_var("WYNDO_DEBUG", "0");
        apply_env_overrides(&mut settings);
        assert!(!settings.debug);
        std::env::remove_var("WYNDO_DEBUG");
    }

    #[test]
    fn test_apply_env_overrides_image_extensions() {
        let mut settings = Settings::default();
        std::env::set_var("WYNDO_IMAGE_EXTENSIONS", "PNG, .webp,,jpg");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.forms.image_extensions, vec!["png", "webp", "jpg"]);
        std::env::remove_var("WYNDO_IMAGE_EXTENSIONS");
    }
}
