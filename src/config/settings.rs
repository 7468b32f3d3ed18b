//! User settings for FinTrack
//!
//! Manages user preferences (product name used in export file names, currency
//! symbol, default filing variant) and the optional remote backend
//! configuration.

use serde::{Deserialize, Serialize};

use super::paths::FintrackPaths;
use crate::error::FintrackError;
use crate::export::Variant;

/// Connection settings for the remote document and attachment stores
///
/// Every field must be present and non-empty for the remote backend to be
/// considered configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl RemoteSettings {
    /// Whether all remote settings are filled in
    pub fn is_configured(&self) -> bool {
        [
            &self.api_key,
            &self.project_id,
            &self.storage_bucket,
            &self.app_id,
        ]
        .iter()
        .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

/// User settings for FinTrack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Product name, used as the export file name prefix
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Filing variant used when none is given
    #[serde(default)]
    pub default_variant: Variant,

    /// Remote backend configuration
    #[serde(default)]
    pub remote: RemoteSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_product_name() -> String {
    "fintrack".to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            product_name: default_product_name(),
            currency_symbol: default_currency(),
            default_variant: Variant::default(),
            remote: RemoteSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FintrackPaths) -> Result<Self, FintrackError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FintrackError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FintrackError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FintrackPaths) -> Result<(), FintrackError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FintrackError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            FintrackError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.product_name, "fintrack");
        assert_eq!(settings.default_variant, Variant::Itr);
        assert!(!settings.remote.is_configured());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_variant = Variant::Gst;
        settings.product_name = "books".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_variant, Variant::Gst);
        assert_eq!(loaded.product_name, "books");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol":"$"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.product_name, "fintrack");
        assert_eq!(settings.format_amount(12.5), "$12.50");
    }

    #[test]
    fn test_remote_requires_every_field() {
        let mut remote = RemoteSettings {
            api_key: Some("k".into()),
            project_id: Some("p".into()),
            storage_bucket: Some("b".into()),
            app_id: None,
        };
        assert!(!remote.is_configured());

        remote.app_id = Some(" ".into());
        assert!(!remote.is_configured());

        remote.app_id = Some("a".into());
        assert!(remote.is_configured());
    }
}
