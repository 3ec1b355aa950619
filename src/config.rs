//! Configuration types for notion-exporter

use serde::{Deserialize, Serialize};

/// Which rows a database (collection) export includes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionViewExportType {
    /// Only the rows visible in the currently active filtered/sorted view
    CurrentView,

    /// Every row of the database, across all views (default)
    #[default]
    All,
}

/// Export behavior configuration
///
/// All fields have working defaults; override the ones you need with
/// struct-update syntax:
///
/// ```
/// use notion_exporter::ExportConfig;
///
/// let config = ExportConfig {
///     recursive: true,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export child subpages recursively (default: false)
    #[serde(default)]
    pub recursive: bool,

    /// Include embedded image and file attachments (default: true)
    ///
    /// When false the export request asks the API for text only and the
    /// downloaded archive carries no media files.
    #[serde(default = "default_include_contents")]
    pub include_contents: bool,

    /// Time zone forwarded to the exporter (default: "UTC")
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Locale forwarded to the exporter (default: "en")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Database export coverage (default: all rows)
    #[serde(default)]
    pub collection_view_export_type: CollectionViewExportType,

    /// Delay between export task status polls, in milliseconds (default: 500)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Cap on total time spent polling one task, in milliseconds (default: none)
    ///
    /// The remote API gives no completion guarantee; without a cap the poll
    /// loop runs until the task resolves one way or the other.
    #[serde(default)]
    pub max_poll_ms: Option<u64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            include_contents: default_include_contents(),
            time_zone: default_time_zone(),
            locale: default_locale(),
            collection_view_export_type: CollectionViewExportType::default(),
            poll_interval_ms: default_poll_interval(),
            max_poll_ms: None,
        }
    }
}

fn default_include_contents() -> bool {
    true
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_poll_interval() -> u64 {
    500
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = ExportConfig::default();
        assert!(!config.recursive);
        assert!(config.include_contents);
        assert_eq!(config.time_zone, "UTC");
        assert_eq!(config.locale, "en");
        assert_eq!(
            config.collection_view_export_type,
            CollectionViewExportType::All
        );
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.max_poll_ms, None);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"recursive":true,"time_zone":"Europe/Berlin"}"#)
                .expect("deserialize failed");
        assert!(config.recursive);
        assert_eq!(config.time_zone, "Europe/Berlin");
        assert_eq!(config.locale, "en", "unset fields fall back to defaults");
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_collection_view_export_type_uses_camel_case() {
        assert_eq!(
            serde_json::to_string(&CollectionViewExportType::CurrentView).expect("serialize"),
            "\"currentView\""
        );
        assert_eq!(
            serde_json::to_string(&CollectionViewExportType::All).expect("serialize"),
            "\"all\""
        );
        let parsed: CollectionViewExportType =
            serde_json::from_str("\"currentView\"").expect("deserialize");
        assert_eq!(parsed, CollectionViewExportType::CurrentView);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = ExportConfig {
            recursive: true,
            include_contents: false,
            collection_view_export_type: CollectionViewExportType::CurrentView,
            poll_interval_ms: 50,
            max_poll_ms: Some(30_000),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("serialize failed");
        let deserialized: ExportConfig = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_struct_update_merge_keeps_defaults() {
        let config = ExportConfig {
            recursive: true,
            ..Default::default()
        };
        assert!(config.recursive);
        assert_eq!(config.time_zone, "UTC");
        assert!(config.include_contents);
    }
}
