// LeadDesk - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::export::ExportFormat;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LeadDesk data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/leaddesk/ or %APPDATA%\LeadDesk\)
    pub config_dir: PathBuf,

    /// Data directory for generated files.
    pub data_dir: PathBuf,

    /// Default destination for export files.
    pub export_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();
            let export_dir = data_dir.join(constants::EXPORTS_DIR_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                exports = %export_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
                export_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback.clone(),
                export_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[export]` section.
    pub export: ExportSection,
    /// `[stats]` section.
    pub stats: StatsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[stats]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StatsSection {
    /// Trailing days shown in the daily chart.
    pub daily_chart_days: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Destination directory for generated export files.
    pub output_directory: Option<String>,
    /// Maximum rows per export.
    pub max_rows: Option<usize>,
    /// Default output format: "csv" or "json".
    pub format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Export --
    /// Destination directory for exports (None = platform export dir).
    pub export_dir: Option<PathBuf>,
    /// Maximum rows per export.
    pub max_export_rows: usize,
    /// Default export format.
    pub export_format: ExportFormat,

    // -- Stats --
    /// Trailing days shown in the daily chart.
    pub daily_chart_days: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            export_dir: None,
            max_export_rows: constants::MAX_EXPORT_ROWS,
            export_format: ExportFormat::Csv,
            daily_chart_days: constants::DAILY_CHART_DAYS,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with an error warning --
/// the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    // Validate each field against named constants, accumulating all warnings.
    let mut config = AppConfig::default();

    // -- Export: output_directory --
    if let Some(ref dir) = raw.export.output_directory {
        if dir.trim().is_empty() {
            warnings.push(
                "[export] output_directory is empty. Using the platform export directory."
                    .to_string(),
            );
        } else {
            config.export_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Export: max_rows --
    if let Some(rows) = raw.export.max_rows {
        if (1..=constants::MAX_EXPORT_ROWS).contains(&rows) {
            config.max_export_rows = rows;
        } else {
            warnings.push(format!(
                "[export] max_rows = {rows} is out of range (1-{}). Using default ({}).",
                constants::MAX_EXPORT_ROWS,
                constants::MAX_EXPORT_ROWS,
            ));
        }
    }

    // -- Export: format --
    if let Some(ref format) = raw.export.format {
        match format.to_lowercase().as_str() {
            "csv" => config.export_format = ExportFormat::Csv,
            "json" => config.export_format = ExportFormat::Json,
            other => {
                warnings.push(format!(
                    "[export] format = \"{other}\" is not recognised. \
                     Expected \"csv\" or \"json\". Using default (csv).",
                ));
            }
        }
    }

    // -- Stats: daily_chart_days --
    if let Some(days) = raw.stats.daily_chart_days {
        if (1..=constants::MAX_DAILY_CHART_DAYS).contains(&days) {
            config.daily_chart_days = days;
        } else {
            warnings.push(format!(
                "[stats] daily_chart_days = {days} is out of range (1-{}). Using default ({}).",
                constants::MAX_DAILY_CHART_DAYS,
                constants::DAILY_CHART_DAYS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {
                config.log_level = Some(level.to_lowercase());
            }
            other => {
                warnings.push(format!(
                    "[logging] level = \"{other}\" is not recognised. \
                     Expected error/warn/info/debug/trace. Using default ({}).",
                    constants::DEFAULT_LOG_LEVEL,
                ));
            }
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.max_export_rows, constants::MAX_EXPORT_ROWS);
        assert_eq!(config.export_format, ExportFormat::Csv);
    }

    #[test]
    fn test_valid_config_applied() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "[export]\nmax_rows = 500\nformat = \"json\"\noutput_directory = \"/tmp/exports\"\n\
             [stats]\ndaily_chart_days = 14\n\
             [logging]\nlevel = \"debug\"\n",
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.max_export_rows, 500);
        assert_eq!(config.export_format, ExportFormat::Json);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(config.daily_chart_days, 14);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_value_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[export]\nmax_rows = 0\n");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.max_export_rows, constants::MAX_EXPORT_ROWS);
    }

    #[test]
    fn test_chart_span_out_of_range_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[stats]\ndaily_chart_days = 500\n");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.daily_chart_days, constants::DAILY_CHART_DAYS);
    }

    #[test]
    fn test_unknown_format_warns() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[export]\nformat = \"xlsx\"\n");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.export_format, ExportFormat::Csv);
    }

    #[test]
    fn test_unparseable_config_warns_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "not [valid toml");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.max_export_rows, constants::MAX_EXPORT_ROWS);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[future_section]\nkey = 1\n");
        let (_, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
    }
}
