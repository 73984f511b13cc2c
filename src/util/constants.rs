// LeadDesk - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LeadDesk";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LeadDesk";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Date/time display formats
// =============================================================================

/// Calendar-date display format used in day-group headers and exports.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Date-time display format for created/updated timestamps in exports.
pub const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Timestamp component embedded in generated export file names.
/// Minute resolution keeps names readable while still unique in practice.
pub const EXPORT_STAMP_FORMAT: &str = "%d-%m-%Y_%H-%M";

// =============================================================================
// Filtering and statistics windows
// =============================================================================

/// Number of hour-of-day buckets in the hourly distribution.
pub const HOURS_PER_DAY: usize = 24;

/// Days covered by the trailing "week" window, inclusive of today.
/// The window lower bound is `today - (WEEK_WINDOW_DAYS - 1)`.
pub const WEEK_WINDOW_DAYS: i64 = 7;

/// Default number of trailing daily entries the chart view consumes.
/// The daily series always materialises at least this many days.
pub const DAILY_CHART_DAYS: usize = 7;

/// Upper bound for the configurable daily chart span.
pub const MAX_DAILY_CHART_DAYS: usize = 366;

/// Fixed divisor for the average-requests-per-day figure.
///
/// Deliberately a flat 30 rather than the true day count of the current
/// month: the monthly window is calendar-accurate but the average has
/// always been quoted against a 30-day month and downstream reports
/// expect that figure unchanged.
pub const AVG_DAILY_DIVISOR: f64 = 30.0;

/// Fixed divisor for the average-requests-per-week figure. See
/// [`AVG_DAILY_DIVISOR`] for why this is not calendar-accurate.
pub const AVG_WEEKLY_DIVISOR: f64 = 7.0;

// =============================================================================
// Export limits
// =============================================================================

/// Maximum number of rows that can be exported in a single operation.
pub const MAX_EXPORT_ROWS: usize = 1_000_000;

/// File name prefix for generated exports.
pub const EXPORT_FILE_PREFIX: &str = "requests";

/// Sheet name holding the per-request rows.
pub const EXPORT_SHEET_REQUESTS: &str = "Requests";

/// Sheet name holding the aggregate summary rows.
pub const EXPORT_SHEET_SUMMARY: &str = "Summary";

// =============================================================================
// Display fallbacks
// =============================================================================

/// Rendered when a request has no origin channel recorded.
pub const SOURCE_NOT_SPECIFIED: &str = "Not specified";

/// Rendered when a request has no courier assigned.
pub const COURIER_NOT_ASSIGNED: &str = "Not assigned";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Subdirectory of the data directory where exports land by default.
pub const EXPORTS_DIR_NAME: &str = "exports";
