// LeadDesk - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Config loading and validation
// 4. Dispatch to the list / group / stats / export commands

use clap::{Args, Parser, Subcommand, ValueEnum};
use leaddesk::core::export::{self, ExportFormat};
use leaddesk::core::filter::{apply_filters, DateWindow, RequestFilter, StatusFilter};
use leaddesk::core::grouping::group_by_day;
use leaddesk::core::model::{source_label, Request, RequestStatus};
use leaddesk::core::stats::compute_statistics_spanning;
use leaddesk::platform::config::{load_config, AppConfig, PlatformPaths};
use leaddesk::store::snapshot::load_snapshot;
use leaddesk::util::constants::{COURIER_NOT_ASSIGNED, DATE_TIME_FORMAT};
use leaddesk::util::error::{ExportError, LeadDeskError, Result};
use leaddesk::util::{constants, logging};

use chrono::Local;
use std::path::PathBuf;

/// LeadDesk - lead request management toolkit.
///
/// Point LeadDesk at a data snapshot to filter, group, analyse, and export
/// customer requests from the command line.
#[derive(Parser, Debug)]
#[command(name = "leaddesk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the configuration directory.
    #[arg(long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List requests, optionally filtered.
    List {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show unprocessed (new) requests grouped by calendar day.
    Group {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the statistics report.
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Export requests to a file.
    Export {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file or directory (defaults to the configured export
        /// directory with a timestamped file name).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Output format.
        #[arg(long = "format", value_enum)]
        format: Option<FormatArg>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the JSON data snapshot.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Case-insensitive text search against name, phone, and comment.
    #[arg(short = 's', long = "search")]
    search: Option<String>,

    /// Only requests with this status.
    #[arg(long = "status", value_enum)]
    status: Option<StatusArg>,

    /// Only requests created inside this window.
    #[arg(short = 'w', long = "window", value_enum, default_value_t = WindowArg::All)]
    window: WindowArg,
}

impl FilterArgs {
    fn to_filter(&self) -> RequestFilter {
        RequestFilter {
            text_query: self.search.clone().unwrap_or_default(),
            status: match self.status {
                None => StatusFilter::All,
                Some(s) => StatusFilter::Only(s.into()),
            },
            date_window: self.window.into(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StatusArg {
    New,
    Accepted,
    Rejected,
    NoAnswer,
}

impl From<StatusArg> for RequestStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::New => RequestStatus::New,
            StatusArg::Accepted => RequestStatus::Accepted,
            StatusArg::Rejected => RequestStatus::Rejected,
            StatusArg::NoAnswer => RequestStatus::NoAnswer,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum WindowArg {
    All,
    Today,
    Week,
    Month,
}

impl From<WindowArg> for DateWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::All => DateWindow::All,
            WindowArg::Today => DateWindow::Today,
            WindowArg::Week => DateWindow::Week,
            WindowArg::Month => DateWindow::Month,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths
    let platform_paths = PlatformPaths::resolve();

    // Determine config directory: CLI override > platform default
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());

    // Config must load before logging so the configured level can apply.
    let (config, config_warnings) = load_config(&config_dir);

    logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LeadDesk starting"
    );

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    if let Err(e) = run(cli, &config, &platform_paths) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &AppConfig, paths: &PlatformPaths) -> Result<()> {
    let today = Local::now().date_naive();

    match cli.command {
        Command::List { input, filter } => cmd_list(&input.input, &filter, today),
        Command::Group { input } => cmd_group(&input.input, today),
        Command::Stats { input } => cmd_stats(&input.input, config, today),
        Command::Export {
            input,
            filter,
            output,
            format,
        } => cmd_export(&input.input, &filter, output, format, config, paths, today),
    }
}

// =============================================================================
// list
// =============================================================================

fn cmd_list(input: &PathBuf, args: &FilterArgs, today: chrono::NaiveDate) -> Result<()> {
    let snapshot = load_snapshot(input)?;
    let filter = args.to_filter();
    let indices = apply_filters(&snapshot.requests, &filter, today);

    println!(
        "{:<12} {:<17} {:<25} {:<18} {:<10} {:<20}",
        "ID", "Created", "Name", "Phone", "Status", "Source"
    );
    for &idx in &indices {
        let request = &snapshot.requests[idx];
        println!(
            "{:<12} {:<17} {:<25} {:<18} {:<10} {:<20}",
            request.id,
            request.created_at.format(DATE_TIME_FORMAT),
            request.full_name,
            request.phone,
            request.status.label(),
            source_label(&request.source),
        );
    }
    println!(
        "\n{} of {} requests",
        indices.len(),
        snapshot.requests.len()
    );

    Ok(())
}

// =============================================================================
// group
// =============================================================================

fn cmd_group(input: &PathBuf, today: chrono::NaiveDate) -> Result<()> {
    let snapshot = load_snapshot(input)?;
    let groups = group_by_day(&snapshot.requests, today);

    if groups.is_empty() {
        println!("No new requests.");
        return Ok(());
    }

    for group in &groups {
        println!("{} ({})", group.label, group.indices.len());
        for &idx in &group.indices {
            let request = &snapshot.requests[idx];
            println!(
                "  {:<12} {:<5} {:<25} {:<18} {}",
                request.id,
                request.created_at.format("%H:%M"),
                request.full_name,
                request.phone,
                request
                    .assigned_to
                    .as_deref()
                    .unwrap_or(COURIER_NOT_ASSIGNED),
            );
        }
    }

    Ok(())
}

// =============================================================================
// stats
// =============================================================================

fn cmd_stats(input: &PathBuf, config: &AppConfig, today: chrono::NaiveDate) -> Result<()> {
    let snapshot = load_snapshot(input)?;
    let stats = compute_statistics_spanning(&snapshot.requests, today, config.daily_chart_days);

    println!("Totals");
    println!("  All:        {}", stats.total.all);
    println!(
        "  Accepted:   {} ({}%)",
        stats.total.accepted, stats.total.acceptance_rate
    );
    println!(
        "  Rejected:   {} ({}%)",
        stats.total.rejected, stats.total.rejection_rate
    );
    println!("  New:        {}", stats.total.new);

    println!("\nPeriods           count  accepted  rejected  new");
    for (name, period) in [
        ("Today", &stats.today),
        ("This week", &stats.this_week),
        ("This month", &stats.this_month),
    ] {
        println!(
            "  {:<14} {:>6} {:>9} {:>9} {:>4}",
            name, period.count, period.accepted, period.rejected, period.new
        );
    }

    let peak = stats.peak_hour();
    println!("\nPeak hour:          {:02}:00 ({})", peak.hour, peak.count);
    println!("Average per day:    {}", stats.average_per_day());
    println!("Average per week:   {}", stats.average_per_week());

    println!("\nLast {} days", config.daily_chart_days);
    for day in stats.last_n_days(config.daily_chart_days) {
        println!(
            "  {}  {:>4}  {}",
            day.date.format(constants::DATE_FORMAT),
            day.count,
            "#".repeat(day.count.min(60)),
        );
    }

    Ok(())
}

// =============================================================================
// export
// =============================================================================

fn cmd_export(
    input: &PathBuf,
    args: &FilterArgs,
    output: Option<PathBuf>,
    format: Option<FormatArg>,
    config: &AppConfig,
    paths: &PlatformPaths,
    today: chrono::NaiveDate,
) -> Result<()> {
    let snapshot = load_snapshot(input)?;
    let filter = args.to_filter();
    let indices = apply_filters(&snapshot.requests, &filter, today);
    let rows: Vec<Request> = indices
        .iter()
        .map(|&idx| snapshot.requests[idx].clone())
        .collect();

    // The configured cap may be tighter than the built-in limit.
    if rows.len() > config.max_export_rows {
        return Err(ExportError::TooManyRows {
            count: rows.len(),
            max: config.max_export_rows,
        }
        .into());
    }

    let format: ExportFormat = format.map(Into::into).unwrap_or(config.export_format);
    let export_path = resolve_export_path(output, format, config, paths)?;

    let workbook = export::build_workbook(&rows)?;

    // Write to a temporary sibling first, then rename into place, so an
    // interrupted export never leaves a truncated file at the final path.
    let tmp_path = export_path.with_extension("tmp");
    let file = std::fs::File::create(&tmp_path).map_err(|e| LeadDeskError::Io {
        path: tmp_path.clone(),
        operation: "create export file",
        source: e,
    })?;

    let written = match format {
        ExportFormat::Csv => export::write_csv(&workbook, file, &export_path)?,
        ExportFormat::Json => export::write_json(&workbook, file, &export_path)?,
    };

    std::fs::rename(&tmp_path, &export_path).map_err(|e| LeadDeskError::Io {
        path: export_path.clone(),
        operation: "rename export file",
        source: e,
    })?;

    tracing::info!(
        rows = written,
        path = %export_path.display(),
        format = ?format,
        "Export complete"
    );
    println!("Exported {} requests to {}", written, export_path.display());

    Ok(())
}

/// Resolve the final export path.
///
/// `--output` pointing at an existing directory gets a generated file name
/// inside it; any other `--output` is used verbatim. With no `--output` the
/// configured export directory (or the platform default) is created on
/// demand and a timestamped name generated inside it.
fn resolve_export_path(
    output: Option<PathBuf>,
    format: ExportFormat,
    config: &AppConfig,
    paths: &PlatformPaths,
) -> Result<PathBuf> {
    let generated_name = export::export_file_name(Local::now(), format);

    match output {
        Some(path) if path.is_dir() => Ok(path.join(generated_name)),
        Some(path) => Ok(path),
        None => {
            let dir = config
                .export_dir
                .clone()
                .unwrap_or_else(|| paths.export_dir.clone());
            std::fs::create_dir_all(&dir).map_err(|e| LeadDeskError::Io {
                path: dir.clone(),
                operation: "create export directory",
                source: e,
            })?;
            Ok(dir.join(generated_name))
        }
    }
}
