// LeadDesk - core/export.rs
//
// Tabular export of request lists: flat row records with human-readable
// column labels, locale-formatted dates, and display-name enums, plus an
// aggregate summary sheet.
// Core layer: builds the workbook in memory and writes to any Write
// trait object; file creation, naming, and placement are the caller's
// concern.

use crate::core::model::{source_label, Request, RequestStatus};
use crate::util::constants::{
    COURIER_NOT_ASSIGNED, DATE_TIME_FORMAT, EXPORT_FILE_PREFIX, EXPORT_SHEET_REQUESTS,
    EXPORT_SHEET_SUMMARY, EXPORT_STAMP_FORMAT, MAX_EXPORT_ROWS,
};
use crate::util::error::ExportError;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Output format for a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// A single column: human-readable label plus a width hint in characters
/// for sinks that support column sizing.
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub label: &'static str,
    pub width: u16,
}

/// One sheet of flat rows. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

/// The complete export payload handed to a tabular-file sink.
#[derive(Debug, Clone, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Total data rows across all sheets.
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// Column layout of the "Requests" sheet. Widths mirror the layout the
/// back office has always received.
fn request_columns() -> Vec<Column> {
    vec![
        Column { label: "No.", width: 5 },
        Column { label: "Request ID", width: 20 },
        Column { label: "Created", width: 18 },
        Column { label: "Full name", width: 25 },
        Column { label: "Phone", width: 18 },
        Column { label: "Birth date", width: 15 },
        Column { label: "Source", width: 18 },
        Column { label: "Status", width: 15 },
        Column { label: "Assigned courier", width: 20 },
        Column { label: "Priority", width: 12 },
        Column { label: "Tags", width: 20 },
        Column { label: "Comment", width: 30 },
        Column { label: "Referrer", width: 20 },
        Column { label: "User agent", width: 25 },
        Column { label: "Updated", width: 18 },
    ]
}

/// Build the export workbook for a request list (already filtered by the
/// caller if desired): a "Requests" sheet with one row per request and a
/// "Summary" sheet with aggregate status counts.
///
/// Fails with [`ExportError::NothingToExport`] on an empty list — callers
/// report this instead of producing an empty file — and with
/// [`ExportError::TooManyRows`] past the row cap.
pub fn build_workbook(requests: &[Request]) -> Result<Workbook, ExportError> {
    if requests.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    if requests.len() > MAX_EXPORT_ROWS {
        return Err(ExportError::TooManyRows {
            count: requests.len(),
            max: MAX_EXPORT_ROWS,
        });
    }

    let rows: Vec<Vec<String>> = requests
        .iter()
        .enumerate()
        .map(|(idx, request)| request_row(idx, request))
        .collect();

    let requests_sheet = Sheet {
        name: EXPORT_SHEET_REQUESTS,
        columns: request_columns(),
        rows,
    };

    Ok(Workbook {
        sheets: vec![requests_sheet, summary_sheet(requests)],
    })
}

/// Flatten one request into display-form cells.
fn request_row(idx: usize, request: &Request) -> Vec<String> {
    vec![
        (idx + 1).to_string(),
        request.id.clone(),
        format_timestamp(Some(request.created_at)),
        request.full_name.clone(),
        request.phone.clone(),
        request.birth_date.clone().unwrap_or_default(),
        source_label(&request.source).to_string(),
        request.status.label().to_string(),
        request
            .assigned_to
            .clone()
            .unwrap_or_else(|| COURIER_NOT_ASSIGNED.to_string()),
        request.priority.label().to_string(),
        request.tags.join(", "),
        request.comment.clone().unwrap_or_default(),
        request.referrer.clone().unwrap_or_default(),
        request.user_agent.clone().unwrap_or_default(),
        format_timestamp(request.updated_at),
    ]
}

/// Aggregate status counts as metric/value rows.
fn summary_sheet(requests: &[Request]) -> Sheet {
    let count_of = |status: RequestStatus| {
        requests
            .iter()
            .filter(|r| r.status == status)
            .count()
            .to_string()
    };

    Sheet {
        name: EXPORT_SHEET_SUMMARY,
        columns: vec![
            Column { label: "Metric", width: 25 },
            Column { label: "Value", width: 15 },
        ],
        rows: vec![
            vec!["Total requests".to_string(), requests.len().to_string()],
            vec!["New".to_string(), count_of(RequestStatus::New)],
            vec!["Accepted".to_string(), count_of(RequestStatus::Accepted)],
            vec!["Rejected".to_string(), count_of(RequestStatus::Rejected)],
            vec!["No answer".to_string(), count_of(RequestStatus::NoAnswer)],
        ],
    }
}

/// A timestamp in display form; absent timestamps render as empty string.
fn format_timestamp(ts: Option<DateTime<Local>>) -> String {
    ts.map(|t| t.format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Generated export file name with an embedded timestamp for uniqueness,
/// e.g. `requests_30-08-2026_14-05.csv`.
pub fn export_file_name(now: DateTime<Local>, format: ExportFormat) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}_{}.{}",
        now.format(EXPORT_STAMP_FORMAT),
        format.extension()
    )
}

/// Write the workbook as CSV.
///
/// CSV has no native sheet concept: each sheet is emitted as its name on
/// a line of its own, the header row, then the data rows. Returns the
/// number of data rows written.
pub fn write_csv<W: Write>(
    workbook: &Workbook,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    let mut count = 0;

    for sheet in &workbook.sheets {
        csv_writer
            .write_record([sheet.name])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;

        csv_writer
            .write_record(sheet.columns.iter().map(|c| c.label))
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;

        for row in &sheet.rows {
            csv_writer
                .write_record(row)
                .map_err(|e| ExportError::Csv {
                    path: export_path.to_path_buf(),
                    source: e,
                })?;
            count += 1;
        }
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Write the workbook as pretty-printed JSON (sheets with columns and rows).
pub fn write_json<W: Write>(
    workbook: &Workbook,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, workbook).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(workbook.row_count())
}
