//! Report formatting for recorded loads.
//!
//! ```text
//! 0.1203 root       app
//! 0.0812 dependency requests
//! 0.0420 transitive urllib3                                  from requests
//! 0.0051 project    app.util
//!
//! Load-time errors that were handled by units:
//! chardet: ImportError: no module named cchardet
//! ```
//!
//! When the root load itself fails, the entries the failure left on its way
//! out are listed separately under `Unhandled load failure:`.

use crate::analysis::{summarize_by_kind, KindSummary};
use crate::classification::UnitKind;
use crate::domain::ReportError;
use crate::profiling::{ErrorEntry, Record, Recorder};
use crossterm::style::Stylize;
use serde::Serialize;
use std::io::Write;

/// Width the unit name is padded to in table lines.
const NAME_WIDTH: usize = 40;

const HANDLED_HEADING: &str = "Load-time errors that were handled by units:";
const UNHANDLED_HEADING: &str = "Unhandled load failure:";

/// Presentation settings for [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Maximum number of records shown
    pub top: usize,
    /// Decimal places for durations (seconds)
    pub precision: usize,
    /// Emit ANSI colors
    pub color: bool,
    /// Append the per-kind summary section
    pub summary: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top: 25,
            precision: 4,
            color: true,
            summary: false,
        }
    }
}

/// Format one table line for `record`.
#[must_use]
pub fn format_record(record: &Record, options: &ReportOptions) -> String {
    let time = format!("{:.*}", options.precision, record.seconds());
    let kind = record.kind().colored(options.color);
    let padded = format!("{:width$}", record.unit(), width = NAME_WIDTH);
    let name = paint_name(&padded, options.color);
    let mut line = format!("{time} {kind} {name}");
    if record.kind() == UnitKind::Transitive {
        if let Some(parent) = record.parent() {
            line.push_str(" from ");
            line.push_str(&paint_name(parent, options.color));
        }
    }
    line
}

/// Format one error line as `unit: Type: message`.
#[must_use]
pub fn format_error(entry: &ErrorEntry, color: bool) -> String {
    let error = entry.error();
    let detail = format!("{}: {error}", error.type_name());
    if color {
        format!("{}: {}", paint_name(entry.unit(), true), detail.red())
    } else {
        format!("{}: {detail}", entry.unit())
    }
}

/// Write the slowest `options.top` records, optional summary, then errors.
///
/// Records are written in the order given; call [`Recorder::sort`] first.
/// Errors some unit handled come first; a failure that escaped the root
/// load gets its own section.
///
/// # Errors
/// Any failure writing to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    recorder: &Recorder,
    options: &ReportOptions,
) -> Result<(), ReportError> {
    let records = recorder.records();
    for record in records.iter().take(options.top) {
        writeln!(out, "{}", format_record(record, options))?;
    }

    if options.summary {
        writeln!(out, "\nTime by kind (inclusive, {} units):", records.len())?;
        for summary in summarize_by_kind(&records) {
            writeln!(out, "{}", format_summary(&summary, options))?;
        }
    }

    let (handled, unhandled) = recorder.partition_errors();
    write_errors(out, HANDLED_HEADING, &handled, options.color)?;
    write_errors(out, UNHANDLED_HEADING, &unhandled, options.color)?;
    Ok(())
}

fn write_errors<W: Write>(
    out: &mut W,
    heading: &str,
    entries: &[ErrorEntry],
    color: bool,
) -> Result<(), ReportError> {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{heading}")?;
    for entry in entries {
        writeln!(out, "{}", format_error(entry, color))?;
    }
    Ok(())
}

fn format_summary(summary: &KindSummary, options: &ReportOptions) -> String {
    let mut line = format!(
        "{:.*} {} {:>4} units {:>6.1}%",
        options.precision,
        summary.total.as_secs_f64(),
        summary.kind.colored(options.color),
        summary.count,
        summary.percentage,
    );
    if let Some(slowest) = &summary.slowest {
        line.push_str("  slowest: ");
        line.push_str(&paint_name(slowest, options.color));
    }
    line
}

fn paint_name(name: &str, color: bool) -> String {
    if color {
        name.magenta().to_string()
    } else {
        name.to_owned()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a str,
    total_seconds: f64,
    records: &'a [Record],
    errors: Vec<JsonError<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Vec<KindSummary>>,
}

#[derive(Serialize)]
struct JsonError<'a> {
    unit: &'a str,
    #[serde(rename = "type")]
    type_name: &'a str,
    message: String,
    handled: bool,
}

impl<'a> JsonError<'a> {
    fn new(entry: &'a ErrorEntry, handled: bool) -> Self {
        Self {
            unit: entry.unit(),
            type_name: entry.error().type_name(),
            message: entry.error().to_string(),
            handled,
        }
    }
}

/// Write the report as a single JSON document.
///
/// # Errors
/// Any serialization or write failure.
pub fn write_json_report<W: Write>(
    out: &mut W,
    recorder: &Recorder,
    options: &ReportOptions,
) -> Result<(), ReportError> {
    let records = recorder.records();
    let (handled, unhandled) = recorder.partition_errors();
    let errors = handled
        .iter()
        .map(|entry| JsonError::new(entry, true))
        .chain(unhandled.iter().map(|entry| JsonError::new(entry, false)))
        .collect();
    let shown = &records[..records.len().min(options.top)];
    let report = JsonReport {
        root: recorder.root(),
        total_seconds: recorder.total_time().as_secs_f64(),
        records: shown,
        errors,
        summary: options.summary.then(|| summarize_by_kind(&records)),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
