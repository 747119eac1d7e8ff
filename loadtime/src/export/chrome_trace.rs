//! Chrome Trace Event export of load records.
//!
//! Every record becomes one complete (`"X"`) event on a single track. Nested
//! loads start later and end earlier than their parent, so viewers render the
//! load tree as a flame chart.

// Microsecond conversions intentionally go through f64
#![allow(clippy::cast_precision_loss)]

use crate::domain::ExportError;
use crate::profiling::Record;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::io::Write;

/// Chrome Trace Event format
/// Spec: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU/preview
#[derive(Debug, Clone, Serialize)]
struct ChromeTraceEvent {
    /// Unit name
    name: String,
    /// Unit kind, for filtering/coloring
    cat: String,
    /// Phase: "X" = complete
    ph: &'static str,
    /// Start in microseconds from session start
    ts: f64,
    /// Duration in microseconds
    dur: f64,
    pid: u32,
    tid: u32,
    args: JsonValue,
}

/// Chrome Trace Format container
#[derive(Debug, Serialize)]
struct ChromeTrace<'a> {
    #[serde(rename = "traceEvents")]
    trace_events: &'a [ChromeTraceEvent],
    #[serde(rename = "displayTimeUnit")]
    display_time_unit: &'static str,
}

/// Collects records and writes them as a Chrome trace.
#[derive(Debug, Default)]
pub struct ChromeTraceExporter {
    events: Vec<ChromeTraceEvent>,
}

impl ChromeTraceExporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let mut exporter = Self::new();
        for record in records {
            exporter.add_record(record);
        }
        exporter
    }

    pub fn add_record(&mut self, record: &Record) {
        self.events.push(ChromeTraceEvent {
            name: record.unit().to_owned(),
            cat: record.kind().label().to_owned(),
            ph: "X",
            ts: record.start().as_nanos() as f64 / 1000.0,
            dur: record.duration().as_nanos() as f64 / 1000.0,
            pid: 1,
            tid: 1,
            args: json!({
                "kind": record.kind(),
                "parent": record.parent(),
                "depth": record.depth(),
            }),
        });
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Write the trace as JSON, events ordered by start time.
    ///
    /// # Errors
    /// [`ExportError::NoRecords`] if nothing was added, or any write /
    /// serialization failure.
    pub fn export<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        if self.events.is_empty() {
            return Err(ExportError::NoRecords);
        }
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.ts.total_cmp(&b.ts));
        let trace = ChromeTrace {
            trace_events: &events,
            display_time_unit: "ms",
        };
        serde_json::to_writer_pretty(&mut writer, &trace)?;
        writer.flush()?;
        Ok(())
    }
}
