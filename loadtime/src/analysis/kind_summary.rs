//! Per-kind aggregation of load records.
//!
//! Answers "where does load time go": the root and project code itself, the
//! dependencies it pulls in directly, or what those pull in behind them.
//!
//! Durations are inclusive (a unit's time contains its nested loads), so
//! kinds overlap. Percentages are relative to the outermost loads' total and
//! do not sum to 100.

// Percentage calculations intentionally convert to f64
#![allow(clippy::cast_precision_loss)]

use crate::classification::UnitKind;
use crate::profiling::Record;
use serde::Serialize;
use std::time::Duration;

/// Aggregated statistics for one unit kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindSummary {
    pub kind: UnitKind,
    pub count: usize,
    #[serde(serialize_with = "seconds")]
    pub total: Duration,
    /// Slowest single unit of this kind.
    pub slowest: Option<String>,
    /// Share of the session's outermost load time (0.0 - 100.0).
    pub percentage: f64,
}

fn seconds<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Summarize records per kind, in fixed kind order. Kinds with no records
/// are omitted.
#[must_use]
pub fn summarize_by_kind(records: &[Record]) -> Vec<KindSummary> {
    let session_total: Duration = records
        .iter()
        .filter(|r| r.depth() == 0)
        .map(Record::duration)
        .sum();

    UnitKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let of_kind: Vec<&Record> = records.iter().filter(|r| r.kind() == kind).collect();
            if of_kind.is_empty() {
                return None;
            }
            let total: Duration = of_kind.iter().map(|r| r.duration()).sum();
            // First maximum wins, keeping load order on ties
            let slowest = of_kind
                .iter()
                .fold(None::<&Record>, |best, r| match best {
                    Some(b) if b.duration() >= r.duration() => Some(b),
                    _ => Some(r),
                })
                .map(|r| r.unit().to_owned());
            let percentage = if session_total.is_zero() {
                0.0
            } else {
                total.as_secs_f64() / session_total.as_secs_f64() * 100.0
            };
            Some(KindSummary {
                kind,
                count: of_kind.len(),
                total,
                slowest,
                percentage,
            })
        })
        .collect()
}
