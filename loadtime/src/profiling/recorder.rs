//! Load timing and classification.
//!
//! The [`Recorder`] owns everything a session learns: one [`Record`] per
//! executed unit and one [`ErrorEntry`] per failed execution step. Timing is
//! scoped: a [`TrackSpan`] measures from creation to drop, so a record is
//! written whether the load returns, fails or unwinds.
//!
//! ```text
//! track("requests", parent = "app")
//!     │  start = Instant::now()
//!     ▼
//! loader.execute(..)  ──► may track nested loads first
//!     │
//!     ▼  drop
//! Record { unit, kind = classify(unit, parent), duration, parent }
//! ```
//!
//! Records are appended on completion, so children appear before the parent
//! that loaded them until [`Recorder::sort`] is called.

use crate::classification::{classify, UnitKind};
use loadtime_host::LoadError;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// One completed load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    unit: String,
    kind: UnitKind,
    #[serde(rename = "seconds", serialize_with = "serialize_seconds")]
    duration: Duration,
    parent: Option<String>,
    /// Offset of the load start from session start.
    #[serde(rename = "start_seconds", serialize_with = "serialize_seconds")]
    start: Duration,
    depth: usize,
}

impl Record {
    #[must_use]
    pub fn new(
        unit: impl Into<String>,
        kind: UnitKind,
        duration: Duration,
        parent: Option<String>,
    ) -> Self {
        Self {
            unit: unit.into(),
            kind,
            duration,
            parent,
            start: Duration::ZERO,
            depth: 0,
        }
    }

    /// Place the record on the session timeline.
    #[must_use]
    pub fn at(mut self, start: Duration, depth: usize) -> Self {
        self.start = start;
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Duration in floating seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn start(&self) -> Duration {
        self.start
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// A failure observed while executing `unit`.
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    unit: String,
    depth: usize,
    error: LoadError,
}

impl ErrorEntry {
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Nesting depth of the failed load (0 for an outermost load).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn error(&self) -> &LoadError {
        &self.error
    }

    /// Whether `other` reports the same failure (same type and message).
    fn same_failure(&self, other: &ErrorEntry) -> bool {
        self.error.type_name() == other.error.type_name()
            && self.error.to_string() == other.error.to_string()
    }
}

/// Index where the trailing unhandled chain starts, or `errors.len()`.
///
/// A failure that escapes the outermost load is recorded once per level it
/// passes through, innermost first, and always ends at depth 0. Walking back
/// from that last entry, each step must be one level deeper and carry the
/// same failure.
fn unhandled_start(errors: &[ErrorEntry]) -> usize {
    let Some(mut outer) = errors.last().filter(|entry| entry.depth == 0) else {
        return errors.len();
    };
    let mut start = errors.len() - 1;
    while start > 0 {
        let inner = &errors[start - 1];
        if inner.depth != outer.depth + 1 || !inner.same_failure(outer) {
            break;
        }
        start -= 1;
        outer = inner;
    }
    start
}

#[derive(Debug)]
struct RecorderState {
    root: String,
    started: Instant,
    records: RefCell<Vec<Record>>,
    errors: RefCell<Vec<ErrorEntry>>,
}

/// Collects records and errors for one profiling session.
///
/// Cheap to clone; clones share the same state. Not `Send`.
#[derive(Debug, Clone)]
pub struct Recorder {
    state: Rc<RecorderState>,
}

impl Recorder {
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RecorderState {
                root: root.into(),
                started: Instant::now(),
                records: RefCell::default(),
                errors: RefCell::default(),
            }),
        }
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.state.root
    }

    /// Start timing `unit`. The record is written when the span is dropped.
    pub fn track(&self, unit: &str, parent: Option<&str>, depth: usize) -> TrackSpan {
        TrackSpan {
            recorder: self.clone(),
            unit: unit.to_owned(),
            parent: parent.map(str::to_owned),
            depth,
            started: Instant::now(),
        }
    }

    /// Time `load`, record the outcome, and hand its result back unchanged.
    ///
    /// A failure is stored via [`Recorder::record_error`] before being
    /// returned; the record for `unit` is written either way.
    ///
    /// # Errors
    /// Exactly the error returned by `load`.
    pub fn time_and_classify<T>(
        &self,
        unit: &str,
        parent: Option<&str>,
        depth: usize,
        load: impl FnOnce() -> Result<T, LoadError>,
    ) -> Result<T, LoadError> {
        let _span = self.track(unit, parent, depth);
        let result = load();
        if let Err(err) = &result {
            self.record_error(unit, depth, err.clone());
        }
        result
    }

    pub fn record_error(&self, unit: &str, depth: usize, error: LoadError) {
        let entry = ErrorEntry {
            unit: unit.to_owned(),
            depth,
            error,
        };
        self.state.errors.borrow_mut().push(entry);
    }

    /// Classify `unit` loaded by `parent` against this session's root.
    #[must_use]
    pub fn classify(&self, unit: Option<&str>, parent: Option<&str>) -> UnitKind {
        classify(&self.state.root, unit, parent)
    }

    /// Order records slowest first. Stable, so equal durations keep load order.
    pub fn sort(&self) {
        let mut records = self.state.records.borrow_mut();
        records.sort_by(|a, b| b.duration.cmp(&a.duration));
    }

    /// Snapshot of the records in their current order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.state.records.borrow().clone()
    }

    /// Snapshot of the errors in the order they were observed.
    #[must_use]
    pub fn errors(&self) -> Vec<ErrorEntry> {
        self.state.errors.borrow().clone()
    }

    /// Split the errors into those some unit handled and the chain of
    /// entries left by a failure that escaped an outermost load.
    ///
    /// The unhandled chain is ordered innermost first and is empty when
    /// every outermost load succeeded.
    #[must_use]
    pub fn partition_errors(&self) -> (Vec<ErrorEntry>, Vec<ErrorEntry>) {
        let mut handled = self.errors();
        let start = unhandled_start(&handled);
        let unhandled = handled.split_off(start);
        (handled, unhandled)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.records.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.records.borrow().is_empty()
    }

    /// Wall time spent in outermost loads (nested time is not double counted).
    #[must_use]
    pub fn total_time(&self) -> Duration {
        self.state
            .records
            .borrow()
            .iter()
            .filter(|record| record.depth == 0)
            .map(|record| record.duration)
            .sum()
    }

    fn push(&self, record: Record) {
        self.state.records.borrow_mut().push(record);
    }
}

/// Scoped timer for a single load.
#[derive(Debug)]
#[must_use = "the load is timed until the span is dropped"]
pub struct TrackSpan {
    recorder: Recorder,
    unit: String,
    parent: Option<String>,
    depth: usize,
    started: Instant,
}

impl Drop for TrackSpan {
    fn drop(&mut self) {
        let duration = self.started.elapsed();
        let unit = std::mem::take(&mut self.unit);
        let parent = self.parent.take();
        let kind = self.recorder.classify(Some(&unit), parent.as_deref());
        let session_start = self.recorder.state.started;
        let start = self.started.saturating_duration_since(session_start);
        let record = Record::new(unit, kind, duration, parent);
        self.recorder.push(record.at(start, self.depth));
    }
}
