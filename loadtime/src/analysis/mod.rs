//! Analysis logic for recorded loads
//!
//! Pure aggregation over records, separated from report formatting.

pub mod kind_summary;

pub use kind_summary::{summarize_by_kind, KindSummary};
