//! Domain model for loadtime
//!
//! Error types for the reporting side. Records and kinds live with the code
//! that produces them ([`crate::profiling`], [`crate::classification`]).

pub mod errors;

pub use errors::{ExportError, ReportError};
