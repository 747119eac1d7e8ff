//! Trace export functionality
//!
//! Exports recorded loads as Chrome Trace Event Format, viewable in Perfetto,
//! Speedscope or `chrome://tracing`.

pub mod chrome_trace;

pub use chrome_trace::ChromeTraceExporter;
