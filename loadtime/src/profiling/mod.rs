//! Load instrumentation core
//!
//! - [`call_stack`]: Chain of in-progress loads, for parent attribution
//! - [`recorder`]: Scoped timing, classification and error capture
//! - [`interceptor`]: Resolution-chain shim wrapping source-based loaders
//! - [`session`]: Activation handle and one-shot [`profile`]

pub mod call_stack;
pub mod interceptor;
pub mod recorder;
pub mod session;

// Re-export common types
pub use call_stack::{CallStack, Frame};
pub use interceptor::{InterceptFinder, TimedLoader};
pub use recorder::{ErrorEntry, Record, Recorder, TrackSpan};
pub use session::{activate, deactivate, is_active, profile, Session};
