//! # loadtime - Unit Load-Time Profiler
//!
//! loadtime loads a root unit with instrumentation in place and reports how
//! long every nested load took, slowest first. Each load is tagged with how it
//! relates to the root: the root itself, a sub-unit of the root's project, a
//! direct dependency, or a transitive one.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Runtime (loadtime-host)                       │
//! │   ResolutionChain: [InterceptFinder, BuiltinFinder, Script...]  │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ find_spec / execute (strictly nested)
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Profiling (This Crate)                         │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │ Interceptor  │──▶│  CallStack   │──▶│   Recorder   │         │
//! │  │ (TimedLoader)│   │  (parents)   │   │ (classify)   │         │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘         │
//! │                                               │ records/errors  │
//! │         ┌─────────────────────┬───────────────┤                 │
//! │         ▼                     ▼               ▼                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │    Report    │   │   Analysis   │   │    Export    │         │
//! │  │   (table)    │   │  (by kind)   │   │ (trace.json) │         │
//! │  └──────────────┘   └──────────────┘   └──────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`profiling`]: The instrumentation engine
//!   - `call_stack`: Open load frames, for parent attribution
//!   - `recorder`: Scoped timers producing [`profiling::Record`]s
//!   - `interceptor`: Resolution-chain shim that wraps source-based loaders
//!   - `session`: [`profiling::activate`] / [`profiling::deactivate`]
//!
//! - [`classification`]: Root / project / dependency / transitive rules
//!
//! - [`script`]: Unit scripts on disk, the source format the CLI loads
//!
//! - [`analysis`]: Per-kind aggregation
//!
//! - [`export`]: Chrome Trace Event Format JSON
//!
//! - [`report`]: Table and JSON report formatting
//!
//! - [`cli`], [`preflight`], [`domain`]: Arguments, validation, error types
//!
//! ## Typical Usage
//!
//! ```bash
//! # Profile unit 'app' from scripts under src/
//! loadtime -p src app
//!
//! # Ten slowest, with per-kind totals and a trace for Perfetto
//! loadtime -p src app --top 10 --summary --export trace.json
//! ```
//!
//! ## Library Usage
//!
//! ```
//! use loadtime::profiling::profile;
//! use loadtime_host::{MemoryFinder, Runtime};
//! use std::rc::Rc;
//!
//! let mut runtime = Runtime::new();
//! let finder = MemoryFinder::new()
//!     .loads("app", ["requests"])
//!     .loads("requests", ["urllib3"])
//!     .loads("urllib3", Vec::<String>::new());
//! runtime.chain_mut().push(Rc::new(finder));
//!
//! let (recorder, result) = profile(&mut runtime, "app");
//! assert!(result.is_ok());
//! assert_eq!(recorder.len(), 3);
//! ```

pub mod analysis;
pub mod classification;
pub mod cli;
pub mod domain;
pub mod export;
pub mod preflight;
pub mod profiling;
pub mod report;
pub mod script;
