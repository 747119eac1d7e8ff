//! # Unit Resolution Pipeline
//!
//! The host side that `loadtime` instruments. A [`Runtime`] owns an ordered
//! [`ResolutionChain`] of [`Finder`]s and a cache of loaded [`Unit`]s. Loading
//! a unit by its dotted name walks the chain until a finder returns a
//! [`UnitSpec`], then hands the unit to the spec's [`Loader`].
//!
//! ```text
//!  Runtime::import("app.util")
//!      │
//!      ├─► import parent "app" first (packages only)
//!      │
//!      ├─► ResolutionChain: finder #0 ─► finder #1 ─► ...   (first Some wins)
//!      │                                   │
//!      │                                   ▼
//!      │                               UnitSpec { loader, origin, ... }
//!      │
//!      └─► cache unit, then loader.execute(&unit, runtime)
//!              │
//!              └─► may call runtime.import(..) again (strictly nested)
//! ```
//!
//! ## Key Types
//!
//! - [`Finder`] / [`Loader`] - The two provider traits
//! - [`ResolutionChain`] - Ordered finder list with stable [`FinderId`]s
//! - [`Runtime`] - Resolution, caching and nested execution
//! - [`BuiltinFinder`] - Units compiled into the host (never source based)
//! - [`MemoryFinder`] - Source units defined in memory
//! - [`LoadError`] / [`FinderError`] - Failure taxonomy
//!
//! Everything here is single-threaded: the runtime hands `&mut Runtime` to the
//! executing loader, so nested loads are serialized by call/return nesting.

pub mod builtin;
pub mod error;
pub mod finder;
pub mod loader;
pub mod memory;
pub mod runtime;

pub use builtin::{BuiltinFinder, BuiltinLoader};
pub use error::{FinderError, LoadError};
pub use finder::{Finder, FinderId, ResolutionChain, UnitSpec};
pub use loader::{Loader, Unit};
pub use memory::{MemoryFinder, MemoryLoader};
pub use runtime::{query_finders, Runtime};
