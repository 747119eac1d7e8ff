//! Loaded units and the [`Loader`] trait that executes them.

use crate::error::LoadError;
use crate::finder::UnitSpec;
use crate::runtime::Runtime;
use std::fmt;
use std::path::{Path, PathBuf};

/// A unit created from a [`UnitSpec`], cached by the [`Runtime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    name: String,
    origin: Option<PathBuf>,
    /// Directories searched for sub-units. `Some` marks a package.
    search_path: Option<Vec<PathBuf>>,
}

impl Unit {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: None,
            search_path: None,
        }
    }

    #[must_use]
    pub fn from_spec(spec: &UnitSpec) -> Self {
        Self {
            name: spec.name.clone(),
            origin: spec.origin.clone(),
            search_path: spec.submodule_search_locations.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    #[must_use]
    pub fn is_package(&self) -> bool {
        self.search_path.is_some()
    }

    #[must_use]
    pub fn search_path(&self) -> Option<&[PathBuf]> {
        self.search_path.as_deref()
    }

    /// Dotted name of the enclosing package, if any (`a.b.c` -> `a.b`).
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Some(origin) => write!(f, "<unit '{}' from '{}'>", self.name, origin.display()),
            None => write!(f, "<unit '{}'>", self.name),
        }
    }
}

/// Executes a unit's body.
///
/// `execute` is the only required capability. The metadata accessors have
/// defaults so that simple loaders stay small; wrappers must forward all of
/// them explicitly.
pub trait Loader: fmt::Debug {
    /// Run the unit. May import other units through `runtime`.
    ///
    /// # Errors
    /// Any failure raised while executing the unit, including failures of
    /// nested imports that the unit does not handle.
    fn execute(&self, unit: &Unit, runtime: &mut Runtime) -> Result<(), LoadError>;

    /// Whether execution runs interpretable source (and can be intercepted).
    fn is_source(&self) -> bool {
        false
    }

    fn is_package(&self, _name: &str) -> bool {
        false
    }

    fn origin(&self) -> Option<&Path> {
        None
    }

    fn source(&self, _name: &str) -> Option<String> {
        None
    }
}
