//! Units compiled into the host.
//!
//! Builtin units have no source to execute, so their loader reports
//! `is_source() == false` and instrumentation passes them through untimed.

use crate::error::{FinderError, LoadError};
use crate::finder::{Finder, UnitSpec};
use crate::loader::{Loader, Unit};
use crate::runtime::Runtime;
use std::any::Any;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct BuiltinFinder {
    names: BTreeSet<String>,
    loader: Rc<BuiltinLoader>,
}

impl BuiltinFinder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            loader: Rc::default(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Finder for BuiltinFinder {
    fn find_spec(
        &self,
        name: &str,
        _search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError> {
        if !self.contains(name) {
            return Ok(None);
        }
        let loader: Rc<dyn Loader> = self.loader.clone();
        Ok(Some(UnitSpec::new(name, loader)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
pub struct BuiltinLoader;

impl Loader for BuiltinLoader {
    fn execute(&self, _unit: &Unit, _runtime: &mut Runtime) -> Result<(), LoadError> {
        Ok(())
    }
}
