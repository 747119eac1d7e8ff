//! Source units defined in memory.
//!
//! Each unit is a closure run as the unit's body. Handy for embedding units in
//! a host program and for exercising the pipeline without touching disk.

use crate::error::{FinderError, LoadError};
use crate::finder::{Finder, UnitSpec};
use crate::loader::{Loader, Unit};
use crate::runtime::Runtime;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

type Body = Rc<dyn Fn(&Unit, &mut Runtime) -> Result<(), LoadError>>;

#[derive(Clone)]
struct MemoryUnit {
    body: Body,
    package: bool,
}

#[derive(Default)]
pub struct MemoryFinder {
    units: BTreeMap<String, MemoryUnit>,
}

impl MemoryFinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain unit.
    #[must_use]
    pub fn module<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Unit, &mut Runtime) -> Result<(), LoadError> + 'static,
    {
        self.register(name.into(), Rc::new(body), false)
    }

    /// Register a package, i.e. a unit that may have dotted sub-units.
    #[must_use]
    pub fn package<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Unit, &mut Runtime) -> Result<(), LoadError> + 'static,
    {
        self.register(name.into(), Rc::new(body), true)
    }

    /// Register a unit whose body loads `deps` in order.
    #[must_use]
    pub fn loads<I, S>(self, name: impl Into<String>, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let deps: Vec<String> = deps.into_iter().map(Into::into).collect();
        self.module(name, move |_, runtime| {
            for dep in &deps {
                runtime.import(dep)?;
            }
            Ok(())
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    fn register(mut self, name: String, body: Body, package: bool) -> Self {
        self.units.insert(name, MemoryUnit { body, package });
        self
    }
}

impl fmt::Debug for MemoryFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFinder")
            .field("units", &self.units.keys())
            .finish()
    }
}

impl Finder for MemoryFinder {
    fn find_spec(
        &self,
        name: &str,
        _search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError> {
        let Some(unit) = self.units.get(name) else {
            return Ok(None);
        };
        let loader: Rc<dyn Loader> = Rc::new(MemoryLoader {
            name: name.to_owned(),
            body: Rc::clone(&unit.body),
            package: unit.package,
        });
        let spec = UnitSpec::new(name, loader);
        if unit.package {
            return Ok(Some(spec.with_search_locations(Vec::new())));
        }
        Ok(Some(spec))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MemoryLoader {
    name: String,
    body: Body,
    package: bool,
}

impl fmt::Debug for MemoryLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLoader")
            .field("name", &self.name)
            .field("package", &self.package)
            .finish_non_exhaustive()
    }
}

impl Loader for MemoryLoader {
    fn execute(&self, unit: &Unit, runtime: &mut Runtime) -> Result<(), LoadError> {
        (self.body)(unit, runtime)
    }

    fn is_source(&self) -> bool {
        true
    }

    fn is_package(&self, name: &str) -> bool {
        self.package && name == self.name
    }
}
