//! Resolution, caching and nested execution of units.

use crate::error::{FinderError, LoadError};
use crate::finder::{Finder, ResolutionChain, UnitSpec};
use crate::loader::Unit;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Owns the resolution chain and the cache of loaded units.
///
/// A unit is cached before its body runs, so a cycle (`a` loads `b` loads
/// `a`) sees the partially initialised `a` instead of recursing forever. A
/// unit whose body fails is evicted again.
#[derive(Debug, Default)]
pub struct Runtime {
    chain: ResolutionChain,
    units: HashMap<String, Rc<Unit>>,
    /// Names in the order their loads started.
    order: Vec<String>,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chain(chain: ResolutionChain) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn chain(&self) -> &ResolutionChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut ResolutionChain {
        &mut self.chain
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rc<Unit>> {
        self.units.get(name).cloned()
    }

    /// Loaded unit names, in the order their loads started.
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Load `name`, importing its enclosing packages first.
    ///
    /// # Errors
    /// - [`LoadError::NotFound`] if no finder resolves the name, or an
    ///   enclosing unit is not a package
    /// - Any error raised by the unit's loader (or an enclosing package's)
    /// - [`LoadError::Finder`] if a finder fails outright
    pub fn import(&mut self, name: &str) -> Result<Rc<Unit>, LoadError> {
        if let Some(unit) = self.units.get(name) {
            return Ok(Rc::clone(unit));
        }

        let search_path = match name.rsplit_once('.') {
            Some((parent_name, _)) => {
                let parent = self.import(parent_name)?;
                // The parent's body may have loaded us already
                if let Some(unit) = self.units.get(name) {
                    return Ok(Rc::clone(unit));
                }
                let Some(path) = parent.search_path() else {
                    return Err(LoadError::not_found(name));
                };
                Some(path.to_vec())
            }
            None => None,
        };

        let spec = self
            .find_spec(name, search_path.as_deref())?
            .ok_or_else(|| LoadError::not_found(name))?;

        let unit = Rc::new(Unit::from_spec(&spec));
        self.units.insert(name.to_owned(), Rc::clone(&unit));
        self.order.push(name.to_owned());

        debug!("executing {unit}");
        if let Err(err) = spec.loader.execute(&unit, self) {
            debug!("{unit} failed: {err}");
            self.units.remove(name);
            self.order.retain(|loaded| loaded != name);
            return Err(err);
        }
        Ok(unit)
    }

    /// Ask every finder in chain order; the first `Some` wins.
    ///
    /// # Errors
    /// The first finder failure other than [`FinderError::Unsupported`].
    pub fn find_spec(
        &self,
        name: &str,
        search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, LoadError> {
        query_finders(&self.chain.snapshot(), name, search_path).map_err(LoadError::from)
    }
}

/// Query `finders` in order, skipping those that do not support the lookup.
///
/// # Errors
/// The first [`FinderError::Failed`] encountered.
pub fn query_finders(
    finders: &[Rc<dyn Finder>],
    name: &str,
    search_path: Option<&[PathBuf]>,
) -> Result<Option<UnitSpec>, FinderError> {
    for finder in finders {
        match finder.find_spec(name, search_path) {
            Ok(Some(spec)) => return Ok(Some(spec)),
            Ok(None) => {}
            Err(FinderError::Unsupported { finder }) => {
                debug!("skipping {finder} for '{name}': lookup not supported");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(None)
}
