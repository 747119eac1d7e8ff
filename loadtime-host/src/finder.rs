//! Finders, unit specs and the ordered resolution chain.

use crate::error::FinderError;
use crate::loader::Loader;
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// What a finder hands back for a name it can resolve.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub name: String,
    pub loader: Rc<dyn Loader>,
    pub origin: Option<PathBuf>,
    /// Set for packages: where to look for their sub-units.
    pub submodule_search_locations: Option<Vec<PathBuf>>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, loader: Rc<dyn Loader>) -> Self {
        Self {
            name: name.into(),
            loader,
            origin: None,
            submodule_search_locations: None,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn with_search_locations(mut self, locations: Vec<PathBuf>) -> Self {
        self.submodule_search_locations = Some(locations);
        self
    }
}

/// Resolves dotted unit names to [`UnitSpec`]s.
pub trait Finder: fmt::Debug {
    /// Look up `name`. `search_path` is the parent package's search path for
    /// dotted names and `None` for top-level names.
    ///
    /// # Errors
    /// [`FinderError::Unsupported`] when this finder cannot answer the query
    /// at all; callers skip such finders and continue down the chain.
    fn find_spec(
        &self,
        name: &str,
        search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError>;

    /// Used to recognise specific finder types inside a chain.
    fn as_any(&self) -> &dyn Any;
}

/// Stable handle to one entry of a [`ResolutionChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FinderId(u64);

impl fmt::Display for FinderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Finder#{}", self.0)
    }
}

/// Ordered list of finders, highest priority first.
#[derive(Debug, Default)]
pub struct ResolutionChain {
    entries: Vec<(FinderId, Rc<dyn Finder>)>,
    next_id: u64,
}

impl ResolutionChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the lowest priority.
    pub fn push(&mut self, finder: Rc<dyn Finder>) -> FinderId {
        let id = self.allocate_id();
        self.entries.push((id, finder));
        id
    }

    /// Insert at `index` (clamped to the chain length). Index 0 is queried first.
    pub fn insert(&mut self, index: usize, finder: Rc<dyn Finder>) -> FinderId {
        let id = self.allocate_id();
        let index = index.min(self.entries.len());
        self.entries.insert(index, (id, finder));
        id
    }

    /// Remove the entry with `id`. Returns false if it was not present.
    pub fn remove(&mut self, id: FinderId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Keep only the finders for which `keep` returns true.
    /// Returns how many entries were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&dyn Finder) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, finder)| keep(finder.as_ref()));
        before - self.entries.len()
    }

    #[must_use]
    pub fn contains(&self, id: FinderId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    #[must_use]
    pub fn position(&self, id: FinderId) -> Option<usize> {
        self.entries
            .iter()
            .position(|(entry_id, _)| *entry_id == id)
    }

    /// Clone the current finder list. Lookups iterate a snapshot so that a
    /// nested import never observes a borrowed chain.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rc<dyn Finder>> {
        self.entries
            .iter()
            .map(|(_, finder)| Rc::clone(finder))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FinderId, &Rc<dyn Finder>)> {
        self.entries.iter().map(|(id, finder)| (*id, finder))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn allocate_id(&mut self) -> FinderId {
        let id = FinderId(self.next_id);
        self.next_id += 1;
        id
    }
}
