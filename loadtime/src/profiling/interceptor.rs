//! Resolution-chain shim that times source-based loads.
//!
//! [`InterceptFinder`] sits at the front of the runtime's resolution chain.
//! It never resolves anything itself: it asks the real finders, and when the
//! winning spec has a source-based loader it swaps in a [`TimedLoader`] that
//! wraps the execution step with the call stack and the recorder.
//!
//! ```text
//! InterceptFinder::find_spec("requests")
//!     │
//!     ├─► delegate #0 ─► delegate #1 ─► ...      (Unsupported → skipped)
//!     │
//!     └─► spec.loader.is_source()?
//!            ├─ yes → TimedLoader { inner: spec.loader }
//!            └─ no  → spec unchanged (builtins are not timed)
//!
//! TimedLoader::execute
//!     stack.enter(unit) ─► recorder.time_and_classify(unit, parent) ─► inner.execute
//!          ▲                                                               │
//!          └──────────────── frame dropped on every exit path ◄────────────┘
//! ```

use crate::profiling::call_stack::CallStack;
use crate::profiling::recorder::Recorder;
use loadtime_host::{
    query_finders, Finder, FinderError, LoadError, Loader, Runtime, Unit, UnitSpec,
};
use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Finder installed by a profiling session.
pub struct InterceptFinder {
    delegates: Vec<Rc<dyn Finder>>,
    recorder: Recorder,
    stack: CallStack,
}

impl InterceptFinder {
    /// `delegates` are the real finders to defer to, in priority order.
    #[must_use]
    pub fn new(delegates: Vec<Rc<dyn Finder>>, recorder: Recorder, stack: CallStack) -> Self {
        Self {
            delegates,
            recorder,
            stack,
        }
    }

    #[must_use]
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    fn wrap(&self, spec: UnitSpec) -> UnitSpec {
        if !spec.loader.is_source() {
            return spec;
        }
        let loader: Rc<dyn Loader> = Rc::new(TimedLoader {
            inner: spec.loader,
            recorder: self.recorder.clone(),
            stack: self.stack.clone(),
        });
        UnitSpec { loader, ..spec }
    }
}

impl fmt::Debug for InterceptFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptFinder")
            .field("root", &self.recorder.root())
            .field("delegates", &self.delegates.len())
            .finish_non_exhaustive()
    }
}

impl Finder for InterceptFinder {
    fn find_spec(
        &self,
        name: &str,
        search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError> {
        let spec = query_finders(&self.delegates, name, search_path)?;
        Ok(spec.map(|spec| self.wrap(spec)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Loader wrapper that times and attributes the inner loader's execution.
///
/// Every capability other than `execute` is forwarded to the inner loader
/// unchanged.
pub struct TimedLoader {
    inner: Rc<dyn Loader>,
    recorder: Recorder,
    stack: CallStack,
}

impl TimedLoader {
    #[must_use]
    pub fn inner(&self) -> &Rc<dyn Loader> {
        &self.inner
    }
}

impl fmt::Debug for TimedLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedLoader")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Loader for TimedLoader {
    fn execute(&self, unit: &Unit, runtime: &mut Runtime) -> Result<(), LoadError> {
        let frame = self.stack.enter(unit.name());
        let execute = || self.inner.execute(unit, runtime);
        self.recorder
            .time_and_classify(unit.name(), frame.parent(), frame.depth(), execute)
    }

    fn is_source(&self) -> bool {
        self.inner.is_source()
    }

    fn is_package(&self, name: &str) -> bool {
        self.inner.is_package(name)
    }

    fn origin(&self) -> Option<&Path> {
        self.inner.origin()
    }

    fn source(&self, name: &str) -> Option<String> {
        self.inner.source(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtime_host::{BuiltinFinder, MemoryFinder};

    fn intercept(finders: Vec<Rc<dyn Finder>>) -> (InterceptFinder, Recorder, CallStack) {
        let recorder = Recorder::new("app");
        let stack = CallStack::new();
        let finder = InterceptFinder::new(finders, recorder.clone(), stack.clone());
        (finder, recorder, stack)
    }

    fn boom(_: &Unit, _: &mut Runtime) -> Result<(), LoadError> {
        Err(LoadError::raised("ValueError", "boom"))
    }

    #[test]
    fn test_source_loader_is_wrapped() {
        let memory: Rc<dyn Finder> = Rc::new(MemoryFinder::new().package("app", |_, _| Ok(())));
        let (finder, _, _) = intercept(vec![memory]);
        let spec = finder.find_spec("app", None).unwrap().unwrap();
        assert!(format!("{:?}", spec.loader).starts_with("TimedLoader"));
        // Forwarded capabilities
        assert!(spec.loader.is_source());
        assert!(spec.loader.is_package("app"));
        assert!(spec.submodule_search_locations.is_some());
    }

    #[test]
    fn test_non_source_loader_passes_through() {
        let builtins: Rc<dyn Finder> = Rc::new(BuiltinFinder::new(["sys"]));
        let (finder, _, _) = intercept(vec![builtins]);
        let spec = finder.find_spec("sys", None).unwrap().unwrap();
        assert!(format!("{:?}", spec.loader).starts_with("BuiltinLoader"));
    }

    #[test]
    fn test_unresolved_name_is_none() {
        let (finder, _, _) = intercept(Vec::new());
        assert!(finder.find_spec("ghost", None).unwrap().is_none());
    }

    #[test]
    fn test_timed_execute_records_and_pops() {
        let memory = MemoryFinder::new().loads("app", Vec::<String>::new());
        let memory: Rc<dyn Finder> = Rc::new(memory);
        let (finder, recorder, stack) = intercept(vec![memory]);
        let spec = finder.find_spec("app", None).unwrap().unwrap();

        let mut runtime = Runtime::new();
        let unit = Unit::from_spec(&spec);
        spec.loader.execute(&unit, &mut runtime).unwrap();

        assert!(stack.is_empty());
        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].unit(), "app");
        assert_eq!(records[0].parent(), None);
    }

    #[test]
    fn test_timed_execute_failure_pops_and_propagates() {
        let memory: Rc<dyn Finder> = Rc::new(MemoryFinder::new().module("dep", boom));
        let (finder, recorder, stack) = intercept(vec![memory]);
        let spec = finder.find_spec("dep", None).unwrap().unwrap();

        let mut runtime = Runtime::new();
        let unit = Unit::from_spec(&spec);
        let err = spec.loader.execute(&unit, &mut runtime).unwrap_err();

        assert_eq!(err.type_name(), "ValueError");
        assert!(stack.is_empty());
        assert_eq!(recorder.records().len(), 1);
        assert_eq!(recorder.errors().len(), 1);
    }
}
