use loadtime_host::{
    BuiltinFinder, Finder, FinderError, LoadError, MemoryFinder, ResolutionChain, Runtime, Unit,
    UnitSpec,
};
use std::any::Any;
use std::path::PathBuf;
use std::rc::Rc;

/// A finder that only understands top-level names.
#[derive(Debug)]
struct TopLevelOnly;

impl Finder for TopLevelOnly {
    fn find_spec(
        &self,
        _name: &str,
        search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError> {
        if search_path.is_some() {
            return Err(FinderError::Unsupported {
                finder: "TopLevelOnly".to_string(),
            });
        }
        Ok(None)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Broken;

impl Finder for Broken {
    fn find_spec(
        &self,
        _name: &str,
        _search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError> {
        Err(FinderError::Failed {
            finder: "Broken".to_string(),
            message: "index corrupt".to_string(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn boom(_: &Unit, _: &mut Runtime) -> Result<(), LoadError> {
    Err(LoadError::raised("ValueError", "boom"))
}

#[test]
fn test_unsupported_finder_is_skipped() {
    let mut chain = ResolutionChain::new();
    let memory = MemoryFinder::new()
        .package("app", |_, _| Ok(()))
        .loads("app.util", Vec::<String>::new());
    chain.push(Rc::new(TopLevelOnly));
    chain.push(Rc::new(memory));
    let mut runtime = Runtime::with_chain(chain);

    let unit = runtime
        .import("app.util")
        .expect("lookup should continue past TopLevelOnly");
    assert_eq!(unit.name(), "app.util");
    assert_eq!(unit.parent_name(), Some("app"));
}

#[test]
fn test_failed_finder_aborts_lookup() {
    let mut chain = ResolutionChain::new();
    chain.push(Rc::new(Broken));
    chain.push(Rc::new(BuiltinFinder::new(["sys"])));
    let mut runtime = Runtime::with_chain(chain);

    let err = runtime.import("sys").unwrap_err();
    assert!(matches!(err, LoadError::Finder(FinderError::Failed { .. })));
    assert_eq!(err.type_name(), "FinderError");
}

#[test]
fn test_nested_failure_propagates_to_caller() {
    let mut chain = ResolutionChain::new();
    let memory = MemoryFinder::new()
        .loads("app", ["requests"])
        .module("requests", boom);
    chain.push(Rc::new(memory));
    let mut runtime = Runtime::with_chain(chain);

    let err = runtime.import("app").unwrap_err();
    assert_eq!(err.type_name(), "ValueError");
    assert_eq!(err.to_string(), "boom");
    assert!(!runtime.is_loaded("app"));
    assert!(!runtime.is_loaded("requests"));
}

#[test]
fn test_handled_failure_keeps_importer_loaded() {
    let mut chain = ResolutionChain::new();
    let memory = MemoryFinder::new().module("app", |_, runtime| {
        // Optional dependency: fall back silently when missing
        let _ = runtime.import("ujson");
        Ok(())
    });
    chain.push(Rc::new(memory));
    let mut runtime = Runtime::with_chain(chain);

    runtime.import("app").unwrap();
    assert!(runtime.is_loaded("app"));
    assert!(!runtime.is_loaded("ujson"));
}
