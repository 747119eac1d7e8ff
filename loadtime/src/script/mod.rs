//! Unit scripts: source units stored as files under search roots.
//!
//! A dotted name maps onto directories. For `app.util` under root `src/`:
//!
//! ```text
//! src/app/mod.unit        package "app" (sub-units live in src/app/)
//! src/app/util/mod.unit   package "app.util"   ← preferred if present
//! src/app/util.unit       plain unit "app.util"
//! ```
//!
//! Top-level names are searched in every root, in order. Sub-units are only
//! searched in their package's directory.

pub mod directive;

use self::directive::{parse_script, Directive};
use loadtime_host::{Finder, FinderError, LoadError, Loader, Runtime, Unit, UnitSpec};
use log::{debug, warn};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// File extension of unit scripts.
pub const SCRIPT_EXTENSION: &str = "unit";

/// File holding a package's own body.
pub const PACKAGE_SCRIPT: &str = "mod.unit";

/// Resolves unit names to script files.
#[derive(Debug, Clone)]
pub struct ScriptFinder {
    roots: Vec<PathBuf>,
}

impl ScriptFinder {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots: Vec<PathBuf> = roots.into_iter().map(Into::into).collect();
        for root in &roots {
            if !root.is_dir() {
                warn!("search path {} is not a directory", root.display());
            }
        }
        Self { roots }
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn locate(dirs: &[PathBuf], leaf: &str) -> Option<UnitLocation> {
        dirs.iter().find_map(|dir| {
            let package_dir = dir.join(leaf);
            let package_script = package_dir.join(PACKAGE_SCRIPT);
            if package_script.is_file() {
                return Some(UnitLocation {
                    script: package_script,
                    package_dir: Some(package_dir),
                });
            }
            let script = dir.join(format!("{leaf}.{SCRIPT_EXTENSION}"));
            if !script.is_file() {
                return None;
            }
            Some(UnitLocation {
                script,
                package_dir: None,
            })
        })
    }
}

struct UnitLocation {
    script: PathBuf,
    package_dir: Option<PathBuf>,
}

impl Finder for ScriptFinder {
    fn find_spec(
        &self,
        name: &str,
        search_path: Option<&[PathBuf]>,
    ) -> Result<Option<UnitSpec>, FinderError> {
        let leaf = name.rsplit('.').next().unwrap_or(name);
        let dirs = search_path.unwrap_or(&self.roots);
        let Some(location) = Self::locate(dirs, leaf) else {
            return Ok(None);
        };

        debug!("resolved '{name}' to {}", location.script.display());
        let loader: Rc<dyn Loader> = Rc::new(ScriptLoader {
            path: location.script.clone(),
            package: location.package_dir.is_some(),
        });
        let spec = UnitSpec::new(name, loader).with_origin(location.script);
        Ok(Some(match location.package_dir {
            Some(dir) => spec.with_search_locations(vec![dir]),
            None => spec,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Executes one unit script.
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    path: PathBuf,
    package: bool,
}

impl ScriptLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, package: bool) -> Self {
        Self {
            path: path.into(),
            package,
        }
    }
}

impl Loader for ScriptLoader {
    fn execute(&self, unit: &Unit, runtime: &mut Runtime) -> Result<(), LoadError> {
        let text = std::fs::read_to_string(&self.path);
        let text = text.map_err(|err| LoadError::io(&self.path, err))?;

        for (line, directive) in parse_script(unit.name(), &text)? {
            match directive {
                Directive::Load(dep) => {
                    runtime.import(&dep)?;
                }
                Directive::TryLoad(dep) => {
                    if let Err(err) = runtime.import(&dep) {
                        debug!(
                            "{}:{line}: handled failure loading '{dep}': {err}",
                            unit.name()
                        );
                    }
                }
                Directive::Sleep(duration) => std::thread::sleep(duration),
                Directive::Fail { kind, message } => return Err(LoadError::raised(kind, message)),
            }
        }
        Ok(())
    }

    fn is_source(&self) -> bool {
        true
    }

    fn is_package(&self, _name: &str) -> bool {
        self.package
    }

    fn origin(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn source(&self, _name: &str) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }
}
