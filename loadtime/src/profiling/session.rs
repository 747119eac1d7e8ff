//! Installing and removing the load interceptor.
//!
//! A [`Session`] is the handle returned by [`activate`]. It remembers the
//! exact chain entry it installed, so [`Session::deactivate`] never touches
//! finders owned by anyone else. [`deactivate`] is the blunt variant that
//! removes every interceptor in a chain.

use crate::profiling::call_stack::CallStack;
use crate::profiling::interceptor::InterceptFinder;
use crate::profiling::recorder::Recorder;
use loadtime_host::{Finder, FinderId, LoadError, Runtime, Unit};
use log::{debug, info};
use std::rc::Rc;

/// An active profiling session.
#[derive(Debug)]
#[must_use = "dropping the handle leaves the interceptor installed"]
pub struct Session {
    id: FinderId,
    recorder: Recorder,
    stack: CallStack,
}

impl Session {
    #[must_use]
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Chain entry this session installed.
    #[must_use]
    pub fn finder_id(&self) -> FinderId {
        self.id
    }

    /// Number of loads currently in progress.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Remove this session's interceptor and hand back its recorder.
    pub fn deactivate(self, runtime: &mut Runtime) -> Recorder {
        if runtime.chain_mut().remove(self.id) {
            info!(
                "deactivated load interceptor for '{}'",
                self.recorder.root()
            );
        } else {
            debug!("load interceptor {} was already removed", self.id);
        }
        self.recorder
    }
}

/// Start profiling loads relative to `root`.
///
/// Installs an interceptor at the highest-priority position of the runtime's
/// resolution chain. It defers to the finders present at activation time.
///
/// # Panics
///
/// Panics if an interceptor is already installed in this runtime's chain.
pub fn activate(runtime: &mut Runtime, root: &str) -> Session {
    assert!(!is_active(runtime), "load interceptor already installed");

    let recorder = Recorder::new(root);
    let stack = CallStack::new();
    let delegates = runtime.chain().snapshot();
    let finder = InterceptFinder::new(delegates, recorder.clone(), stack.clone());
    let id = runtime.chain_mut().insert(0, Rc::new(finder));

    let delegated = runtime.chain().len() - 1;
    info!(
        "activated load interceptor for '{root}' ({delegated} finders)"
    );
    Session {
        id,
        recorder,
        stack,
    }
}

/// Remove every interceptor from the runtime's chain.
///
/// Idempotent; returns how many were removed.
pub fn deactivate(runtime: &mut Runtime) -> usize {
    let removed = runtime.chain_mut().retain(|finder| !is_interceptor(finder));
    if removed > 0 {
        info!("removed {removed} load interceptor(s)");
    }
    removed
}

/// Whether any interceptor is installed in the runtime's chain.
#[must_use]
pub fn is_active(runtime: &Runtime) -> bool {
    runtime
        .chain()
        .iter()
        .any(|(_, finder)| is_interceptor(finder.as_ref()))
}

fn is_interceptor(finder: &dyn Finder) -> bool {
    finder.as_any().is::<InterceptFinder>()
}

/// Profile loading `root` in one go.
///
/// Activates, loads `root`, deactivates (also on failure) and sorts the
/// records slowest first. The load result is returned alongside the recorder
/// so callers can report what was measured before surfacing the failure.
pub fn profile(runtime: &mut Runtime, root: &str) -> (Recorder, Result<Rc<Unit>, LoadError>) {
    let session = activate(runtime, root);
    let result = runtime.import(root);
    debug_assert_eq!(
        session.stack_depth(),
        0,
        "load frames leaked past the root load"
    );
    let recorder = session.deactivate(runtime);
    recorder.sort();
    (recorder, result)
}
