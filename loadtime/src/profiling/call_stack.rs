//! Stack of in-progress unit loads.
//!
//! Loads are strictly nested: a unit that triggers another load blocks until
//! the nested load returns. The stack therefore mirrors the nesting exactly,
//! and its top at the moment a load starts is that load's parent.

use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to the chain of currently open load frames (innermost last).
///
/// Cloning yields another handle to the same stack. Not `Send`: one stack per
/// thread of load activity.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Rc<RefCell<Vec<String>>>,
}

impl CallStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `name` and return a guard that pops it when dropped.
    ///
    /// The guard remembers the previous top of stack as the frame's parent.
    pub fn enter(&self, name: &str) -> Frame {
        let mut frames = self.frames.borrow_mut();
        let parent = frames.last().cloned();
        let depth = frames.len();
        frames.push(name.to_owned());
        debug!("enter {name} (depth {depth}, parent {parent:?})");
        Frame {
            stack: self.clone(),
            name: name.to_owned(),
            parent,
            depth,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    /// Name of the innermost open frame.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.frames.borrow().last().cloned()
    }

    /// Copy of the open frames, outermost first.
    #[must_use]
    pub fn frames(&self) -> Vec<String> {
        self.frames.borrow().clone()
    }
}

/// One open load frame. Dropping it pops the frame, on every exit path.
#[derive(Debug)]
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct Frame {
    stack: CallStack,
    name: String,
    parent: Option<String>,
    depth: usize,
}

impl Frame {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frame that was on top when this one was entered.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Number of frames below this one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        let popped = self.stack.frames.borrow_mut().pop();
        debug_assert_eq!(
            popped.as_deref(),
            Some(self.name.as_str()),
            "load frames must be closed innermost first"
        );
        debug!("exit {}", self.name);
    }
}
