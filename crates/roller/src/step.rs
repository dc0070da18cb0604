#![forbid(unsafe_code)]

//! One stop in a tour.

use std::fmt;
use std::rc::Rc;

use roller_widgets::{Focus, Overlay, Popover, StepHook};

/// A focus target plus its optional overlay, popover, and hooks.
///
/// A step without an overlay of its own is given the guide's shared
/// overlay the first time the guide moves to it.
pub struct Step {
    pub(crate) before_insert: Option<StepHook>,
    pub(crate) overlay: Option<Rc<Overlay>>,
    pub(crate) focus: Focus,
    pub(crate) popover: Option<Popover>,
    pub(crate) after_remove: Option<StepHook>,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("before_insert", &self.before_insert.is_some())
            .field("overlay", &self.overlay)
            .field("focus", &self.focus)
            .field("popover", &self.popover)
            .field("after_remove", &self.after_remove.is_some())
            .finish()
    }
}

impl Step {
    pub fn new(focus: Focus) -> Self {
        Self {
            before_insert: None,
            overlay: None,
            focus,
            popover: None,
            after_remove: None,
        }
    }

    /// Awaited before anything is shown.
    #[must_use]
    pub fn before_insert(mut self, hook: StepHook) -> Self {
        self.before_insert = Some(hook);
        self
    }

    /// Use a private overlay instead of the guide's shared one.
    #[must_use]
    pub fn with_overlay(mut self, overlay: Rc<Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    #[must_use]
    pub fn with_popover(mut self, popover: Popover) -> Self {
        self.popover = Some(popover);
        self
    }

    /// Awaited after everything is removed.
    #[must_use]
    pub fn after_remove(mut self, hook: StepHook) -> Self {
        self.after_remove = Some(hook);
        self
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn overlay(&self) -> Option<&Rc<Overlay>> {
        self.overlay.as_ref()
    }

    pub fn popover(&self) -> Option<&Popover> {
        self.popover.as_ref()
    }
}
