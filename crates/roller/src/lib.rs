#![forbid(unsafe_code)]

//! Roller public facade crate.
//!
//! Guided page tours: a [`Guide`] walks through [`Step`]s, each of which
//! highlights one element with an optional dimming [`Overlay`] and a
//! [`Popover`] carrying the Skip / Prev / Next [`Controller`]. The visual
//! lifecycle of a single step is run by [`Roller`].
//!
//! Everything runs against a [`Page`], so the same tour drives the browser
//! DOM (`roller-web`) and the in-memory page used in tests
//! (`roller-harness`).

mod guide;
mod roller;
mod step;

// --- Tour re-exports ------------------------------------------------------

pub use guide::{Guide, GuideOptions};
pub use roller::{OverlayClickPolicy, Roller, RollerOptions};
pub use step::Step;

// --- Core re-exports ------------------------------------------------------

pub use roller_core::{
    CssError, Placed, PlacementRequest, Position, Rect, ScrollOffset, Side, Size, StyleMap,
    StyleValue, Viewport,
};

// --- Backend re-exports ---------------------------------------------------

pub use roller_backend::{
    EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent, ScrollBehavior, Target,
    TargetError, Wait,
};

// --- Widget re-exports ----------------------------------------------------

pub use roller_widgets::{
    Callback, Controller, ControllerLabels, ControllerOptions, ControllerStyles, EventHook, Focus,
    FocusOptions, Hover, HoverOptions, NavAction, NodeHook, Overlay, OverlayOptions, Popover,
    PopoverOptions, PopoverStyles, StepHook, Tip, TipOptions, TipPosition, TipStyles, WidgetError,
    callback, event_hook, node_hook, step_hook,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Roller tours.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A widget operation failed: a target matched nothing or a style
    /// could not be applied.
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

impl From<TargetError> for Error {
    fn from(err: TargetError) -> Self {
        Self::Widget(err.into())
    }
}

impl From<CssError> for Error {
    fn from(err: CssError) -> Self {
        Self::Widget(err.into())
    }
}

/// Standard result type for Roller APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Focus, Guide, GuideOptions, Overlay, OverlayOptions, Page, PageEvent, Popover,
        PopoverOptions, Position, Result, Step, StyleMap, Tip, TipOptions, TipPosition, Wait,
        callback, step_hook,
    };

    pub use crate::{backend, widgets};
}

pub use roller_backend as backend;
pub use roller_core as core;
pub use roller_widgets as widgets;
