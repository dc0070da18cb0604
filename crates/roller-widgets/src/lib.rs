#![forbid(unsafe_code)]

//! Widgets for Roller page tours.
//!
//! # Role in Roller
//! Every widget here owns one or more nodes on a [`Page`](roller_backend::Page)
//! and exposes async `show`/`close` style operations that resolve only when
//! the page has finished changing. Events are not delivered through
//! callbacks registered on the page: widgets subscribe with
//! [`Page::listen`](roller_backend::Page::listen), and the host hands each
//! [`PageEvent`](roller_backend::PageEvent) back to the widget's
//! `handle_event`, which matches it against the subscriptions it holds.
//!
//! # Widgets
//! - [`Focus`]: emphasizes the highlighted element and restores it exactly.
//! - [`Overlay`]: full-viewport dimming layer, shareable between steps.
//! - [`Popover`]: titled box placed next to the highlighted element.
//! - [`Tip`]: corner announcement with Close and OK buttons.
//! - [`Hover`]: hint box following pointer enter/leave.
//! - [`Controller`]: Skip / Prev / Next buttons for a guide.

pub mod controller;
pub mod defaults;
mod error;
pub mod fade;
pub mod focus;
pub mod hook;
pub mod hover;
pub mod overlay;
pub mod popover;
pub mod tip;

pub use controller::{
    Controller, ControllerLabels, ControllerOptions, ControllerStyles, NavAction, NavState,
};
pub use error::{Result, WidgetError};
pub use focus::{Focus, FocusOptions, FocusSnapshot};
pub use hook::{
    Callback, EventHook, LocalFuture, NodeHook, StepHook, callback, event_hook, node_hook, step_hook,
};
pub use hover::{Hover, HoverOptions};
pub use overlay::{Overlay, OverlayOptions};
pub use popover::{Popover, PopoverOptions, PopoverStyles};
pub use tip::{ParseTipPositionError, Tip, TipAction, TipOptions, TipPhase, TipPosition, TipStyles};
