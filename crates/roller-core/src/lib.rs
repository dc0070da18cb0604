#![forbid(unsafe_code)]

//! Core: geometry, placement, scrolling, and style primitives for Roller.
//!
//! # Role in Roller
//! `roller-core` is the pure layer. Nothing here touches a page: every function
//! takes rectangles, sizes, and strings and returns new values. The widgets in
//! `roller-widgets` read rectangles from a [`Page`](../roller_backend/trait.Page.html),
//! feed them through this crate, and write the results back.
//!
//! # Primary responsibilities
//! - **geometry**: viewport-relative rectangles, sizes, and scroll offsets.
//! - **placement**: where a floating box goes relative to a target.
//! - **scroll**: the scroll offset that brings a target toward the center.
//! - **css**: structured inline-style maps and their declaration blocks.
//! - **easing**: the fade curves used by every close animation.

pub mod css;
pub mod easing;
pub mod geometry;
pub mod placement;
pub mod scroll;

pub use css::{CssError, StyleMap, StyleValue};
pub use geometry::{Rect, ScrollOffset, Size, Viewport};
pub use placement::{Placed, PlacementRequest, Position, Side};
