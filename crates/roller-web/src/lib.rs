#![forbid(unsafe_code)]

//! Browser backend for Roller.
//!
//! On `wasm32`, [`WebPage`] implements [`Page`](roller_backend::Page) over
//! `web-sys`, and [`GuideDriver`] feeds the DOM events it captures into a
//! [`Guide`](roller::Guide), one transition at a time. The id registry and
//! the event queue they share are plain Rust and build on every target.
//!
//! # Example
//!
//! ```ignore
//! let page = Rc::new(WebPage::new()?);
//! let step = Step::new(Focus::new("#signup"))
//!     .with_popover(Popover::new(&*page, PopoverOptions::new("Sign up here"))?);
//! let guide = Guide::new(&*page, vec![step], GuideOptions::default())?;
//! let driver = GuideDriver::new(Rc::clone(&page), guide);
//! driver.start();
//! ```

mod error;
pub mod queue;
pub mod registry;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::WebError;
pub use queue::{EventQueue, MAX_PENDING_EVENTS};
pub use registry::{NODE_ID_ATTRIBUTE, Registry, Resolved};
#[cfg(target_arch = "wasm32")]
pub use wasm::{GuideDriver, WebPage};
