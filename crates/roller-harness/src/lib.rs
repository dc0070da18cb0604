#![forbid(unsafe_code)]

//! Test harness and reference fixtures for Roller.
//!
//! [`MemoryPage`] is a deterministic [`Page`](roller_backend::Page): a small
//! element tree with attributes, classes, inline and "stylesheet" styles,
//! layout rectangles in document coordinates, and a virtual clock. Every
//! future it returns is already complete, so widget operations can be driven
//! with [`block_on`] without a runtime.
//!
//! Events are simulated rather than captured: [`MemoryPage::click`] walks the
//! bubbling path (stopping at isolated nodes) and returns the [`PageEvent`]s
//! the registered listeners would receive, which the test then feeds to the
//! widget under test.
//!
//! [`PageEvent`]: roller_backend::PageEvent

mod logging;
mod memory_page;

pub use logging::init_test_logging;
pub use memory_page::{FRAME_INTERVAL, MemoryPage};
pub use pollster::block_on;
