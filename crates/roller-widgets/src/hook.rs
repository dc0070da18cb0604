#![forbid(unsafe_code)]

//! Async lifecycle hooks.
//!
//! Hooks run on the page's single thread and are awaited in sequence, so
//! their futures need neither `Send` nor a borrowed lifetime. Each hook is
//! handed a [`Wait`] onto the page timer so it can pause the lifecycle
//! (`wait.sleep(..).await`) without holding the page.

use std::future::Future;
use std::pin::Pin;

use roller_backend::{NodeId, PageEvent, Wait};

/// A boxed, single-threaded future.
pub type LocalFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Hook run around a tour step (`before_insert`, `after_remove`).
pub type StepHook = Box<dyn FnMut(Wait) -> LocalFuture<'static>>;

/// Hook that receives the highlighted node (`before_highlight`, `after_highlight`).
pub type NodeHook = Box<dyn FnMut(NodeId, Wait) -> LocalFuture<'static>>;

/// Hook that receives the event which fired it (`on_hover`).
pub type EventHook = Box<dyn FnMut(PageEvent, Wait) -> LocalFuture<'static>>;

/// Plain synchronous callback (`on_ok`, `on_close`, `on_done`, `on_skip`).
pub type Callback = Box<dyn FnMut()>;

/// Box an async closure as a [`StepHook`].
pub fn step_hook<F, Fut>(mut f: F) -> StepHook
where
    F: FnMut(Wait) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    Box::new(move |wait| Box::pin(f(wait)))
}

/// Box an async closure as a [`NodeHook`].
pub fn node_hook<F, Fut>(mut f: F) -> NodeHook
where
    F: FnMut(NodeId, Wait) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    Box::new(move |node, wait| Box::pin(f(node, wait)))
}

/// Box an async closure as an [`EventHook`].
pub fn event_hook<F, Fut>(mut f: F) -> EventHook
where
    F: FnMut(PageEvent, Wait) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    Box::new(move |event, wait| Box::pin(f(event, wait)))
}

/// Box a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: FnMut() + 'static,
{
    Box::new(f)
}
