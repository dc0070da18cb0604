#![forbid(unsafe_code)]

//! Owned timer handle.
//!
//! [`Page::sleep`](crate::Page::sleep) borrows the page, which a boxed
//! `'static` hook cannot hold on to. A [`Wait`] is what a page hands out
//! instead: a cloneable handle onto the same timer.

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::time::Duration;
use std::rc::Rc;

type SleepFn = dyn Fn(Duration) -> Pin<Box<dyn Future<Output = ()>>>;

/// Cloneable handle onto a page's timer, see [`Page::waiter`](crate::Page::waiter).
#[derive(Clone)]
pub struct Wait {
    sleep: Rc<SleepFn>,
}

impl fmt::Debug for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wait").finish_non_exhaustive()
    }
}

impl Wait {
    /// Wrap a sleep function.
    pub fn new<F, Fut>(sleep: F) -> Self
    where
        F: Fn(Duration) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        Self {
            sleep: Rc::new(move |duration| Box::pin(sleep(duration))),
        }
    }

    /// Resolve after `duration` of page time.
    pub fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + 'static {
        (self.sleep)(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_the_sleep_function() {
        let slept = Rc::new(Cell::new(Duration::ZERO));
        let total = Rc::clone(&slept);
        let wait = Wait::new(move |d| {
            total.set(total.get() + d);
            core::future::ready(())
        });
        let other = wait.clone();
        drop(wait.sleep(Duration::from_millis(5)));
        drop(other.sleep(Duration::from_millis(7)));
        assert_eq!(slept.get(), Duration::from_millis(12));
    }
}
