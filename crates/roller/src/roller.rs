#![forbid(unsafe_code)]

//! Show and hide one tour step.
//!
//! # Invariants
//!
//! 1. [`Roller::unhighlight`] is the exact inverse of [`Roller::highlight`]
//!    and always runs every part, skipping only the ones a step lacks.
//! 2. At most one overlay click subscription is held at a time.
//! 3. Every close is awaited, so when `unhighlight` resolves nothing of the
//!    step is left on the page. [`Roller::hand_off`] differs only in leaving
//!    the overlay up for the step that follows.
//! 4. An overlay that is already on the page is not shown again.
//! 5. Every hook is handed the page's [`Wait`](roller_backend::Wait).

use std::rc::Rc;

use roller_backend::{EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent, ScrollBehavior};
use roller_core::scroll::centered_scroll_target;
use roller_widgets::Overlay;

use crate::Result;
use crate::step::Step;

/// What a click on the overlay does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayClickPolicy {
    /// Unhighlight the step when the click landed on the overlay itself.
    /// Clicks on the highlighted element, which sits above the overlay,
    /// do not count.
    #[default]
    UnhighlightOnBackdrop,
    /// Overlay clicks do nothing.
    Ignore,
}

/// Roller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RollerOptions {
    pub overlay_click: OverlayClickPolicy,
}

impl RollerOptions {
    #[must_use]
    pub fn overlay_click(mut self, policy: OverlayClickPolicy) -> Self {
        self.overlay_click = policy;
        self
    }
}

#[derive(Debug, Clone)]
struct OverlayClick {
    listener: ListenerId,
    overlay: Rc<Overlay>,
}

/// Runs the visual lifecycle of a [`Step`].
#[derive(Debug, Default)]
pub struct Roller {
    options: RollerOptions,
    overlay_click: Option<OverlayClick>,
}

impl Roller {
    pub fn new(options: RollerOptions) -> Self {
        Self {
            options,
            overlay_click: None,
        }
    }

    pub fn options(&self) -> RollerOptions {
        self.options
    }

    /// Insert hook, overlay, focus, scroll, popover.
    ///
    /// # Errors
    ///
    /// Fails when the focus target cannot be resolved. The overlay may
    /// already be shown at that point; [`Roller::unhighlight`] removes it.
    pub async fn highlight<P: Page>(&mut self, page: &P, step: &mut Step) -> Result<NodeId> {
        tracing::debug!(focus = %step.focus.target(), "roller.highlight");
        if let Some(hook) = step.before_insert.as_mut() {
            hook(page.waiter()).await;
        }

        if let Some(overlay) = step.overlay.as_ref() {
            if !overlay.is_shown(page) {
                overlay.show(page).await;
            }
            self.stop_overlay_clicks(page);
            if self.options.overlay_click != OverlayClickPolicy::Ignore {
                self.overlay_click = Some(OverlayClick {
                    listener: page.listen(EventTarget::Node(overlay.node()), EventKind::Click),
                    overlay: Rc::clone(overlay),
                });
            }
        }

        let node = step.focus.highlight(page).await?;

        let companion = step.popover.as_ref().map(|p| page.bounding_rect(p.node()));
        let offset = centered_scroll_target(page.bounding_rect(node), companion, page.viewport());
        page.scroll_to(offset, ScrollBehavior::Smooth);

        if let Some(popover) = step.popover.as_mut() {
            popover.show(page, node).await;
        }
        Ok(node)
    }

    /// Overlay, focus, popover, remove hook.
    pub async fn unhighlight<P: Page>(&mut self, page: &P, step: &mut Step) {
        tracing::debug!(focus = %step.focus.target(), "roller.unhighlight");
        self.release(page, step, true).await;
    }

    /// Unhighlight `step` but leave its overlay on the page, for a next step
    /// that shows the same overlay.
    pub async fn hand_off<P: Page>(&mut self, page: &P, step: &mut Step) {
        tracing::debug!(focus = %step.focus.target(), "roller.hand_off");
        self.release(page, step, false).await;
    }

    async fn release<P: Page>(&mut self, page: &P, step: &mut Step, close_overlay: bool) {
        self.stop_overlay_clicks(page);
        if close_overlay && let Some(overlay) = step.overlay.as_ref() {
            overlay.close(page).await;
        }
        step.focus.cancel(page).await;
        if let Some(popover) = step.popover.as_mut() {
            popover.close(page).await;
        }
        if let Some(hook) = step.after_remove.as_mut() {
            hook(page.waiter()).await;
        }
    }

    /// Apply the overlay click policy. Returns `true` when the step was
    /// unhighlighted.
    pub async fn handle_event<P: Page>(
        &mut self,
        page: &P,
        step: &mut Step,
        event: &PageEvent,
    ) -> bool {
        let Some(click) = self.overlay_click.as_ref() else {
            return false;
        };
        if click.listener != event.listener {
            return false;
        }
        let on_backdrop = event.origin == Some(click.overlay.node());
        tracing::debug!(on_backdrop, policy = ?self.options.overlay_click, "overlay click");
        match self.options.overlay_click {
            OverlayClickPolicy::UnhighlightOnBackdrop if on_backdrop => {
                self.unhighlight(page, step).await;
                true
            }
            _ => false,
        }
    }

    fn stop_overlay_clicks<P: Page>(&mut self, page: &P) {
        if let Some(click) = self.overlay_click.take() {
            page.unlisten(click.listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use roller_backend::TargetError;
    use roller_core::geometry::Rect;
    use roller_harness::{MemoryPage, block_on};
    use roller_widgets::{
        Focus, OverlayOptions, Popover, PopoverOptions, WidgetError, defaults::HIGHLIGHT_CLASS,
        step_hook,
    };
    use std::cell::RefCell;
    use std::time::Duration;

    fn page_with_target() -> (MemoryPage, NodeId) {
        let page = MemoryPage::default();
        let target = page.insert(page.body(), "button");
        page.set_id(target, "target");
        page.set_layout(target, Rect::from_origin_size(400.0, 1500.0, 100.0, 40.0));
        (page, target)
    }

    fn full_step(page: &MemoryPage, log: &Rc<RefCell<Vec<&'static str>>>) -> Step {
        let overlay = Rc::new(Overlay::new(page, OverlayOptions::default()).unwrap());
        let popover = Popover::new(page, PopoverOptions::new("Target")).unwrap();
        let (before, after) = (Rc::clone(log), Rc::clone(log));
        Step::new(Focus::new("#target"))
            .with_overlay(overlay)
            .with_popover(popover)
            .before_insert(step_hook(move |_| {
                let log = Rc::clone(&before);
                async move { log.borrow_mut().push("before_insert") }
            }))
            .after_remove(step_hook(move |_| {
                let log = Rc::clone(&after);
                async move { log.borrow_mut().push("after_remove") }
            }))
    }

    #[test]
    fn highlight_shows_every_part() {
        let (page, target) = page_with_target();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut step = full_step(&page, &log);
        let mut roller = Roller::default();

        let node = block_on(roller.highlight(&page, &mut step)).unwrap();
        assert_eq!(node, target);
        assert!(step.overlay().unwrap().is_shown(&page));
        assert!(page.has_class(target, HIGHLIGHT_CLASS));
        assert!(step.popover().unwrap().is_shown(&page));
        assert_eq!(step.popover().unwrap().anchor(), Some(target));
        assert_eq!(*log.borrow(), vec!["before_insert"]);
        assert_eq!(page.scroll_log().len(), 1);
    }

    #[test]
    fn unhighlight_is_the_inverse() {
        let (page, target) = page_with_target();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut step = full_step(&page, &log);
        let mut roller = Roller::default();

        block_on(roller.highlight(&page, &mut step)).unwrap();
        block_on(roller.unhighlight(&page, &mut step));

        assert!(!step.overlay().unwrap().is_shown(&page));
        assert!(!page.has_class(target, HIGHLIGHT_CLASS));
        assert_eq!(page.attribute(target, "style"), None);
        assert!(!step.popover().unwrap().is_shown(&page));
        assert_eq!(page.listener_count(), 0);
        assert_eq!(*log.borrow(), vec!["before_insert", "after_remove"]);
    }

    #[test]
    fn bare_step_needs_only_a_focus() {
        let (page, target) = page_with_target();
        let mut step = Step::new(Focus::new(target));
        let mut roller = Roller::default();
        block_on(roller.highlight(&page, &mut step)).unwrap();
        assert!(page.has_class(target, HIGHLIGHT_CLASS));
        block_on(roller.unhighlight(&page, &mut step));
        assert!(!page.has_class(target, HIGHLIGHT_CLASS));
    }

    #[test]
    fn missing_target_propagates() {
        let page = MemoryPage::default();
        let mut step = Step::new(Focus::new("#gone"));
        let mut roller = Roller::default();
        let err = block_on(roller.highlight(&page, &mut step)).unwrap_err();
        assert_eq!(
            err,
            Error::Widget(WidgetError::Target(TargetError::NotFound {
                selector: "#gone".to_owned()
            }))
        );
    }

    #[test]
    fn backdrop_click_unhighlights() {
        let (page, target) = page_with_target();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut step = full_step(&page, &log);
        let mut roller = Roller::default();
        block_on(roller.highlight(&page, &mut step)).unwrap();

        let overlay = step.overlay().unwrap().node();
        let events = page.click(overlay);
        assert_eq!(events.len(), 1);
        assert!(block_on(roller.handle_event(&page, &mut step, &events[0])));
        assert!(!page.has_class(target, HIGHLIGHT_CLASS));
        assert!(!page.is_mounted(overlay));
    }

    #[test]
    fn click_inside_overlay_subtree_is_not_backdrop() {
        let (page, target) = page_with_target();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut step = full_step(&page, &log);
        let mut roller = Roller::default();
        block_on(roller.highlight(&page, &mut step)).unwrap();

        let overlay = step.overlay().unwrap().node();
        let decoration = page.insert(overlay, "span");
        let events = page.click(decoration);
        assert_eq!(events.len(), 1);
        assert!(!block_on(roller.handle_event(&page, &mut step, &events[0])));
        assert!(page.has_class(target, HIGHLIGHT_CLASS));
    }

    #[test]
    fn ignore_policy_never_subscribes() {
        let (page, target) = page_with_target();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut step = full_step(&page, &log);
        let mut roller = Roller::new(RollerOptions::default().overlay_click(OverlayClickPolicy::Ignore));
        block_on(roller.highlight(&page, &mut step)).unwrap();
        let events = page.click(step.overlay().unwrap().node());
        assert!(events.is_empty());
        assert!(page.has_class(target, HIGHLIGHT_CLASS));
    }

    #[test]
    fn before_insert_wait_runs_ahead_of_the_overlay() {
        let (page, _) = page_with_target();
        let overlay = Rc::new(Overlay::new(&page, OverlayOptions::default()).unwrap());
        let seen = Rc::new(RefCell::new(None));
        let (sink, view, watched) = (Rc::clone(&seen), page.clone(), overlay.node());
        let mut step = Step::new(Focus::new("#target"))
            .with_overlay(Rc::clone(&overlay))
            .before_insert(step_hook(move |wait| {
                let (sink, view) = (Rc::clone(&sink), view.clone());
                async move {
                    let start = view.now();
                    wait.sleep(Duration::from_secs(1)).await;
                    *sink.borrow_mut() = Some((view.now() - start, view.is_mounted(watched)));
                }
            }));
        let mut roller = Roller::default();

        block_on(roller.highlight(&page, &mut step)).unwrap();
        assert_eq!(*seen.borrow(), Some((Duration::from_secs(1), false)));
        assert!(overlay.is_shown(&page));
        assert!(page.now() > Duration::from_secs(1));
    }

    #[test]
    fn after_remove_can_wait_on_page_time() {
        let (page, _) = page_with_target();
        let mut step = Step::new(Focus::new("#target")).after_remove(step_hook(|wait| async move {
            wait.sleep(Duration::from_millis(400)).await;
        }));
        let mut roller = Roller::default();
        block_on(roller.highlight(&page, &mut step)).unwrap();
        let before = page.now();
        block_on(roller.unhighlight(&page, &mut step));
        assert!(page.now() - before >= Duration::from_millis(400));
    }

    #[test]
    fn hand_off_leaves_the_overlay_up() {
        let (page, target) = page_with_target();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut step = full_step(&page, &log);
        let mut roller = Roller::default();
        block_on(roller.highlight(&page, &mut step)).unwrap();

        block_on(roller.hand_off(&page, &mut step));
        let overlay = Rc::clone(step.overlay().unwrap());
        assert!(overlay.is_shown(&page));
        assert_eq!(
            page.style_property(overlay.node(), "opacity").as_deref(),
            Some(overlay.visible_opacity())
        );
        assert!(!page.has_class(target, HIGHLIGHT_CLASS));
        assert!(!step.popover().unwrap().is_shown(&page));
        assert_eq!(page.listener_count(), 0);
        assert_eq!(*log.borrow(), vec!["before_insert", "after_remove"]);

        block_on(roller.highlight(&page, &mut step)).unwrap();
        assert!(overlay.is_shown(&page));
        assert_eq!(page.click(overlay.node()).len(), 1);
    }
}
