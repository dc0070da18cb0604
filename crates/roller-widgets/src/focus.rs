#![forbid(unsafe_code)]

//! Visual emphasis of the highlighted element.
//!
//! # Invariants
//!
//! 1. At most one node is emphasized at a time, and its pre-highlight
//!    `style` attribute is remembered exactly (including "absent").
//! 2. A repeated [`Focus::highlight`] on the same node keeps the first
//!    snapshot, so [`Focus::cancel`] always restores the pre-tour style.
//! 3. `position` is only overridden when the computed value was `static`
//!    or `initial`.
//!
//! # Example
//!
//! ```ignore
//! let mut focus = Focus::new("#search");
//! focus.highlight(&page).await?;
//! focus.cancel(&page).await;
//! ```

use std::fmt;

use roller_backend::{NodeId, Page, ScrollBehavior, Target};
use roller_core::easing::parse_opacity;
use roller_core::scroll::centered_scroll_target;

use crate::defaults::{
    ELEMENT_BACKGROUND_COLOR, ELEMENT_POSITION, ELEMENT_TRANSITION, ELEMENT_Z_INDEX,
    HIGHLIGHT_CLASS,
};
use crate::error::Result;
use crate::fade::fade_out;
use crate::hook::NodeHook;

const TRANSPARENT: &str = "rgba(0, 0, 0, 0)";

/// Focus configuration.
pub struct FocusOptions {
    /// Awaited before the node is touched.
    pub before_highlight: Option<NodeHook>,
    /// Awaited after the emphasis is applied.
    pub after_highlight: Option<NodeHook>,
    /// Scroll the node toward the viewport center before highlighting.
    pub scroll_into_view: bool,
    /// Background used when no ancestor has an opaque one.
    pub fallback_background: String,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            before_highlight: None,
            after_highlight: None,
            scroll_into_view: false,
            fallback_background: ELEMENT_BACKGROUND_COLOR.to_owned(),
        }
    }
}

impl fmt::Debug for FocusOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusOptions")
            .field("before_highlight", &self.before_highlight.is_some())
            .field("after_highlight", &self.after_highlight.is_some())
            .field("scroll_into_view", &self.scroll_into_view)
            .field("fallback_background", &self.fallback_background)
            .finish()
    }
}

impl FocusOptions {
    #[must_use]
    pub fn before_highlight(mut self, hook: NodeHook) -> Self {
        self.before_highlight = Some(hook);
        self
    }

    #[must_use]
    pub fn after_highlight(mut self, hook: NodeHook) -> Self {
        self.after_highlight = Some(hook);
        self
    }

    #[must_use]
    pub fn scroll_into_view(mut self, scroll: bool) -> Self {
        self.scroll_into_view = scroll;
        self
    }

    #[must_use]
    pub fn fallback_background(mut self, color: impl Into<String>) -> Self {
        self.fallback_background = color.into();
        self
    }
}

/// What the node looked like before it was emphasized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub node: NodeId,
    /// The raw `style` attribute, `None` when the node had none.
    pub style_attribute: Option<String>,
    /// Computed `position`.
    pub position: String,
    /// Computed `background-color`.
    pub background_color: String,
    /// Computed `opacity`.
    pub opacity: String,
}

impl FocusSnapshot {
    fn capture<P: Page>(page: &P, node: NodeId) -> Self {
        Self {
            node,
            style_attribute: page.attribute(node, "style"),
            position: page.computed_style(node, "position"),
            background_color: page.computed_style(node, "background-color"),
            opacity: page.computed_style(node, "opacity"),
        }
    }

    fn restore<P: Page>(&self, page: &P) {
        match &self.style_attribute {
            Some(style) => page.set_attribute(self.node, "style", style),
            None => page.remove_attribute(self.node, "style"),
        }
        page.remove_class(self.node, HIGHLIGHT_CLASS);
    }
}

/// Emphasizes one element above the overlay.
#[derive(Debug)]
pub struct Focus {
    target: Target,
    options: FocusOptions,
    snapshot: Option<FocusSnapshot>,
}

impl Focus {
    pub fn new(target: impl Into<Target>) -> Self {
        Self::with_options(target, FocusOptions::default())
    }

    pub fn with_options(target: impl Into<Target>, options: FocusOptions) -> Self {
        Self {
            target: target.into(),
            options,
            snapshot: None,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The emphasized node, if any.
    pub fn node(&self) -> Option<NodeId> {
        self.snapshot.as_ref().map(|s| s.node)
    }

    pub fn snapshot(&self) -> Option<&FocusSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Resolve the target and emphasize it.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Target`](crate::WidgetError::Target) when the
    /// selector matches nothing; the page is left untouched.
    pub async fn highlight<P: Page>(&mut self, page: &P) -> Result<NodeId> {
        let node = self.target.resolve(page).inspect_err(|_| {
            tracing::warn!(selector = %self.target, "no element to highlight");
        })?;
        tracing::debug!(node = node.raw(), "focus.highlight");

        if self.options.scroll_into_view {
            let offset = centered_scroll_target(page.bounding_rect(node), None, page.viewport());
            page.scroll_to(offset, ScrollBehavior::Smooth);
        }

        if let Some(hook) = self.options.before_highlight.as_mut() {
            hook(node, page.waiter()).await;
        }

        match &self.snapshot {
            Some(previous) if previous.node == node => {
                tracing::debug!("already highlighted, keeping first snapshot");
            }
            Some(previous) => {
                // The selector now resolves elsewhere; put the old node back first.
                previous.restore(page);
                self.snapshot = Some(FocusSnapshot::capture(page, node));
            }
            None => self.snapshot = Some(FocusSnapshot::capture(page, node)),
        }

        let background = self.nearest_background(page, node);
        page.set_style_property(node, "transition", ELEMENT_TRANSITION);
        page.set_style_property(node, "z-index", &ELEMENT_Z_INDEX.to_string());
        page.set_style_property(node, "background-color", &background);
        let original_position = self.snapshot.as_ref().map(|s| s.position.as_str());
        if matches!(original_position, Some("static" | "initial" | "")) {
            page.set_style_property(node, "position", ELEMENT_POSITION);
        }
        page.add_class(node, HIGHLIGHT_CLASS);

        if let Some(hook) = self.options.after_highlight.as_mut() {
            hook(node, page.waiter()).await;
        }
        Ok(node)
    }

    /// Fade the emphasis out and restore the node's original style.
    ///
    /// Does nothing when no node is emphasized.
    pub async fn cancel<P: Page>(&mut self, page: &P) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        tracing::debug!(node = snapshot.node.raw(), "focus.cancel");
        let opacity = page.computed_style(snapshot.node, "opacity");
        let from = parse_opacity(Some(opacity.as_str()), 1.0);
        fade_out(page, snapshot.node, from).await;
        snapshot.restore(page);
    }

    fn nearest_background<P: Page>(&self, page: &P, node: NodeId) -> String {
        let mut current = Some(node);
        while let Some(id) = current {
            let color = page.computed_style(id, "background-color");
            if is_opaque(&color) {
                return color;
            }
            current = page.parent(id);
        }
        self.options.fallback_background.clone()
    }
}

fn is_opaque(color: &str) -> bool {
    let color = color.trim();
    !(color.is_empty() || color == TRANSPARENT || color.eq_ignore_ascii_case("transparent"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::node_hook;
    use crate::WidgetError;
    use pretty_assertions::assert_eq;
    use roller_backend::TargetError;
    use roller_core::geometry::Rect;
    use roller_harness::{MemoryPage, block_on};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn page_with_button() -> (MemoryPage, NodeId) {
        let page = MemoryPage::default();
        let button = page.insert(page.body(), "button");
        page.set_id(button, "go");
        (page, button)
    }

    #[test]
    fn round_trip_restores_exact_style_attribute() {
        let (page, button) = page_with_button();
        page.set_attribute(button, "style", "color: red;  margin: 0");
        let mut focus = Focus::new("#go");

        block_on(focus.highlight(&page)).unwrap();
        assert_ne!(
            page.attribute(button, "style").as_deref(),
            Some("color: red;  margin: 0")
        );
        block_on(focus.cancel(&page));

        assert_eq!(
            page.attribute(button, "style").as_deref(),
            Some("color: red;  margin: 0")
        );
        assert!(!page.has_class(button, HIGHLIGHT_CLASS));
    }

    #[test]
    fn round_trip_removes_style_when_none_existed() {
        let (page, button) = page_with_button();
        let mut focus = Focus::new(button);
        block_on(focus.highlight(&page)).unwrap();
        assert!(page.attribute(button, "style").is_some());
        block_on(focus.cancel(&page));
        assert_eq!(page.attribute(button, "style"), None);
    }

    #[test]
    fn applies_emphasis() {
        let (page, button) = page_with_button();
        let mut focus = Focus::new(button);
        block_on(focus.highlight(&page)).unwrap();
        assert!(page.has_class(button, HIGHLIGHT_CLASS));
        assert_eq!(
            page.style_property(button, "z-index").as_deref(),
            Some("10001")
        );
        assert_eq!(
            page.style_property(button, "transition").as_deref(),
            Some(ELEMENT_TRANSITION)
        );
        assert_eq!(
            page.style_property(button, "position").as_deref(),
            Some(ELEMENT_POSITION)
        );
    }

    #[test]
    fn keeps_non_static_position() {
        let (page, button) = page_with_button();
        page.set_stylesheet(button, "position", "absolute");
        let mut focus = Focus::new(button);
        block_on(focus.highlight(&page)).unwrap();
        assert_eq!(page.style_property(button, "position"), None);
    }

    #[test]
    fn background_comes_from_nearest_opaque_ancestor() {
        let page = MemoryPage::default();
        let card = page.insert(page.body(), "section");
        page.set_stylesheet(card, "background-color", "rgb(250, 250, 250)");
        let inner = page.insert(card, "div");
        let button = page.insert(inner, "button");

        let mut focus = Focus::new(button);
        block_on(focus.highlight(&page)).unwrap();
        assert_eq!(
            page.style_property(button, "background-color").as_deref(),
            Some("rgb(250, 250, 250)")
        );
    }

    #[test]
    fn background_falls_back_at_document_root() {
        let (page, button) = page_with_button();
        let mut focus =
            Focus::with_options(button, FocusOptions::default().fallback_background("#fafafa"));
        block_on(focus.highlight(&page)).unwrap();
        assert_eq!(
            page.style_property(button, "background-color").as_deref(),
            Some("#fafafa")
        );
    }

    #[test]
    fn second_highlight_keeps_first_snapshot() {
        let (page, button) = page_with_button();
        let mut focus = Focus::new(button);
        block_on(focus.highlight(&page)).unwrap();
        block_on(focus.highlight(&page)).unwrap();
        block_on(focus.cancel(&page));
        assert_eq!(page.attribute(button, "style"), None);
    }

    #[test]
    fn cancel_without_highlight_is_noop() {
        let (page, button) = page_with_button();
        page.set_attribute(button, "style", "color: red");
        let mut focus = Focus::new(button);
        block_on(focus.cancel(&page));
        assert_eq!(page.attribute(button, "style").as_deref(), Some("color: red"));
        assert_eq!(page.frames_elapsed(), 0);
    }

    #[test]
    fn missing_selector_fails_without_side_effects() {
        let page = MemoryPage::default();
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let options = FocusOptions::default().before_highlight(node_hook(move |_, _| {
            let seen = Rc::clone(&seen);
            async move { *seen.borrow_mut() += 1 }
        }));
        let mut focus = Focus::with_options("#missing", options);
        let err = block_on(focus.highlight(&page)).unwrap_err();
        assert_eq!(
            err,
            WidgetError::Target(TargetError::NotFound {
                selector: "#missing".to_owned()
            })
        );
        assert_eq!(*calls.borrow(), 0);
        assert!(!focus.is_active());
    }

    #[test]
    fn hooks_run_around_emphasis() {
        let (page, button) = page_with_button();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (before, after) = (Rc::clone(&log), Rc::clone(&log));
        let options = FocusOptions::default()
            .before_highlight(node_hook(move |node, _| {
                let log = Rc::clone(&before);
                async move { log.borrow_mut().push(("before", node)) }
            }))
            .after_highlight(node_hook(move |node, _| {
                let log = Rc::clone(&after);
                async move { log.borrow_mut().push(("after", node)) }
            }));
        let mut focus = Focus::with_options(button, options);
        block_on(focus.highlight(&page)).unwrap();
        assert_eq!(*log.borrow(), vec![("before", button), ("after", button)]);
    }

    #[test]
    fn before_highlight_can_pause_ahead_of_emphasis() {
        let (page, button) = page_with_button();
        let seen = Rc::new(RefCell::new(None));
        let (sink, view) = (Rc::clone(&seen), page.clone());
        let options = FocusOptions::default().before_highlight(node_hook(move |node, wait| {
            let (sink, view) = (Rc::clone(&sink), view.clone());
            async move {
                wait.sleep(Duration::from_millis(150)).await;
                *sink.borrow_mut() = Some((view.now(), view.has_class(node, HIGHLIGHT_CLASS)));
            }
        }));
        let mut focus = Focus::with_options(button, options);
        block_on(focus.highlight(&page)).unwrap();
        assert_eq!(*seen.borrow(), Some((Duration::from_millis(150), false)));
        assert!(page.has_class(button, HIGHLIGHT_CLASS));
    }

    #[test]
    fn optional_scroll_into_view() {
        let (page, button) = page_with_button();
        page.set_layout(button, Rect::from_origin_size(0.0, 3000.0, 100.0, 40.0));
        let mut focus =
            Focus::with_options(button, FocusOptions::default().scroll_into_view(true));
        block_on(focus.highlight(&page)).unwrap();
        let log = page.scroll_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1, ScrollBehavior::Smooth);
        assert!(log[0].0.y > 0.0);
    }
}
