#![forbid(unsafe_code)]

//! Full-viewport dimming layer.
//!
//! An [`Overlay`] holds no mutable state beyond its node on the page, so a
//! single instance can be shared between tour steps through an `Rc`.
//! Whether it is visible is simply whether the node is mounted.

use roller_backend::{NodeId, Page};
use roller_core::css::StyleMap;
use roller_core::easing::format_opacity;

use crate::defaults::{OVERLAY_CLASS, OVERLAY_TRANSITION, OVERLAY_VISIBLE_OPACITY, overlay_style};
use crate::error::Result;
use crate::fade::{fade_out, inline_opacity};

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    /// Layered over the default overlay style.
    pub initial_styles: StyleMap,
    /// Opacity once shown.
    pub opacity: f64,
    /// Stop clicks on the overlay from reaching the page below.
    pub isolate_click_events: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            initial_styles: StyleMap::new(),
            opacity: OVERLAY_VISIBLE_OPACITY,
            isolate_click_events: false,
        }
    }
}

impl OverlayOptions {
    #[must_use]
    pub fn initial_styles(mut self, styles: StyleMap) -> Self {
        self.initial_styles = styles;
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn isolate_click_events(mut self, isolate: bool) -> Self {
        self.isolate_click_events = isolate;
        self
    }
}

/// The dimming layer.
#[derive(Debug)]
pub struct Overlay {
    node: NodeId,
    opacity: String,
}

impl Overlay {
    /// Build the (unmounted) overlay node.
    pub fn new<P: Page>(page: &P, options: OverlayOptions) -> Result<Self> {
        let style = overlay_style().merged(&options.initial_styles);
        let node = page.create_styled("div", Some(OVERLAY_CLASS), &style)?;
        if options.isolate_click_events {
            page.set_click_isolation(node, true);
        }
        Ok(Self {
            node,
            opacity: format_opacity(options.opacity),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Opacity the overlay fades in to.
    pub fn visible_opacity(&self) -> &str {
        &self.opacity
    }

    pub fn is_shown<P: Page>(&self, page: &P) -> bool {
        page.is_mounted(self.node)
    }

    /// Mount the overlay and raise its opacity on the next frame.
    pub async fn show<P: Page>(&self, page: &P) {
        tracing::debug!(node = self.node.raw(), "overlay.show");
        page.set_style_property(self.node, "transition", OVERLAY_TRANSITION);
        page.mount(self.node);
        page.next_frame().await;
        page.set_style_property(self.node, "opacity", &self.opacity);
    }

    /// Fade out and unmount. Resolves once the node is gone.
    pub async fn close<P: Page>(&self, page: &P) {
        if !page.is_mounted(self.node) {
            return;
        }
        tracing::debug!(node = self.node.raw(), "overlay.close");
        fade_out(page, self.node, inline_opacity(page, self.node, 0.0)).await;
        page.unmount(self.node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roller_backend::{EventKind, EventTarget};
    use roller_harness::{MemoryPage, block_on};

    #[test]
    fn created_unmounted_and_invisible() {
        let page = MemoryPage::default();
        let overlay = Overlay::new(&page, OverlayOptions::default()).unwrap();
        assert!(!overlay.is_shown(&page));
        assert!(page.has_class(overlay.node(), OVERLAY_CLASS));
        assert_eq!(page.style_property(overlay.node(), "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn show_raises_opacity_after_a_frame() {
        let page = MemoryPage::default();
        let overlay = Overlay::new(&page, OverlayOptions::default()).unwrap();
        block_on(overlay.show(&page));
        assert!(overlay.is_shown(&page));
        assert_eq!(page.frames_elapsed(), 1);
        assert_eq!(
            page.style_property(overlay.node(), "opacity").as_deref(),
            Some("0.75")
        );
        assert_eq!(
            page.style_property(overlay.node(), "transition").as_deref(),
            Some(OVERLAY_TRANSITION)
        );
    }

    #[test]
    fn custom_opacity_and_styles() {
        let page = MemoryPage::default();
        let options = OverlayOptions::default()
            .opacity(0.5)
            .initial_styles(StyleMap::new().with("background-color", "#123456"));
        let overlay = Overlay::new(&page, options).unwrap();
        assert_eq!(
            page.style_property(overlay.node(), "background-color").as_deref(),
            Some("#123456")
        );
        block_on(overlay.show(&page));
        assert_eq!(
            page.style_property(overlay.node(), "opacity").as_deref(),
            Some("0.5")
        );
    }

    #[test]
    fn show_then_close_leaves_nothing_mounted() {
        let page = MemoryPage::default();
        let overlay = Overlay::new(&page, OverlayOptions::default()).unwrap();
        block_on(overlay.show(&page));
        block_on(overlay.close(&page));
        assert!(!overlay.is_shown(&page));
        assert_eq!(page.style_property(overlay.node(), "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn reshow_after_close() {
        let page = MemoryPage::default();
        let overlay = Overlay::new(&page, OverlayOptions::default()).unwrap();
        block_on(overlay.show(&page));
        block_on(overlay.close(&page));
        block_on(overlay.show(&page));
        assert!(overlay.is_shown(&page));
        assert_eq!(
            page.style_property(overlay.node(), "transition").as_deref(),
            Some(OVERLAY_TRANSITION)
        );
        assert_eq!(
            page.style_property(overlay.node(), "opacity").as_deref(),
            Some("0.75")
        );
    }

    #[test]
    fn close_when_hidden_is_noop() {
        let page = MemoryPage::default();
        let overlay = Overlay::new(&page, OverlayOptions::default()).unwrap();
        block_on(overlay.close(&page));
        assert_eq!(page.frames_elapsed(), 0);
    }

    #[test]
    fn isolation_stops_bubbling() {
        let page = MemoryPage::default();
        let overlay =
            Overlay::new(&page, OverlayOptions::default().isolate_click_events(true)).unwrap();
        block_on(overlay.show(&page));
        page.listen(EventTarget::Node(page.body()), EventKind::Click);
        let own = page.listen(EventTarget::Node(overlay.node()), EventKind::Click);
        let events = page.click(overlay.node());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].listener, own);
    }
}
