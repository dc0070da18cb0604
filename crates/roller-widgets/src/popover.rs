#![forbid(unsafe_code)]

//! Explanatory box anchored to the highlighted element.
//!
//! # Invariants
//!
//! 1. While shown, the popover holds exactly one window resize
//!    subscription, and every resize event recomputes its position from the
//!    anchor's current rectangle.
//! 2. Closing drops the subscription before the fade starts.
//!
//! # Example
//!
//! ```ignore
//! let mut popover = Popover::new(&page, PopoverOptions::new("Search").description("Find anything."))?;
//! popover.show(&page, node).await;
//! ```

use roller_backend::{EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent};
use roller_core::css::{StyleMap, px};
use roller_core::placement::{Placed, PlacementRequest, Position};

use crate::controller::Controller;
use crate::defaults::{
    POPOVER_CLASS, POPOVER_OFFSET, popover_description_style, popover_style, popover_title_style,
};
use crate::error::Result;
use crate::fade::{fade_out, inline_opacity};

/// Per-part style overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopoverStyles {
    pub popover: StyleMap,
    pub title: StyleMap,
    pub description: StyleMap,
}

/// Popover configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PopoverOptions {
    pub position: Position,
    /// Gap to the anchor, in px.
    pub offset: f64,
    pub title: String,
    pub description: Option<String>,
    pub styles: PopoverStyles,
    pub isolate_click_events: bool,
}

impl PopoverOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            position: Position::Auto,
            offset: POPOVER_OFFSET,
            title: title.into(),
            description: None,
            styles: PopoverStyles::default(),
            isolate_click_events: false,
        }
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn styles(mut self, styles: PopoverStyles) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn isolate_click_events(mut self, isolate: bool) -> Self {
        self.isolate_click_events = isolate;
        self
    }
}

/// A titled box placed next to its anchor.
#[derive(Debug)]
pub struct Popover {
    node: NodeId,
    position: Position,
    offset: f64,
    transition: Option<String>,
    anchor: Option<NodeId>,
    on_resize: Option<ListenerId>,
}

impl Popover {
    /// Build the (unmounted) `aside` with its title and description.
    pub fn new<P: Page>(page: &P, options: PopoverOptions) -> Result<Self> {
        let styles = &options.styles;
        let style = popover_style().merged(&styles.popover);
        let node = page.create_styled("aside", Some(POPOVER_CLASS), &style)?;

        let title = page.create_styled("h4", None, &popover_title_style().merged(&styles.title))?;
        page.append_text(title, &options.title);
        page.append_child(node, title);

        if let Some(text) = options.description.as_deref().filter(|t| !t.is_empty()) {
            let description = page.create_styled(
                "p",
                None,
                &popover_description_style().merged(&styles.description),
            )?;
            page.append_text(description, text);
            page.append_child(node, description);
        }

        if options.isolate_click_events {
            page.set_click_isolation(node, true);
        }

        Ok(Self {
            node,
            position: options.position,
            offset: options.offset,
            transition: style.get("transition").map(|t| t.to_css()),
            anchor: None,
            on_resize: None,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The node the popover is currently anchored to.
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    pub fn is_shown<P: Page>(&self, page: &P) -> bool {
        page.is_mounted(self.node)
    }

    /// Mount next to `anchor`, follow window resizes, and fade in.
    pub async fn show<P: Page>(&mut self, page: &P, anchor: NodeId) {
        tracing::debug!(node = self.node.raw(), anchor = anchor.raw(), "popover.show");
        page.mount(self.node);
        self.anchor = Some(anchor);
        if let Some(previous) = self.on_resize.take() {
            page.unlisten(previous);
        }
        self.on_resize = Some(page.listen(EventTarget::Window, EventKind::Resize));
        self.reposition(page);
        page.next_frame().await;
        page.set_style_property(self.node, "opacity", "1");
    }

    /// Recompute placement against the anchor's current rectangle.
    pub fn reposition<P: Page>(&self, page: &P) -> Option<Placed> {
        let anchor = self.anchor?;
        let request = PlacementRequest::new(
            page.bounding_rect(anchor),
            page.bounding_rect(self.node).size(),
        )
        .position(self.position)
        .offset(self.offset)
        .bounds(page.document_rect().size())
        .scroll(page.viewport().scroll)
        .target_fixed(page.computed_style(anchor, "position") == "fixed");
        let placed = request.place();
        tracing::trace!(side = %placed.side, top = placed.top, left = placed.left, "popover placed");

        page.remove_style_property(self.node, "bottom");
        page.remove_style_property(self.node, "right");
        page.set_style_property(self.node, "top", &px(placed.top));
        page.set_style_property(self.node, "left", &px(placed.left));
        Some(placed)
    }

    /// Handle a window resize. Returns whether the event was consumed.
    pub fn handle_event<P: Page>(&self, page: &P, event: &PageEvent) -> bool {
        if self.on_resize != Some(event.listener) {
            return false;
        }
        self.reposition(page);
        true
    }

    /// Put the controller's footer at the end of the popover.
    pub fn attach_controller<P: Page>(&self, page: &P, controller: &Controller) {
        page.append_child(self.node, controller.node());
    }

    /// Stop following resizes, fade out, and unmount.
    pub async fn close<P: Page>(&mut self, page: &P) {
        if let Some(listener) = self.on_resize.take() {
            page.unlisten(listener);
        }
        self.anchor = None;
        if !page.is_mounted(self.node) {
            return;
        }
        tracing::debug!(node = self.node.raw(), "popover.close");
        fade_out(page, self.node, inline_opacity(page, self.node, 1.0)).await;
        page.unmount(self.node);
        // The next show fades in again with the configured transition.
        if let Some(transition) = &self.transition {
            page.set_style_property(self.node, "transition", transition);
        }
    }
}
