#![forbid(unsafe_code)]

//! Hint box shown while the pointer is over an element.

use std::fmt;

use roller_backend::{EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent, Target};
use roller_core::css::{StyleMap, px};
use roller_core::easing::format_opacity;
use roller_core::placement::{PlacementRequest, Position};

use crate::defaults::{HOVER_OFFSET, HOVER_OPACITY, hover_style};
use crate::error::Result;
use crate::hook::EventHook;

/// Hover configuration.
pub struct HoverOptions {
    pub content: String,
    pub position: Position,
    /// Gap to the element, in px.
    pub offset: f64,
    /// Layered over the default hover style.
    pub styles: StyleMap,
    /// Awaited after the box is shown, with the enter event.
    pub on_hover: Option<EventHook>,
}

impl fmt::Debug for HoverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverOptions")
            .field("content", &self.content)
            .field("position", &self.position)
            .field("offset", &self.offset)
            .field("styles", &self.styles)
            .field("on_hover", &self.on_hover.is_some())
            .finish()
    }
}

impl HoverOptions {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            position: Position::Auto,
            offset: HOVER_OFFSET,
            styles: StyleMap::new(),
            on_hover: None,
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
    pub fn styles(mut self, styles: StyleMap) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn on_hover(mut self, hook: EventHook) -> Self {
        self.on_hover = Some(hook);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Attachment {
    to: NodeId,
    enter: ListenerId,
    leave: ListenerId,
}

/// A box that follows pointer enter/leave on one element.
pub struct Hover {
    node: NodeId,
    position: Position,
    offset: f64,
    on_hover: Option<EventHook>,
    attachment: Option<Attachment>,
}

impl fmt::Debug for Hover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hover")
            .field("node", &self.node)
            .field("position", &self.position)
            .field("attachment", &self.attachment)
            .finish_non_exhaustive()
    }
}

impl Hover {
    pub fn new<P: Page>(page: &P, options: HoverOptions) -> Result<Self> {
        let node = page.create_styled("aside", None, &hover_style().merged(&options.styles))?;
        page.append_text(node, &options.content);
        Ok(Self {
            node,
            position: options.position,
            offset: options.offset,
            on_hover: options.on_hover,
            attachment: None,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The element the hover is attached to.
    pub fn attached_to(&self) -> Option<NodeId> {
        self.attachment.map(|a| a.to)
    }

    /// Start following pointer enter/leave on `target`.
    ///
    /// Re-attaching moves the subscriptions to the new element.
    ///
    /// # Errors
    ///
    /// Fails when a selector target matches nothing.
    pub fn attach_to<P: Page>(&mut self, page: &P, target: impl Into<Target>) -> Result<NodeId> {
        let target = target.into();
        let to = target.resolve(page).inspect_err(|_| {
            tracing::warn!(selector = %target, "no element to attach hover to");
        })?;
        self.drop_listeners(page);
        self.attachment = Some(Attachment {
            to,
            enter: page.listen(EventTarget::Node(to), EventKind::MouseEnter),
            leave: page.listen(EventTarget::Node(to), EventKind::MouseLeave),
        });
        tracing::debug!(to = to.raw(), "hover.attach");
        Ok(to)
    }

    /// React to pointer enter/leave. Returns whether the event was consumed.
    pub async fn handle_event<P: Page>(&mut self, page: &P, event: &PageEvent) -> bool {
        let Some(attachment) = self.attachment else {
            return false;
        };
        if event.listener == attachment.enter {
            self.enter(page, attachment.to, *event).await;
            true
        } else if event.listener == attachment.leave {
            page.set_style_property(self.node, "opacity", &format_opacity(HOVER_OPACITY));
            true
        } else {
            false
        }
    }

    async fn enter<P: Page>(&mut self, page: &P, to: NodeId, event: PageEvent) {
        if !page.is_mounted(self.node) {
            page.mount(self.node);
        }
        let placed = PlacementRequest::new(page.bounding_rect(to), page.bounding_rect(self.node).size())
            .position(self.position)
            .offset(self.offset)
            .bounds(page.document_rect().size())
            .scroll(page.viewport().scroll)
            .target_fixed(page.computed_style(to, "position") == "fixed")
            .place();
        page.set_style_property(self.node, "top", &px(placed.top));
        page.set_style_property(self.node, "left", &px(placed.left));
        page.next_frame().await;
        page.set_style_property(self.node, "opacity", "1");
        if let Some(hook) = self.on_hover.as_mut() {
            hook(event, page.waiter()).await;
        }
    }

    /// Remove both subscriptions and the box.
    pub fn detach<P: Page>(&mut self, page: &P) {
        self.drop_listeners(page);
        page.unmount(self.node);
        tracing::debug!("hover.detach");
    }

    fn drop_listeners<P: Page>(&mut self, page: &P) {
        if let Some(attachment) = self.attachment.take() {
            page.unlisten(attachment.enter);
            page.unlisten(attachment.leave);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WidgetError;
    use crate::hook::event_hook;
    use roller_backend::TargetError;
    use roller_core::geometry::{Rect, Viewport};
    use roller_harness::{MemoryPage, block_on};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() -> (MemoryPage, NodeId) {
        let page = MemoryPage::new(Viewport::new(1000.0, 800.0));
        let icon = page.insert(page.body(), "span");
        page.set_id(icon, "help");
        page.set_layout(icon, Rect::from_origin_size(200.0, 100.0, 20.0, 20.0));
        (page, icon)
    }

    #[test]
    fn box_is_mounted_lazily_on_enter() {
        let (page, icon) = setup();
        let mut hover = Hover::new(&page, HoverOptions::new("Help")).unwrap();
        assert_eq!(hover.attach_to(&page, "#help").unwrap(), icon);
        assert!(!page.is_mounted(hover.node()));

        let events = page.mouse_enter(icon);
        assert!(block_on(hover.handle_event(&page, &events[0])));
        assert!(page.is_mounted(hover.node()));
        assert_eq!(page.text(hover.node()), "Help");
        assert_eq!(page.style_property(hover.node(), "opacity").as_deref(), Some("1"));
    }

    #[test]
    fn enter_positions_box() {
        let (page, icon) = setup();
        let mut hover =
            Hover::new(&page, HoverOptions::new("Help").position(Position::Bottom)).unwrap();
        page.set_layout(hover.node(), Rect::from_origin_size(0.0, 0.0, 60.0, 30.0));
        hover.attach_to(&page, icon).unwrap();
        let events = page.mouse_enter(icon);
        block_on(hover.handle_event(&page, &events[0]));
        assert_eq!(page.style_property(hover.node(), "top").as_deref(), Some("130px"));
        assert_eq!(page.style_property(hover.node(), "left").as_deref(), Some("200px"));
    }

    #[test]
    fn leave_resets_opacity() {
        let (page, icon) = setup();
        let mut hover = Hover::new(&page, HoverOptions::new("Help")).unwrap();
        hover.attach_to(&page, icon).unwrap();
        let enter = page.mouse_enter(icon);
        block_on(hover.handle_event(&page, &enter[0]));
        let leave = page.mouse_leave(icon);
        assert!(block_on(hover.handle_event(&page, &leave[0])));
        assert_eq!(page.style_property(hover.node(), "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn on_hover_runs_after_show() {
        let (page, icon) = setup();
        let hits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&hits);
        let options = HoverOptions::new("Help").on_hover(event_hook(move |_, _| {
            let seen = Rc::clone(&seen);
            async move { seen.set(seen.get() + 1) }
        }));
        let mut hover = Hover::new(&page, options).unwrap();
        hover.attach_to(&page, icon).unwrap();
        let enter = page.mouse_enter(icon);
        block_on(hover.handle_event(&page, &enter[0]));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn on_hover_sees_the_enter_event() {
        let (page, icon) = setup();
        let got = Rc::new(Cell::new(None));
        let sink = Rc::clone(&got);
        let options = HoverOptions::new("Help").on_hover(event_hook(move |event, _| {
            let sink = Rc::clone(&sink);
            async move { sink.set(Some(event)) }
        }));
        let mut hover = Hover::new(&page, options).unwrap();
        hover.attach_to(&page, icon).unwrap();
        let enter = page.mouse_enter(icon);
        block_on(hover.handle_event(&page, &enter[0]));
        let event = got.get().unwrap();
        assert_eq!(event.kind, EventKind::MouseEnter);
        assert_eq!(event.origin, Some(icon));
        assert_eq!(event, enter[0]);
    }

    #[test]
    fn detach_removes_listeners_and_node() {
        let (page, icon) = setup();
        let mut hover = Hover::new(&page, HoverOptions::new("Help")).unwrap();
        hover.attach_to(&page, icon).unwrap();
        let enter = page.mouse_enter(icon);
        block_on(hover.handle_event(&page, &enter[0]));
        hover.detach(&page);
        assert_eq!(page.listener_count(), 0);
        assert!(!page.is_mounted(hover.node()));
        assert!(page.mouse_enter(icon).is_empty());
        assert_eq!(hover.attached_to(), None);
    }

    #[test]
    fn reattach_moves_subscriptions() {
        let (page, icon) = setup();
        let other = page.insert(page.body(), "span");
        let mut hover = Hover::new(&page, HoverOptions::new("Help")).unwrap();
        hover.attach_to(&page, icon).unwrap();
        hover.attach_to(&page, other).unwrap();
        assert_eq!(page.listener_count(), 2);
        assert!(page.mouse_enter(icon).is_empty());
        assert_eq!(page.mouse_enter(other).len(), 1);
    }

    #[test]
    fn missing_selector_fails() {
        let (page, _) = setup();
        let mut hover = Hover::new(&page, HoverOptions::new("Help")).unwrap();
        assert_eq!(
            hover.attach_to(&page, "#nope"),
            Err(WidgetError::Target(TargetError::NotFound {
                selector: "#nope".to_owned()
            }))
        );
        assert_eq!(page.listener_count(), 0);
    }

    #[test]
    fn foreign_events_are_ignored() {
        let (page, icon) = setup();
        let mut hover = Hover::new(&page, HoverOptions::new("Help")).unwrap();
        let unrelated = page.resize(10.0, 10.0);
        assert!(unrelated.is_empty());
        hover.attach_to(&page, icon).unwrap();
        let other = page.insert(page.body(), "div");
        let click = page.listen(EventTarget::Node(other), EventKind::Click);
        let event = PageEvent {
            listener: click,
            kind: EventKind::Click,
            origin: Some(other),
        };
        assert!(!block_on(hover.handle_event(&page, &event)));
    }
}
