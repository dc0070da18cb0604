#![forbid(unsafe_code)]
#![doc = "Host page abstraction for Roller: the boundary between tour logic and the DOM."]
#![doc = ""]
#![doc = "Widgets never talk to a browser directly. Every node, style, rectangle, event"]
#![doc = "subscription, and animation frame flows through [`Page`]. Concrete hosts:"]
#![doc = "`roller-web` (wasm32 + `web-sys`) and `roller-harness` (deterministic, in memory)."]

use core::future::Future;
use core::time::Duration;

use roller_core::css::{CssError, StyleMap};
use roller_core::geometry::{Rect, ScrollOffset, Viewport};

mod target;
mod wait;

pub use target::{Target, TargetError};
pub use wait::Wait;

/// Opaque handle to an element owned by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to an event subscription created by [`Page::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Event kinds widgets subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Primary click (bubbles).
    Click,
    /// Pointer entered the node.
    MouseEnter,
    /// Pointer left the node.
    MouseLeave,
    /// Window resized.
    Resize,
}

impl EventKind {
    /// DOM event type name.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Resize => "resize",
        }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Node(NodeId),
    Window,
}

/// An event delivered to the listener that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvent {
    /// The subscription this event was delivered to.
    pub listener: ListenerId,
    pub kind: EventKind,
    /// Node the event originated on (`event.target`), if any.
    pub origin: Option<NodeId>,
}

/// How [`Page::scroll_to`] moves the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// The host page.
///
/// Methods take `&self`: a page is a shared, single-threaded resource and
/// implementations use interior mutability the way the DOM itself does.
/// Operations on unknown or stale [`NodeId`]s are ignored (queries return
/// empty values) rather than failing.
pub trait Page {
    /// First element matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Append a text node to `parent`.
    fn append_text(&self, parent: NodeId, text: &str);

    /// Replace all children of `node` with a single text node.
    fn set_text(&self, node: NodeId, text: &str);

    /// Text content of `node` and its descendants.
    fn text(&self, node: NodeId) -> String;

    /// Append `child` to `parent`, moving it if it is attached elsewhere.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Append `node` to the document body, moving it if already attached.
    fn mount(&self, node: NodeId);

    /// Detach `node` from its parent.
    fn unmount(&self, node: NodeId);

    /// Whether `node` is connected to the document.
    fn is_mounted(&self, node: NodeId) -> bool;

    /// Parent element, or `None` at the document root or for detached nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);
    fn remove_attribute(&self, node: NodeId, name: &str);

    fn add_class(&self, node: NodeId, class: &str);
    fn remove_class(&self, node: NodeId, class: &str);
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Inline style property, if set.
    fn style_property(&self, node: NodeId, property: &str) -> Option<String>;
    /// Set an inline style property.
    fn set_style_property(&self, node: NodeId, property: &str, value: &str);
    /// Remove an inline style property.
    fn remove_style_property(&self, node: NodeId, property: &str);

    /// Resolved (computed) style property.
    fn computed_style(&self, node: NodeId, property: &str) -> String;

    /// Viewport-relative bounding rectangle.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Bounding rectangle of the document body.
    fn document_rect(&self) -> Rect;

    /// Inner size and scroll position.
    fn viewport(&self) -> Viewport;

    /// Scroll the document.
    fn scroll_to(&self, offset: ScrollOffset, behavior: ScrollBehavior);

    /// Subscribe to `kind` events on `target`.
    fn listen(&self, target: EventTarget, kind: EventKind) -> ListenerId;

    /// Drop a subscription. Unknown ids are ignored.
    fn unlisten(&self, listener: ListenerId);

    /// Stop click events from bubbling past `node`.
    fn set_click_isolation(&self, node: NodeId, isolate: bool);

    /// Resolve on the next animation frame with the frame timestamp.
    fn next_frame(&self) -> impl Future<Output = Duration>;

    /// Resolve after `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;

    /// Owned handle onto the same timer as [`Page::sleep`], for hooks.
    fn waiter(&self) -> Wait;

    /// Set every property of `styles` inline, keeping unrelated properties.
    fn apply_styles(&self, node: NodeId, styles: &StyleMap) -> Result<(), CssError> {
        for (property, value) in styles.declarations()? {
            self.set_style_property(node, &property, &value);
        }
        Ok(())
    }

    /// Replace the whole `style` attribute with `styles`.
    fn set_style_attribute(&self, node: NodeId, styles: &StyleMap) -> Result<(), CssError> {
        let block = styles.to_declaration_block()?;
        self.set_attribute(node, "style", &block);
        Ok(())
    }

    /// Create an element with an initial `style` attribute and optional class.
    fn create_styled(
        &self,
        tag: &str,
        class: Option<&str>,
        styles: &StyleMap,
    ) -> Result<NodeId, CssError> {
        let block = styles.to_declaration_block()?;
        let node = self.create_element(tag);
        if let Some(class) = class {
            self.add_class(node, class);
        }
        self.set_attribute(node, "style", &block);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_raw_values() {
        assert_eq!(NodeId::from_raw(7).raw(), 7);
        assert_eq!(ListenerId::from_raw(9).raw(), 9);
        assert!(NodeId::from_raw(1) < NodeId::from_raw(2));
    }

    #[test]
    fn event_kind_dom_names() {
        assert_eq!(EventKind::Click.dom_name(), "click");
        assert_eq!(EventKind::MouseEnter.dom_name(), "mouseenter");
        assert_eq!(EventKind::MouseLeave.dom_name(), "mouseleave");
        assert_eq!(EventKind::Resize.dom_name(), "resize");
    }

    #[test]
    fn scroll_behavior_defaults_to_smooth() {
        assert_eq!(ScrollBehavior::default(), ScrollBehavior::Smooth);
    }
}
