#![forbid(unsafe_code)]

//! Deterministic in-memory page.
//!
//! # Invariants
//!
//! 1. Node 0 is the document root (`html`), node 1 is `body`; both always exist.
//! 2. The inline style of a node lives only in its `style` attribute, so
//!    attribute-level restores are exact.
//! 3. The class list lives only in the `class` attribute.
//! 4. Time moves only when a frame or sleep is requested: each
//!    [`Page::next_frame`] advances the clock by [`FRAME_INTERVAL`], and a
//!    sleep (direct or through a [`Wait`]) advances it by its duration.
//! 5. Layout rectangles are stored in document coordinates;
//!    [`Page::bounding_rect`] subtracts the scroll offset unless the node's
//!    computed `position` is `fixed`.
//! 6. Clones share one document.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::future::{Future, ready};
use std::rc::Rc;
use std::time::Duration;

use roller_backend::{
    EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent, ScrollBehavior, Wait,
};
use roller_core::css::StyleMap;
use roller_core::geometry::{Rect, ScrollOffset, Size, Viewport};

/// Virtual time between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const ROOT: NodeId = NodeId::from_raw(0);
const BODY: NodeId = NodeId::from_raw(1);

#[derive(Debug, Clone)]
enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<Child>,
    attributes: BTreeMap<String, String>,
    layout: Rect,
    stylesheet: BTreeMap<String, String>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            layout: Rect::default(),
            stylesheet: BTreeMap::new(),
        }
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .get("class")
            .map(String::as_str)
            .unwrap_or("")
            .split_whitespace()
    }

    fn inline_style(&self) -> StyleMap {
        self.attributes
            .get("style")
            .map(|s| StyleMap::parse(s))
            .unwrap_or_default()
    }

    fn write_inline_style(&mut self, map: &StyleMap) {
        let block = map
            .iter()
            .map(|(k, v)| format!("{k}: {}", v.to_css()))
            .collect::<Vec<_>>()
            .join("; ");
        self.attributes.insert("style".to_owned(), block);
    }
}

#[derive(Debug)]
struct Dom {
    nodes: Vec<NodeData>,
    listeners: BTreeMap<ListenerId, (EventTarget, EventKind)>,
    next_listener: u64,
    isolated: BTreeSet<NodeId>,
    viewport: Viewport,
    document: Option<Rect>,
    clock: Duration,
    frames: u64,
    scroll_log: Vec<(ScrollOffset, ScrollBehavior)>,
}

impl Dom {
    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.raw() as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.raw() as usize)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children
                .retain(|c| !matches!(c, Child::Element(child) if *child == id));
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // Refuse cycles: the child may not be an ancestor of the parent.
        if self.ancestors(parent).any(|a| a == child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(Child::Element(child));
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).and_then(|n| n.parent), move |p| {
            self.node(*p).and_then(|n| n.parent)
        })
    }

    fn is_connected(&self, id: NodeId) -> bool {
        id == ROOT || self.ancestors(id).any(|a| a == ROOT)
    }

    fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = self.node(id) {
                for child in n.children.iter().rev() {
                    if let Child::Element(c) = child {
                        stack.push(*c);
                    }
                }
            }
        }
        out
    }

    fn text(&self, id: NodeId, out: &mut String) {
        let Some(n) = self.node(id) else {
            return;
        };
        for child in &n.children {
            match child {
                Child::Text(t) => out.push_str(t),
                Child::Element(c) => self.text(*c, out),
            }
        }
    }

    fn computed(&self, id: NodeId, property: &str) -> String {
        let Some(n) = self.node(id) else {
            return String::new();
        };
        if let Some(v) = n.inline_style().get(property) {
            return v.to_css();
        }
        if let Some(v) = n.stylesheet.get(property) {
            return v.clone();
        }
        match property {
            "background-color" => "rgba(0, 0, 0, 0)".to_owned(),
            "position" => "static".to_owned(),
            "opacity" => "1".to_owned(),
            _ => String::new(),
        }
    }

    fn listeners_on(&self, target: EventTarget, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, (t, k))| *t == target && *k == kind)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Simple selector: optional tag, optional `#id`, any number of `.class`.
#[derive(Debug, Default)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }
        let mut selector = Self::default();
        let mut rest = input;
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];
        while !rest.is_empty() {
            let marker = rest.chars().next()?;
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                '#' => selector.id = Some(name.to_owned()),
                '.' => selector.classes.push(name.to_owned()),
                _ => return None,
            }
            rest = &body[end..];
        }
        Some(selector)
    }

    fn matches(&self, node: &NodeData) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != node.tag) {
            return false;
        }
        if let Some(id) = &self.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }
        self.classes
            .iter()
            .all(|c| node.classes().any(|nc| nc == c))
    }
}

/// In-memory [`Page`] with simulated events and a virtual clock.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    dom: Rc<RefCell<Dom>>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new(Viewport::new(1280.0, 720.0))
    }
}

impl MemoryPage {
    /// Create an empty document (`html > body`) with the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        let mut root = NodeData::new("html");
        root.children.push(Child::Element(BODY));
        let mut body = NodeData::new("body");
        body.parent = Some(ROOT);
        Self {
            dom: Rc::new(RefCell::new(Dom {
                nodes: vec![root, body],
                listeners: BTreeMap::new(),
                next_listener: 1,
                isolated: BTreeSet::new(),
                viewport,
                document: None,
                clock: Duration::ZERO,
                frames: 0,
                scroll_log: Vec::new(),
            })),
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Create an element and append it to `parent`.
    pub fn insert(&self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    /// Set the `id` attribute.
    pub fn set_id(&self, node: NodeId, id: &str) {
        self.set_attribute(node, "id", id);
    }

    /// Set the layout rectangle in document coordinates.
    pub fn set_layout(&self, node: NodeId, rect: Rect) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            n.layout = rect;
        }
    }

    /// Give a node a non-inline style (as a stylesheet rule would).
    pub fn set_stylesheet(&self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            n.stylesheet.insert(property.to_owned(), value.to_owned());
        }
    }

    /// Override the body rectangle (defaults to the viewport size at the origin).
    pub fn set_document_rect(&self, rect: Rect) {
        self.dom.borrow_mut().document = Some(rect);
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.dom.borrow().node(node).map(|n| n.tag.clone())
    }

    /// Element children of `node`.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.dom
            .borrow()
            .node(node)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| match c {
                        Child::Element(id) => Some(*id),
                        Child::Text(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Virtual time elapsed.
    pub fn now(&self) -> Duration {
        self.dom.borrow().clock
    }

    /// Number of animation frames requested so far.
    pub fn frames_elapsed(&self) -> u64 {
        self.dom.borrow().frames
    }

    /// Every `scroll_to` call, in order.
    pub fn scroll_log(&self) -> Vec<(ScrollOffset, ScrollBehavior)> {
        self.dom.borrow().scroll_log.clone()
    }

    /// Number of live event subscriptions.
    pub fn listener_count(&self) -> usize {
        self.dom.borrow().listeners.len()
    }

    /// Whether a subscription is live.
    pub fn has_listener(&self, listener: ListenerId) -> bool {
        self.dom.borrow().listeners.contains_key(&listener)
    }

    /// Simulate a click on `node`: events for every click listener on the
    /// bubbling path, innermost first, stopping after an isolated node.
    pub fn click(&self, node: NodeId) -> Vec<PageEvent> {
        let dom = self.dom.borrow();
        let path = std::iter::once(node).chain(dom.ancestors(node));
        let mut events = Vec::new();
        for current in path {
            for listener in dom.listeners_on(EventTarget::Node(current), EventKind::Click) {
                events.push(PageEvent {
                    listener,
                    kind: EventKind::Click,
                    origin: Some(node),
                });
            }
            if dom.isolated.contains(&current) {
                break;
            }
        }
        events
    }

    /// Simulate the pointer entering `node` (no bubbling).
    pub fn mouse_enter(&self, node: NodeId) -> Vec<PageEvent> {
        self.direct(node, EventKind::MouseEnter)
    }

    /// Simulate the pointer leaving `node` (no bubbling).
    pub fn mouse_leave(&self, node: NodeId) -> Vec<PageEvent> {
        self.direct(node, EventKind::MouseLeave)
    }

    /// Resize the window and return the resize events.
    pub fn resize(&self, width: f64, height: f64) -> Vec<PageEvent> {
        let mut dom = self.dom.borrow_mut();
        dom.viewport.width = width;
        dom.viewport.height = height;
        dom.listeners_on(EventTarget::Window, EventKind::Resize)
            .into_iter()
            .map(|listener| PageEvent {
                listener,
                kind: EventKind::Resize,
                origin: None,
            })
            .collect()
    }

    fn direct(&self, node: NodeId, kind: EventKind) -> Vec<PageEvent> {
        self.dom
            .borrow()
            .listeners_on(EventTarget::Node(node), kind)
            .into_iter()
            .map(|listener| PageEvent {
                listener,
                kind,
                origin: Some(node),
            })
            .collect()
    }

    fn advance(&self, by: Duration) -> Duration {
        advance_clock(&self.dom, by)
    }
}

fn advance_clock(dom: &RefCell<Dom>, by: Duration) -> Duration {
    let mut dom = dom.borrow_mut();
    dom.clock += by;
    dom.clock
}

impl Page for MemoryPage {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let parsed = Selector::parse(selector)?;
        let dom = self.dom.borrow();
        dom.document_order()
            .into_iter()
            .find(|id| dom.node(*id).is_some_and(|n| parsed.matches(n)))
    }

    fn create_element(&self, tag: &str) -> NodeId {
        let mut dom = self.dom.borrow_mut();
        let id = NodeId::from_raw(dom.nodes.len() as u64);
        dom.nodes.push(NodeData::new(tag));
        id
    }

    fn append_text(&self, parent: NodeId, text: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(parent) {
            n.children.push(Child::Text(text.to_owned()));
        }
    }

    fn set_text(&self, node: NodeId, text: &str) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<NodeId> = dom
            .node(node)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|c| match c {
                        Child::Element(id) => Some(*id),
                        Child::Text(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        for child in children {
            dom.detach(child);
        }
        if let Some(n) = dom.node_mut(node) {
            n.children = vec![Child::Text(text.to_owned())];
        }
    }

    fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.dom.borrow().text(node, &mut out);
        out
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        self.dom.borrow_mut().append(parent, child);
    }

    fn mount(&self, node: NodeId) {
        self.dom.borrow_mut().append(BODY, node);
    }

    fn unmount(&self, node: NodeId) {
        self.dom.borrow_mut().detach(node);
    }

    fn is_mounted(&self, node: NodeId) -> bool {
        self.dom.borrow().is_connected(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.borrow().node(node).and_then(|n| n.parent)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom
            .borrow()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            n.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            n.attributes.remove(name);
        }
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            if n.classes().any(|c| c == class) {
                return;
            }
            let mut classes: Vec<String> = n.classes().map(str::to_owned).collect();
            classes.push(class.to_owned());
            n.attributes.insert("class".to_owned(), classes.join(" "));
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            if !n.attributes.contains_key("class") {
                return;
            }
            let classes: Vec<String> = n
                .classes()
                .filter(|c| *c != class)
                .map(str::to_owned)
                .collect();
            n.attributes.insert("class".to_owned(), classes.join(" "));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom
            .borrow()
            .node(node)
            .is_some_and(|n| n.classes().any(|c| c == class))
    }

    fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        self.dom
            .borrow()
            .node(node)
            .and_then(|n| n.inline_style().get(property).map(|v| v.to_css()))
    }

    fn set_style_property(&self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            let mut map = n.inline_style();
            map.insert(property, value);
            n.write_inline_style(&map);
        }
    }

    fn remove_style_property(&self, node: NodeId, property: &str) {
        if let Some(n) = self.dom.borrow_mut().node_mut(node) {
            let mut map = n.inline_style();
            if map.remove(property).is_some() {
                n.write_inline_style(&map);
            }
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        self.dom.borrow().computed(node, property)
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let dom = self.dom.borrow();
        let Some(n) = dom.node(node) else {
            return Rect::default();
        };
        if dom.computed(node, "position") == "fixed" {
            return n.layout;
        }
        let scroll = dom.viewport.scroll;
        n.layout.translate(-scroll.x, -scroll.y)
    }

    fn document_rect(&self) -> Rect {
        let dom = self.dom.borrow();
        dom.document.unwrap_or_else(|| {
            let Size { width, height } = dom.viewport.size();
            Rect::from_origin_size(0.0, 0.0, width, height)
        })
    }

    fn viewport(&self) -> Viewport {
        self.dom.borrow().viewport
    }

    fn scroll_to(&self, offset: ScrollOffset, behavior: ScrollBehavior) {
        let mut dom = self.dom.borrow_mut();
        let clamped = ScrollOffset::new(offset.x.max(0.0), offset.y.max(0.0));
        tracing::trace!(x = clamped.x, y = clamped.y, ?behavior, "memory page scroll");
        dom.viewport.scroll = clamped;
        dom.scroll_log.push((clamped, behavior));
    }

    fn listen(&self, target: EventTarget, kind: EventKind) -> ListenerId {
        let mut dom = self.dom.borrow_mut();
        let id = ListenerId::from_raw(dom.next_listener);
        dom.next_listener += 1;
        dom.listeners.insert(id, (target, kind));
        id
    }

    fn unlisten(&self, listener: ListenerId) {
        self.dom.borrow_mut().listeners.remove(&listener);
    }

    fn set_click_isolation(&self, node: NodeId, isolate: bool) {
        let mut dom = self.dom.borrow_mut();
        if isolate {
            dom.isolated.insert(node);
        } else {
            dom.isolated.remove(&node);
        }
    }

    fn next_frame(&self) -> impl Future<Output = Duration> {
        self.dom.borrow_mut().frames += 1;
        ready(self.advance(FRAME_INTERVAL))
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.advance(duration);
        ready(())
    }

    fn waiter(&self) -> Wait {
        let dom = Rc::clone(&self.dom);
        Wait::new(move |duration| {
            advance_clock(&dom, duration);
            ready(())
        })
    }
}
