#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use js_sys::{Function, Promise};
use roller::Guide;
use roller_backend::{
    EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent, ScrollBehavior, Wait,
};
use roller_core::geometry::{Rect, ScrollOffset, Viewport};
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    CssStyleDeclaration, Document, Element, Event, HtmlElement, ScrollToOptions, Window,
};

use crate::error::WebError;
use crate::queue::EventQueue;
use crate::registry::{NODE_ID_ATTRIBUTE, Registry, Resolved};

/// Returned for elements the browser refused to create. Never registered.
const DANGLING: u64 = 0;

type DomCallback = Closure<dyn FnMut(Event)>;

fn check<T>(op: &'static str, result: Result<T, JsValue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(op, error = ?err, "dom call failed");
            None
        }
    }
}

fn to_rect(rect: &web_sys::DomRect) -> Rect {
    Rect::from_origin_size(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Key of `element`, read from its [`NODE_ID_ATTRIBUTE`]; untagged or
/// mistagged elements are registered and tagged.
fn register(nodes: &mut Registry<Element>, element: Element) -> NodeId {
    let tag = element.get_attribute(NODE_ID_ATTRIBUTE);
    match nodes.resolve_tagged(tag.as_deref(), element.clone()) {
        Resolved::Known(id) => NodeId::from_raw(id),
        Resolved::Added(id) => {
            check(
                "setAttribute",
                element.set_attribute(NODE_ID_ATTRIBUTE, &id.to_string()),
            );
            trace!(node = id, "element registered");
            NodeId::from_raw(id)
        }
    }
}

fn origin_of(nodes: &RefCell<Registry<Element>>, event: &Event) -> Option<NodeId> {
    let element = event.target()?.dyn_into::<Element>().ok()?;
    let mut nodes = nodes.try_borrow_mut().ok()?;
    Some(register(&mut nodes, element))
}

struct Subscription {
    target: web_sys::EventTarget,
    kind: EventKind,
    callback: DomCallback,
}

/// The live document as a [`Page`].
///
/// Elements are registered on first sight, tagged with their id in
/// [`NODE_ID_ATTRIBUTE`], and keep their [`NodeId`] for the page's
/// lifetime. DOM listeners push [`PageEvent`]s into [`WebPage::events`];
/// nothing is handled from inside a DOM callback.
pub struct WebPage {
    window: Window,
    document: Document,
    nodes: Rc<RefCell<Registry<Element>>>,
    listeners: RefCell<Registry<Subscription>>,
    isolation: RefCell<BTreeMap<NodeId, DomCallback>>,
    events: Rc<EventQueue>,
}

impl fmt::Debug for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPage")
            .field("nodes", &self.nodes.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .field("isolated", &self.isolation.borrow().len())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl WebPage {
    /// Bind to the global window and its document.
    ///
    /// # Errors
    ///
    /// Fails outside a browser main thread.
    pub fn new() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        Ok(Self {
            window,
            document,
            nodes: Rc::new(RefCell::new(Registry::new())),
            listeners: RefCell::new(Registry::new()),
            isolation: RefCell::new(BTreeMap::new()),
            events: Rc::new(EventQueue::new()),
        })
    }

    /// Events captured by listeners, oldest first.
    pub fn events(&self) -> &Rc<EventQueue> {
        &self.events
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.raw()).cloned()
    }

    fn intern(&self, element: Element) -> NodeId {
        register(&mut self.nodes.borrow_mut(), element)
    }

    fn style(&self, node: NodeId) -> Option<CssStyleDeclaration> {
        let element = self.element(node)?;
        element.dyn_ref::<HtmlElement>().map(HtmlElement::style)
    }

    fn detach_listener(subscription: &Subscription) {
        check(
            "removeEventListener",
            subscription.target.remove_event_listener_with_callback(
                subscription.kind.dom_name(),
                subscription.callback.as_ref().unchecked_ref(),
            ),
        );
    }
}

impl Drop for WebPage {
    fn drop(&mut self) {
        for (_, subscription) in self.listeners.get_mut().take_all() {
            Self::detach_listener(&subscription);
        }
        let isolation = std::mem::take(self.isolation.get_mut());
        for (node, callback) in isolation {
            if let Some(element) = self.nodes.borrow().get(node.raw()) {
                check(
                    "removeEventListener",
                    element.remove_event_listener_with_callback(
                        "click",
                        callback.as_ref().unchecked_ref(),
                    ),
                );
            }
        }
    }
}

impl Page for WebPage {
    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let element = check("querySelector", self.document.query_selector(selector))??;
        Some(self.intern(element))
    }

    fn create_element(&self, tag: &str) -> NodeId {
        match self.document.create_element(tag) {
            Ok(element) => self.intern(element),
            Err(err) => {
                warn!(tag, error = ?err, "createElement failed");
                NodeId::from_raw(DANGLING)
            }
        }
    }

    fn append_text(&self, parent: NodeId, text: &str) {
        if let Some(parent) = self.element(parent) {
            let text = self.document.create_text_node(text);
            check("appendChild", parent.append_child(&text));
        }
    }

    fn set_text(&self, node: NodeId, text: &str) {
        if let Some(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|element| element.text_content())
            .unwrap_or_default()
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        if let (Some(parent), Some(child)) = (self.element(parent), self.element(child)) {
            check("appendChild", parent.append_child(&child));
        }
    }

    fn mount(&self, node: NodeId) {
        if let (Some(body), Some(element)) = (self.document.body(), self.element(node)) {
            check("appendChild", body.append_child(&element));
        }
    }

    fn unmount(&self, node: NodeId) {
        if let Some(element) = self.element(node) {
            element.remove();
        }
    }

    fn is_mounted(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.is_connected())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node)?.parent_element()?;
        Some(self.intern(parent))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            check("setAttribute", element.set_attribute(name, value));
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(element) = self.element(node) {
            check("removeAttribute", element.remove_attribute(name));
        }
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            check("classList.add", element.class_list().add_1(class));
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            check("classList.remove", element.class_list().remove_1(class));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let value = check("getPropertyValue", self.style(node)?.get_property_value(property))?;
        (!value.is_empty()).then_some(value)
    }

    fn set_style_property(&self, node: NodeId, property: &str, value: &str) {
        if let Some(style) = self.style(node) {
            check("setProperty", style.set_property(property, value));
        }
    }

    fn remove_style_property(&self, node: NodeId, property: &str) {
        if let Some(style) = self.style(node) {
            check("removeProperty", style.remove_property(property));
        }
    }

    fn computed_style(&self, node: NodeId, property: &str) -> String {
        self.element(node)
            .and_then(|element| check("getComputedStyle", self.window.get_computed_style(&element)))
            .flatten()
            .and_then(|style| check("getPropertyValue", style.get_property_value(property)))
            .unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|element| to_rect(&element.get_bounding_client_rect()))
            .unwrap_or_default()
    }

    fn document_rect(&self) -> Rect {
        self.document
            .body()
            .map(|body| to_rect(&body.get_bounding_client_rect()))
            .unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or_default()
        };
        let scroll = ScrollOffset::new(
            self.window.scroll_x().unwrap_or_default(),
            self.window.scroll_y().unwrap_or_default(),
        );
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
        .scrolled_to(scroll)
    }

    fn scroll_to(&self, offset: ScrollOffset, behavior: ScrollBehavior) {
        trace!(x = offset.x, y = offset.y, ?behavior, "scroll_to");
        let options = ScrollToOptions::new();
        options.set_left(offset.x);
        options.set_top(offset.y);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn listen(&self, target: EventTarget, kind: EventKind) -> ListenerId {
        let dom_target: web_sys::EventTarget = match target {
            EventTarget::Window => self.window.clone().into(),
            EventTarget::Node(node) => match self.element(node) {
                Some(element) => element.into(),
                None => {
                    warn!(node = node.raw(), ?kind, "listen on unknown node");
                    return ListenerId::from_raw(DANGLING);
                }
            },
        };

        let mut listeners = self.listeners.borrow_mut();
        let listener = ListenerId::from_raw(listeners.next_key());
        let events = Rc::clone(&self.events);
        let nodes = Rc::clone(&self.nodes);
        let callback = DomCallback::new(move |event: Event| {
            events.push(PageEvent {
                listener,
                kind,
                origin: origin_of(&nodes, &event),
            });
        });
        check(
            "addEventListener",
            dom_target.add_event_listener_with_callback(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
            ),
        );
        listeners.insert(Subscription {
            target: dom_target,
            kind,
            callback,
        });
        trace!(listener = listener.raw(), ?kind, "listen");
        listener
    }

    fn unlisten(&self, listener: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(listener.raw());
        if let Some(subscription) = removed {
            Self::detach_listener(&subscription);
        }
    }

    fn set_click_isolation(&self, node: NodeId, isolate: bool) {
        let Some(element) = self.element(node) else {
            return;
        };
        let mut isolation = self.isolation.borrow_mut();
        if isolate {
            if isolation.contains_key(&node) {
                return;
            }
            let callback = DomCallback::new(|event: Event| event.stop_propagation());
            check(
                "addEventListener",
                element.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref()),
            );
            isolation.insert(node, callback);
        } else if let Some(callback) = isolation.remove(&node) {
            check(
                "removeEventListener",
                element.remove_event_listener_with_callback("click", callback.as_ref().unchecked_ref()),
            );
        }
    }

    fn next_frame(&self) -> impl Future<Output = Duration> {
        let window = self.window.clone();
        async move {
            let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
                if window.request_animation_frame(&resolve).is_err() {
                    let now = window.performance().map(|p| p.now()).unwrap_or_default();
                    check("resolve", resolve.call1(&JsValue::UNDEFINED, &JsValue::from_f64(now)));
                }
            });
            let millis = JsFuture::from(promise)
                .await
                .ok()
                .and_then(|stamp| stamp.as_f64())
                .unwrap_or_default();
            Duration::from_secs_f64(millis.max(0.0) / 1000.0)
        }
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        timeout(self.window.clone(), duration)
    }

    fn waiter(&self) -> Wait {
        let window = self.window.clone();
        Wait::new(move |duration| timeout(window.clone(), duration))
    }
}

/// Resolve after `duration` via `setTimeout`; immediately if it cannot be
/// scheduled.
async fn timeout(window: Window, duration: Duration) {
    let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let scheduled =
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        if scheduled.is_err() {
            check("resolve", resolve.call0(&JsValue::UNDEFINED));
        }
    });
    check("sleep", JsFuture::from(promise).await);
}

#[derive(Default)]
struct DriverState {
    /// Empty while a transition is in flight.
    guide: RefCell<Option<Guide>>,
    running: Cell<bool>,
    start_requested: Cell<bool>,
}

/// Runs a [`Guide`] against a [`WebPage`].
///
/// Each captured event is handled to completion, fades included, before
/// the next is taken from the queue, so a double click on Next during a
/// transition moves two steps rather than racing.
pub struct GuideDriver {
    page: Rc<WebPage>,
    state: Rc<DriverState>,
}

impl fmt::Debug for GuideDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideDriver")
            .field("page", &self.page)
            .field("running", &self.state.running.get())
            .finish_non_exhaustive()
    }
}

impl GuideDriver {
    pub fn new(page: Rc<WebPage>, guide: Guide) -> Self {
        let state = Rc::new(DriverState {
            guide: RefCell::new(Some(guide)),
            ..DriverState::default()
        });
        let weak_page = Rc::downgrade(&page);
        let weak_state = Rc::downgrade(&state);
        page.events().set_waker(move || {
            if let (Some(page), Some(state)) = (weak_page.upgrade(), weak_state.upgrade()) {
                pump(page, state);
            }
        });
        Self { page, state }
    }

    /// Start the tour once the current transition, if any, has finished.
    pub fn start(&self) {
        self.state.start_requested.set(true);
        pump(Rc::clone(&self.page), Rc::clone(&self.state));
    }

    /// Run `f` on the guide. Returns `None` while a transition is in flight.
    pub fn with_guide<R>(&self, f: impl FnOnce(&mut Guide) -> R) -> Option<R> {
        self.state.guide.try_borrow_mut().ok()?.as_mut().map(f)
    }

    pub fn page(&self) -> &Rc<WebPage> {
        &self.page
    }
}

impl Drop for GuideDriver {
    fn drop(&mut self) {
        self.page.events().clear_waker();
    }
}

/// Drain the start request and the event queue on the local executor.
fn pump(page: Rc<WebPage>, state: Rc<DriverState>) {
    if state.running.replace(true) {
        return;
    }
    spawn_local(async move {
        loop {
            let Some(mut guide) = state.guide.borrow_mut().take() else {
                break;
            };
            let outcome = if state.start_requested.replace(false) {
                guide.start(&*page).await
            } else if let Some(event) = page.events().pop() {
                guide.handle_event(&*page, &event).await.map(drop)
            } else {
                state.guide.replace(Some(guide));
                break;
            };
            state.guide.replace(Some(guide));
            if let Err(err) = outcome {
                warn!(%err, "guide transition failed");
            }
        }
        state.running.set(false);
    });
}
