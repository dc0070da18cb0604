#![forbid(unsafe_code)]

//! Tour navigation buttons.
//!
//! The navigation rules live in [`NavState`]: Prev is available iff the step
//! is not the first, and Next reads as Done iff the step is the last.
//! [`Controller`] only renders those two facts onto its buttons.
//!
//! # Layout
//!
//! ```text
//! footer
//! ├── button  (Skip)
//! └── div
//!     ├── button  (Prev)
//!     └── button  (Next / Done)
//! ```

use roller_backend::{EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent};
use roller_core::css::StyleMap;

use crate::defaults::{
    DONE_LABEL, NEXT_LABEL, PREV_LABEL, SKIP_LABEL, controller_button_style, controls_style,
    footer_style, prev_button_style, skip_button_style,
};
use crate::error::Result;

/// Button texts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerLabels {
    pub skip: String,
    pub prev: String,
    pub next: String,
    pub done: String,
}

impl Default for ControllerLabels {
    fn default() -> Self {
        Self {
            skip: SKIP_LABEL.to_owned(),
            prev: PREV_LABEL.to_owned(),
            next: NEXT_LABEL.to_owned(),
            done: DONE_LABEL.to_owned(),
        }
    }
}

/// Caller style overrides, layered over the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerStyles {
    pub footer: StyleMap,
    pub skip: StyleMap,
    pub prev: StyleMap,
    pub next: StyleMap,
    /// Applied to Next on the last step. Empty means "leave as is".
    pub done: StyleMap,
}

/// Controller configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerOptions {
    pub labels: ControllerLabels,
    pub styles: ControllerStyles,
}

impl ControllerOptions {
    #[must_use]
    pub fn skip_label(mut self, label: impl Into<String>) -> Self {
        self.labels.skip = label.into();
        self
    }

    #[must_use]
    pub fn prev_label(mut self, label: impl Into<String>) -> Self {
        self.labels.prev = label.into();
        self
    }

    #[must_use]
    pub fn next_label(mut self, label: impl Into<String>) -> Self {
        self.labels.next = label.into();
        self
    }

    #[must_use]
    pub fn done_label(mut self, label: impl Into<String>) -> Self {
        self.labels.done = label.into();
        self
    }

    #[must_use]
    pub fn footer_style(mut self, style: StyleMap) -> Self {
        self.styles.footer = style;
        self
    }

    #[must_use]
    pub fn skip_style(mut self, style: StyleMap) -> Self {
        self.styles.skip = style;
        self
    }

    #[must_use]
    pub fn prev_style(mut self, style: StyleMap) -> Self {
        self.styles.prev = style;
        self
    }

    #[must_use]
    pub fn next_style(mut self, style: StyleMap) -> Self {
        self.styles.next = style;
        self
    }

    #[must_use]
    pub fn done_style(mut self, style: StyleMap) -> Self {
        self.styles.done = style;
        self
    }
}

/// Position within a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub step: usize,
    pub steps: usize,
}

impl NavState {
    pub fn new(step: usize, steps: usize) -> Self {
        Self { step, steps }
    }

    /// Prev is enabled.
    pub fn can_go_back(self) -> bool {
        self.step > 0
    }

    /// Next reads as Done.
    pub fn is_last(self) -> bool {
        self.steps > 0 && self.step == self.steps - 1
    }
}

/// A navigation request from one of the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Skip,
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy)]
struct Button {
    node: NodeId,
    listener: ListenerId,
}

/// Skip / Prev / Next buttons in a footer.
#[derive(Debug)]
pub struct Controller {
    node: NodeId,
    skip: Button,
    prev: Button,
    next: Button,
    options: ControllerOptions,
    state: NavState,
}

impl Controller {
    /// Build the footer for a tour of `steps` steps, positioned on step 0.
    pub fn new<P: Page>(page: &P, options: ControllerOptions, steps: usize) -> Result<Self> {
        let styles = &options.styles;
        let footer = page.create_styled("footer", None, &footer_style().merged(&styles.footer))?;
        let controls = page.create_styled("div", None, &controls_style())?;

        let skip = button(page, &skip_button_style().merged(&styles.skip), &options.labels.skip)?;
        let prev = button(page, &prev_button_style().merged(&styles.prev), &options.labels.prev)?;
        let next = button(
            page,
            &controller_button_style().merged(&styles.next),
            &options.labels.next,
        )?;

        page.append_child(controls, prev.node);
        page.append_child(controls, next.node);
        page.append_child(footer, skip.node);
        page.append_child(footer, controls);

        let mut controller = Self {
            node: footer,
            skip,
            prev,
            next,
            options,
            state: NavState::new(0, steps),
        };
        controller.update_position(page, 0)?;
        Ok(controller)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn skip_button(&self) -> NodeId {
        self.skip.node
    }

    pub fn prev_button(&self) -> NodeId {
        self.prev.node
    }

    pub fn next_button(&self) -> NodeId {
        self.next.node
    }

    pub fn nav_state(&self) -> NavState {
        self.state
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Repaint the buttons for `step`.
    pub fn update_position<P: Page>(&mut self, page: &P, step: usize) -> Result<()> {
        self.state.step = step;
        let state = self.state;
        tracing::trace!(step, steps = state.steps, "controller.update_position");

        if state.can_go_back() {
            if page.attribute(self.prev.node, "disabled").is_some() {
                page.remove_attribute(self.prev.node, "disabled");
                page.set_style_property(self.prev.node, "cursor", "pointer");
            }
        } else {
            page.set_attribute(self.prev.node, "disabled", "true");
            page.set_style_property(self.prev.node, "cursor", "not-allowed");
        }

        let labels = &self.options.labels;
        if state.is_last() {
            page.set_text(self.next.node, &labels.done);
            if !self.options.styles.done.is_empty() {
                page.apply_styles(self.next.node, &self.options.styles.done)?;
            }
        } else {
            page.set_text(self.next.node, &labels.next);
            let style = controller_button_style().merged(&self.options.styles.next);
            page.apply_styles(self.next.node, &style)?;
        }
        Ok(())
    }

    /// Which button, if any, an event belongs to.
    pub fn action_for(&self, event: &PageEvent) -> Option<NavAction> {
        if event.kind != EventKind::Click {
            return None;
        }
        [
            (self.skip.listener, NavAction::Skip),
            (self.prev.listener, NavAction::Prev),
            (self.next.listener, NavAction::Next),
        ]
        .into_iter()
        .find_map(|(listener, action)| (listener == event.listener).then_some(action))
    }

    /// Drop the button subscriptions and detach the footer.
    pub fn remove<P: Page>(&self, page: &P) {
        for button in [self.skip, self.prev, self.next] {
            page.unlisten(button.listener);
        }
        page.unmount(self.node);
    }
}

fn button<P: Page>(page: &P, style: &StyleMap, label: &str) -> Result<Button> {
    let node = page.create_styled("button", None, style)?;
    page.append_text(node, label);
    let listener = page.listen(EventTarget::Node(node), EventKind::Click);
    Ok(Button { node, listener })
}
