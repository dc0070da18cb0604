#![forbid(unsafe_code)]

//! Page-corner announcement box.
//!
//! A tip is not tied to any element. It slides in from its corner: the
//! node is built in its initial position (flush with the page edge, or
//! lowered for `center`) and moved to its final position on the first frame
//! after mounting, so the configured transition animates the difference.
//! Clicking either button runs the matching callback and closes the tip.

use std::fmt;
use std::str::FromStr;

use roller_backend::{EventKind, EventTarget, ListenerId, NodeId, Page, PageEvent};
use roller_core::css::StyleMap;
use roller_core::easing::format_opacity;

use crate::defaults::{
    TIP_CLASS, TIP_CLOSE_BUTTON_CLASS, TIP_CLOSE_LABEL, TIP_DESCRIPTION_CLASS, TIP_EDGE_OFFSET,
    TIP_OK_BUTTON_CLASS, TIP_OK_LABEL, TIP_OPACITY, TIP_TRANSITION, tip_buttons_style,
    tip_close_button_style, tip_description_style, tip_ok_button_style, tip_style,
};
use crate::error::Result;
use crate::fade::fade_out;
use crate::hook::Callback;

/// Where the tip sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TipPosition {
    #[default]
    TopRight,
    BottomRight,
    TopLeft,
    BottomLeft,
    Center,
}

impl TipPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::BottomRight => "bottom-right",
            Self::TopLeft => "top-left",
            Self::BottomLeft => "bottom-left",
            Self::Center => "center",
        }
    }

    /// Inline position styles for the slide-in phase.
    pub fn styles(self, phase: TipPhase) -> StyleMap {
        let edge = match phase {
            TipPhase::Initial => "0",
            TipPhase::Final => TIP_EDGE_OFFSET,
        };
        match self {
            Self::TopRight => StyleMap::new().with("top", TIP_EDGE_OFFSET).with("right", edge),
            Self::BottomRight => StyleMap::new()
                .with("bottom", TIP_EDGE_OFFSET)
                .with("right", edge),
            Self::TopLeft => StyleMap::new().with("top", TIP_EDGE_OFFSET).with("left", edge),
            Self::BottomLeft => StyleMap::new()
                .with("bottom", TIP_EDGE_OFFSET)
                .with("left", edge),
            Self::Center => StyleMap::new().with("top", "50%").with("left", "50%").with(
                "transform",
                match phase {
                    TipPhase::Initial => "translate(-50%, 0)",
                    TipPhase::Final => "translate(-50%, -50%)",
                },
            ),
        }
    }
}

impl fmt::Display for TipPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tip position name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tip position {0:?}")]
pub struct ParseTipPositionError(pub String);

impl FromStr for TipPosition {
    type Err = ParseTipPositionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-right" | "" => Ok(Self::TopRight),
            "bottom-right" => Ok(Self::BottomRight),
            "top-left" => Ok(Self::TopLeft),
            "bottom-left" => Ok(Self::BottomLeft),
            "center" => Ok(Self::Center),
            _ => Err(ParseTipPositionError(s.to_owned())),
        }
    }
}

/// Slide-in phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipPhase {
    Initial,
    Final,
}

/// Per-part style overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TipStyles {
    pub tip: StyleMap,
    pub description: StyleMap,
    pub close_button: StyleMap,
    pub ok_button: StyleMap,
}

/// Tip configuration.
pub struct TipOptions {
    pub position: TipPosition,
    pub text: String,
    pub ok_label: String,
    pub close_label: String,
    pub styles: TipStyles,
    pub on_ok: Option<Callback>,
    pub on_close: Option<Callback>,
}

impl fmt::Debug for TipOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TipOptions")
            .field("position", &self.position)
            .field("text", &self.text)
            .field("ok_label", &self.ok_label)
            .field("close_label", &self.close_label)
            .field("styles", &self.styles)
            .field("on_ok", &self.on_ok.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl TipOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            position: TipPosition::default(),
            text: text.into(),
            ok_label: TIP_OK_LABEL.to_owned(),
            close_label: TIP_CLOSE_LABEL.to_owned(),
            styles: TipStyles::default(),
            on_ok: None,
            on_close: None,
        }
    }

    #[must_use]
    pub fn position(mut self, position: TipPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn ok_label(mut self, label: impl Into<String>) -> Self {
        self.ok_label = label.into();
        self
    }

    #[must_use]
    pub fn close_label(mut self, label: impl Into<String>) -> Self {
        self.close_label = label.into();
        self
    }

    #[must_use]
    pub fn styles(mut self, styles: TipStyles) -> Self {
        self.styles = styles;
        self
    }

    #[must_use]
    pub fn on_ok(mut self, callback: Callback) -> Self {
        self.on_ok = Some(callback);
        self
    }

    #[must_use]
    pub fn on_close(mut self, callback: Callback) -> Self {
        self.on_close = Some(callback);
        self
    }
}

/// Which tip button was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipAction {
    Ok,
    Close,
}

/// Corner announcement with Close and OK buttons.
pub struct Tip {
    node: NodeId,
    close_button: NodeId,
    ok_button: NodeId,
    position: TipPosition,
    on_ok: Option<Callback>,
    on_close: Option<Callback>,
    listeners: Option<[ListenerId; 2]>,
}

impl fmt::Debug for Tip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tip")
            .field("node", &self.node)
            .field("position", &self.position)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Tip {
    /// Build the (unmounted) tip in its initial position.
    pub fn new<P: Page>(page: &P, options: TipOptions) -> Result<Self> {
        let TipOptions {
            position,
            text,
            ok_label,
            close_label,
            styles,
            on_ok,
            on_close,
        } = options;

        let node = page.create_styled("aside", Some(TIP_CLASS), &tip_style().merged(&styles.tip))?;

        let description = page.create_styled(
            "p",
            Some(TIP_DESCRIPTION_CLASS),
            &tip_description_style().merged(&styles.description),
        )?;
        page.append_text(description, &text);
        page.append_child(node, description);

        let buttons = page.create_styled("div", None, &tip_buttons_style())?;
        let close_button = page.create_styled(
            "button",
            Some(TIP_CLOSE_BUTTON_CLASS),
            &tip_close_button_style().merged(&styles.close_button),
        )?;
        page.append_text(close_button, &close_label);
        let ok_button = page.create_styled(
            "button",
            Some(TIP_OK_BUTTON_CLASS),
            &tip_ok_button_style().merged(&styles.ok_button),
        )?;
        page.append_text(ok_button, &ok_label);
        page.append_child(buttons, close_button);
        page.append_child(buttons, ok_button);
        page.append_child(node, buttons);

        page.apply_styles(node, &position.styles(TipPhase::Initial))?;

        Ok(Self {
            node,
            close_button,
            ok_button,
            position,
            on_ok,
            on_close,
            listeners: None,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn ok_button(&self) -> NodeId {
        self.ok_button
    }

    pub fn close_button(&self) -> NodeId {
        self.close_button
    }

    pub fn position(&self) -> TipPosition {
        self.position
    }

    pub fn is_shown<P: Page>(&self, page: &P) -> bool {
        page.is_mounted(self.node)
    }

    /// Mount and slide in.
    pub async fn show<P: Page>(&mut self, page: &P) -> Result<()> {
        tracing::debug!(position = %self.position, "tip.show");
        page.set_style_property(self.node, "transition", TIP_TRANSITION);
        page.mount(self.node);
        if self.listeners.is_none() {
            self.listeners = Some([
                page.listen(EventTarget::Node(self.ok_button), EventKind::Click),
                page.listen(EventTarget::Node(self.close_button), EventKind::Click),
            ]);
        }
        page.next_frame().await;
        page.set_style_property(self.node, "opacity", &format_opacity(TIP_OPACITY));
        page.apply_styles(self.node, &self.position.styles(TipPhase::Final))?;
        Ok(())
    }

    /// Fade out (`1 - t²`), unmount, and reset opacity for the next show.
    pub async fn close<P: Page>(&mut self, page: &P) {
        if let Some(listeners) = self.listeners.take() {
            for listener in listeners {
                page.unlisten(listener);
            }
        }
        if !page.is_mounted(self.node) {
            return;
        }
        tracing::debug!("tip.close");
        fade_out(page, self.node, 1.0).await;
        page.unmount(self.node);
        page.set_style_property(self.node, "opacity", "0");
    }

    /// Run a button click: the callback first, then close.
    pub async fn handle_event<P: Page>(&mut self, page: &P, event: &PageEvent) -> Option<TipAction> {
        let [ok, close] = self.listeners?;
        let action = if event.listener == ok {
            TipAction::Ok
        } else if event.listener == close {
            TipAction::Close
        } else {
            return None;
        };
        let callback = match action {
            TipAction::Ok => self.on_ok.as_mut(),
            TipAction::Close => self.on_close.as_mut(),
        };
        if let Some(callback) = callback {
            callback();
        }
        self.close(page).await;
        Some(action)
    }
}
