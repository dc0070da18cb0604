#![forbid(unsafe_code)]

//! Default look of every widget.
//!
//! Each `*_style` function returns the base table a widget starts from;
//! caller overrides are layered on top with [`StyleMap::merged`], so the
//! defaults keep their order and overridden values replace them in place.

use roller_core::css::StyleMap;

// Highlighted element.
pub const ELEMENT_Z_INDEX: i32 = 10001;
pub const ELEMENT_TRANSITION: &str = "all 0.3s ease";
pub const ELEMENT_POSITION: &str = "relative";
/// Background used when no ancestor has an opaque background.
pub const ELEMENT_BACKGROUND_COLOR: &str = "#ffffff";
pub const HIGHLIGHT_CLASS: &str = "roller-highlighted-element";

// Overlay.
pub const OVERLAY_CLASS: &str = "roller-overlay";
pub const OVERLAY_Z_INDEX: i32 = 10000;
pub const OVERLAY_TRANSITION: &str = "opacity 0.3s ease";
pub const OVERLAY_BACKGROUND_COLOR: &str = "#000000";
pub const OVERLAY_VISIBLE_OPACITY: f64 = 0.75;

// Popover.
pub const POPOVER_CLASS: &str = "roller-popover";
pub const POPOVER_Z_INDEX: i32 = 10002;
pub const POPOVER_OFFSET: f64 = 10.0;
pub const POPOVER_TRANSITION: &str = "opacity 0.3s ease";

// Tip.
pub const TIP_CLASS: &str = "roller-tip";
pub const TIP_DESCRIPTION_CLASS: &str = "roller-tip-description";
pub const TIP_CLOSE_BUTTON_CLASS: &str = "roller-tip-close-button";
pub const TIP_OK_BUTTON_CLASS: &str = "roller-tip-ok-button";
pub const TIP_Z_INDEX: i32 = 10003;
pub const TIP_TRANSITION: &str = "all 0.4s ease";
pub const TIP_OPACITY: f64 = 1.0;
pub const TIP_EDGE_OFFSET: &str = "1em";
pub const TIP_CLOSE_LABEL: &str = "Close";
pub const TIP_OK_LABEL: &str = "OK";

// Hover.
pub const HOVER_Z_INDEX: i32 = 10002;
pub const HOVER_OFFSET: f64 = 10.0;
pub const HOVER_OPACITY: f64 = 0.0;
pub const HOVER_TRANSITION: &str = "opacity 0.2s ease";

// Controller.
pub const SKIP_LABEL: &str = "Skip";
pub const PREV_LABEL: &str = "Previous";
pub const NEXT_LABEL: &str = "Next";
pub const DONE_LABEL: &str = "Done";

pub fn overlay_style() -> StyleMap {
    StyleMap::new()
        .with("position", "fixed")
        .with("top", 0)
        .with("bottom", 0)
        .with("left", 0)
        .with("right", 0)
        .with("opacity", 0)
        .with("background-color", OVERLAY_BACKGROUND_COLOR)
        .with("z-index", OVERLAY_Z_INDEX)
}

pub fn popover_style() -> StyleMap {
    StyleMap::new()
        .with("position", "absolute")
        .with("padding", "1em")
        .with("border-radius", "4px")
        .with("background-color", "#ffffff")
        .with("transition", POPOVER_TRANSITION)
        .with("opacity", 0)
        .with("max-width", "400px")
        .with("z-index", POPOVER_Z_INDEX)
}

pub fn popover_title_style() -> StyleMap {
    StyleMap::new()
        .with("margin", "0 0 0.5em 0")
        .with("font-size", "1.25em")
        .with("line-height", "1.3")
        .with("text-align", "left")
}

pub fn popover_description_style() -> StyleMap {
    StyleMap::new()
        .with("margin", "0 0 1em 0")
        .with("font-size", "1em")
        .with("line-height", "1.5")
}

pub fn tip_style() -> StyleMap {
    StyleMap::new()
        .with("padding", "1em")
        .with("position", "fixed")
        .with("border-radius", "4px")
        .with("background-color", "#ffffff")
        .with("opacity", 0)
        .with("max-width", "320px")
        .with("z-index", TIP_Z_INDEX)
        .with("box-shadow", "0 2px 12px rgba(0, 0, 0, 0.3)")
}

pub fn tip_description_style() -> StyleMap {
    StyleMap::new()
        .with("margin", "0 0 1em 0")
        .with("font-size", "1em")
        .with("line-height", "1.5")
        .with("text-align", "left")
}

pub fn tip_buttons_style() -> StyleMap {
    StyleMap::new()
        .with("display", "flex")
        .with("justify-content", "space-between")
}

pub fn tip_close_button_style() -> StyleMap {
    StyleMap::new()
        .with("margin", "0 1em 0 0")
        .with("padding", "0.4em 0.8em")
        .with("outline", "none")
        .with("background-color", "transparent")
        .with("border", "none")
        .with("border-radius", "4px")
        .with("font-size", "0.9em")
        .with("color", "#666666")
}

pub fn tip_ok_button_style() -> StyleMap {
    StyleMap::new()
        .with("margin", "0")
        .with("padding", "0.4em 1.2em")
        .with("outline", "none")
        .with("background-color", "#3b82f6")
        .with("border", "1px solid #2563eb")
        .with("border-radius", "4px")
        .with("font-size", "0.9em")
}

pub fn hover_style() -> StyleMap {
    StyleMap::new()
        .with("position", "absolute")
        .with("padding", "0.5em 1em")
        .with("z-index", HOVER_Z_INDEX)
        .with("border-radius", "4px")
        .with("transition", HOVER_TRANSITION)
        .with("opacity", HOVER_OPACITY)
        .with("max-width", "280px")
        .with("background-color", "#ffffff")
        .with("text-align", "center")
}

pub fn footer_style() -> StyleMap {
    StyleMap::new()
        .with("display", "flex")
        .with("justify-content", "space-between")
        .with("padding-top", "0.75em")
        .with("border-top", "1px solid #e5e7eb")
}

pub fn controls_style() -> StyleMap {
    StyleMap::new().with("display", "flex")
}

/// Style shared by every navigation button.
pub fn controller_button_style() -> StyleMap {
    StyleMap::new()
        .with("margin", "0")
        .with("padding", "0.4em 0.8em")
        .with("outline", "none")
        .with("background-color", "#f3f4f6")
        .with("border", "1px solid #d1d5db")
        .with("border-radius", "4px")
        .with("font-size", "0.9em")
}

pub fn skip_button_style() -> StyleMap {
    controller_button_style().with("margin-right", "1em")
}

pub fn prev_button_style() -> StyleMap {
    controller_button_style().with("margin-right", "0.5em")
}
