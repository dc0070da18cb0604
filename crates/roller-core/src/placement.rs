#![forbid(unsafe_code)]

//! Placement of floating boxes (popovers, hovers) around a target.
//!
//! [`PlacementRequest::place`] answers one question: given the target's
//! bounding rectangle and the floating box's size, where does the box's
//! top-left corner go?
//!
//! # Sides
//!
//! | Side | Floating box | Aligned to |
//! |------|--------------|------------|
//! | [`Side::Top`] | above, bottom edge `offset` px from the target's top | target left |
//! | [`Side::Right`] | right, left edge `offset` px from the target's right | target top |
//! | [`Side::Bottom`] | below, top edge `offset` px from the target's bottom | target left |
//! | [`Side::Left`] | left, right edge `offset` px from the target's left | target top |
//!
//! # Auto placement
//!
//! [`Position::Auto`] tries sides in the fixed order top, right, bottom, left
//! and takes the first one whose free space (between the target edge and the
//! document bounds, minus `offset`) is strictly larger than the box on that
//! axis. When none of top/right/bottom fit, left is used unconditionally and
//! the box may overflow.
//!
//! # Invariants
//!
//! 1. Placement is a pure function of the request.
//! 2. A viewport-fixed target is placed in viewport coordinates; any other
//!    target gets the document scroll offset added.

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Rect, ScrollOffset, Size};

/// A concrete side of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Candidate order for auto placement. The last entry is the fallback.
    pub const AUTO_ORDER: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Whether the box stacks above/below the target.
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested position: a fixed side or automatic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Auto,
}

impl Position {
    /// The explicit side, or `None` for [`Position::Auto`].
    pub fn side(self) -> Option<Side> {
        match self {
            Self::Top => Some(Side::Top),
            Self::Bottom => Some(Side::Bottom),
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::Auto => None,
        }
    }
}

impl From<Side> for Position {
    fn from(side: Side) -> Self {
        match side {
            Side::Top => Self::Top,
            Side::Right => Self::Right,
            Side::Bottom => Self::Bottom,
            Side::Left => Self::Left,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side() {
            Some(side) => side.fmt(f),
            None => f.write_str("auto"),
        }
    }
}

/// Error returned when parsing an unknown position name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown position {0:?} (expected top, bottom, left, right or auto)")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "auto" | "" => Ok(Self::Auto),
            _ => Err(ParsePositionError(s.to_owned())),
        }
    }
}

/// Everything placement needs to know.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Target rectangle, viewport-relative.
    pub target: Rect,
    /// Size of the floating box.
    pub floating: Size,
    /// Requested position.
    pub position: Position,
    /// Gap between target and floating box, in px.
    pub offset: f64,
    /// Document bounds used by auto placement.
    pub bounds: Size,
    /// Current document scroll.
    pub scroll: ScrollOffset,
    /// Whether the target is itself `position: fixed`.
    pub target_fixed: bool,
}

impl PlacementRequest {
    /// Create a request with auto position, zero offset, and empty bounds.
    pub fn new(target: Rect, floating: Size) -> Self {
        Self {
            target,
            floating,
            position: Position::Auto,
            offset: 0.0,
            bounds: Size::default(),
            scroll: ScrollOffset::default(),
            target_fixed: false,
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
    pub fn bounds(mut self, bounds: Size) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: ScrollOffset) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn target_fixed(mut self, fixed: bool) -> Self {
        self.target_fixed = fixed;
        self
    }

    /// Resolve the side to use, applying auto selection if requested.
    pub fn resolve_side(&self) -> Side {
        if let Some(side) = self.position.side() {
            return side;
        }
        Side::AUTO_ORDER[..3]
            .iter()
            .copied()
            .find(|&side| self.fits(side))
            .unwrap_or(Side::Left)
    }

    /// Free space between the target edge and the bounds on `side`, minus the offset.
    pub fn available_space(&self, side: Side) -> f64 {
        let t = &self.target;
        match side {
            Side::Top => t.top - self.offset,
            Side::Right => self.bounds.width - t.right - self.offset,
            Side::Bottom => self.bounds.height - t.bottom - self.offset,
            Side::Left => t.left - self.offset,
        }
    }

    fn needed_space(&self, side: Side) -> f64 {
        if side.is_vertical() {
            self.floating.height
        } else {
            self.floating.width
        }
    }

    fn fits(&self, side: Side) -> bool {
        self.available_space(side) - self.needed_space(side) > 0.0
    }

    /// Compute the floating box's top-left corner.
    pub fn place(&self) -> Placed {
        let side = self.resolve_side();
        let anchor = if self.target_fixed {
            self.target
        } else {
            self.target.to_document(self.scroll)
        };
        let (top, left) = match side {
            Side::Top => (anchor.top - self.offset - self.floating.height, anchor.left),
            Side::Right => (anchor.top, anchor.right + self.offset),
            Side::Bottom => (anchor.bottom + self.offset, anchor.left),
            Side::Left => (anchor.top, anchor.left - self.offset - self.floating.width),
        };
        Placed { side, top, left }
    }
}

/// Result of placement: the chosen side and the box's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub side: Side,
    pub top: f64,
    pub left: f64,
}

impl Placed {
    /// The box's rectangle, given its size.
    pub fn rect(&self, floating: Size) -> Rect {
        Rect::from_origin_size(self.left, self.top, floating.width, floating.height)
    }
}

/// Shorthand for [`PlacementRequest::place`].
pub fn place(request: &PlacementRequest) -> Placed {
    request.place()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: Size = Size::new(1000.0, 800.0);

    fn request(target: Rect, floating: Size) -> PlacementRequest {
        PlacementRequest::new(target, floating)
            .offset(10.0)
            .bounds(BOUNDS)
    }

    #[test]
    fn explicit_top_aligns_left_and_sits_above() {
        let target = Rect::from_origin_size(100.0, 300.0, 50.0, 20.0);
        let placed = request(target, Size::new(80.0, 40.0))
            .position(Position::Top)
            .place();
        assert_eq!(placed.side, Side::Top);
        assert_eq!(placed.top, 300.0 - 10.0 - 40.0);
        assert_eq!(placed.left, 100.0);
    }

    #[test]
    fn explicit_right_aligns_top() {
        let target = Rect::from_origin_size(100.0, 300.0, 50.0, 20.0);
        let placed = request(target, Size::new(80.0, 40.0))
            .position(Position::Right)
            .place();
        assert_eq!(placed.side, Side::Right);
        assert_eq!(placed.top, 300.0);
        assert_eq!(placed.left, 160.0);
    }

    #[test]
    fn explicit_bottom_sits_below() {
        let target = Rect::from_origin_size(100.0, 300.0, 50.0, 20.0);
        let placed = request(target, Size::new(80.0, 40.0))
            .position(Position::Bottom)
            .place();
        assert_eq!(placed.top, 330.0);
        assert_eq!(placed.left, 100.0);
    }

    #[test]
    fn explicit_left_sits_left() {
        let target = Rect::from_origin_size(300.0, 300.0, 50.0, 20.0);
        let placed = request(target, Size::new(80.0, 40.0))
            .position(Position::Left)
            .place();
        assert_eq!(placed.top, 300.0);
        assert_eq!(placed.left, 300.0 - 10.0 - 80.0);
    }

    #[test]
    fn auto_prefers_top_when_space_above() {
        let target = Rect::from_origin_size(950.0, 400.0, 40.0, 390.0);
        let floating = Size::new(100.0, 50.0);
        let placed = request(target, floating).place();
        assert_eq!(placed.side, Side::Top);
        assert_eq!(placed.rect(floating).bottom, target.top - 10.0);
        assert_eq!(placed.left, target.left);
    }

    #[test]
    fn auto_takes_right_when_top_is_blocked() {
        let target = Rect::from_origin_size(10.0, 5.0, 50.0, 20.0);
        let placed = request(target, Size::new(100.0, 50.0)).place();
        assert_eq!(placed.side, Side::Right);
    }

    #[test]
    fn auto_takes_bottom_when_top_and_right_are_blocked() {
        let target = Rect::from_origin_size(900.0, 5.0, 95.0, 20.0);
        let placed = request(target, Size::new(100.0, 50.0)).place();
        assert_eq!(placed.side, Side::Bottom);
    }

    #[test]
    fn auto_falls_back_to_left_even_without_room() {
        let target = Rect::from_origin_size(5.0, 5.0, 990.0, 790.0);
        let placed = request(target, Size::new(100.0, 50.0)).place();
        assert_eq!(placed.side, Side::Left);
        assert!(placed.left < 0.0);
    }

    #[test]
    fn exact_fit_is_not_enough() {
        // 50 px of room minus 10 px offset equals the 40 px box: strictly greater is required.
        let target = Rect::from_origin_size(10.0, 50.0, 50.0, 20.0);
        let req = request(target, Size::new(100.0, 40.0));
        assert_eq!(req.available_space(Side::Top), 40.0);
        assert_ne!(req.resolve_side(), Side::Top);
    }

    #[test]
    fn scroll_offset_applies_to_normal_targets() {
        let target = Rect::from_origin_size(100.0, 300.0, 50.0, 20.0);
        let placed = request(target, Size::new(80.0, 40.0))
            .position(Position::Bottom)
            .scroll(ScrollOffset::new(7.0, 500.0))
            .place();
        assert_eq!(placed.top, 830.0);
        assert_eq!(placed.left, 107.0);
    }

    #[test]
    fn fixed_targets_skip_scroll_offset() {
        let target = Rect::from_origin_size(100.0, 300.0, 50.0, 20.0);
        let placed = request(target, Size::new(80.0, 40.0))
            .position(Position::Bottom)
            .scroll(ScrollOffset::new(7.0, 500.0))
            .target_fixed(true)
            .place();
        assert_eq!(placed.top, 330.0);
        assert_eq!(placed.left, 100.0);
    }

    #[test]
    fn auto_uses_viewport_rect_not_document_rect() {
        // Scrolling must not change which side is chosen.
        let target = Rect::from_origin_size(10.0, 5.0, 50.0, 20.0);
        let req = request(target, Size::new(100.0, 50.0));
        let scrolled = req.scroll(ScrollOffset::new(0.0, 2000.0));
        assert_eq!(req.resolve_side(), scrolled.resolve_side());
    }

    #[test]
    fn position_parse_and_display() {
        for name in ["top", "bottom", "left", "right", "auto"] {
            let pos: Position = name.parse().unwrap();
            assert_eq!(pos.to_string(), name);
        }
        assert_eq!(" TOP ".parse::<Position>().unwrap(), Position::Top);
        assert!("middle".parse::<Position>().is_err());
        assert_eq!(Position::default(), Position::Auto);
    }

    #[test]
    fn side_vertical_flags() {
        assert!(Side::Top.is_vertical());
        assert!(Side::Bottom.is_vertical());
        assert!(!Side::Left.is_vertical());
        assert!(!Side::Right.is_vertical());
        assert_eq!(Position::from(Side::Right), Position::Right);
    }

    proptest! {
        #[test]
        fn explicit_side_is_always_honored(
            x in 0.0f64..900.0,
            y in 0.0f64..700.0,
            w in 1.0f64..100.0,
            h in 1.0f64..100.0,
            fw in 1.0f64..300.0,
            fh in 1.0f64..300.0,
            side_idx in 0usize..4,
        ) {
            let side = Side::AUTO_ORDER[side_idx];
            let placed = request(Rect::from_origin_size(x, y, w, h), Size::new(fw, fh))
                .position(side.into())
                .place();
            prop_assert_eq!(placed.side, side);
        }

        #[test]
        fn auto_side_never_overlaps_target_gap(
            x in 0.0f64..900.0,
            y in 0.0f64..700.0,
            w in 1.0f64..100.0,
            h in 1.0f64..100.0,
            fw in 1.0f64..300.0,
            fh in 1.0f64..300.0,
        ) {
            let target = Rect::from_origin_size(x, y, w, h);
            let floating = Size::new(fw, fh);
            let placed = request(target, floating).place();
            let rect = placed.rect(floating);
            let eps = 1e-9;
            match placed.side {
                Side::Top => prop_assert!((rect.bottom - (target.top - 10.0)).abs() < eps),
                Side::Right => prop_assert!((rect.left - (target.right + 10.0)).abs() < eps),
                Side::Bottom => prop_assert!((rect.top - (target.bottom + 10.0)).abs() < eps),
                Side::Left => prop_assert!((rect.right - (target.left - 10.0)).abs() < eps),
            }
        }

        #[test]
        fn auto_chosen_non_fallback_side_fits(
            x in 0.0f64..900.0,
            y in 0.0f64..700.0,
            w in 1.0f64..100.0,
            h in 1.0f64..100.0,
            fw in 1.0f64..300.0,
            fh in 1.0f64..300.0,
        ) {
            let req = request(Rect::from_origin_size(x, y, w, h), Size::new(fw, fh));
            let side = req.resolve_side();
            if side != Side::Left {
                let needed = if side.is_vertical() { fh } else { fw };
                prop_assert!(req.available_space(side) > needed);
            }
        }
    }
}
