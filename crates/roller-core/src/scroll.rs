#![forbid(unsafe_code)]

//! Scroll target for bringing a highlighted element into view.
//!
//! The target lands a little above and left of true center: the viewport is
//! divided by [`CENTERING_FACTOR`] instead of 2, which leaves room for a
//! popover below or to the right. When a companion box is given, its own
//! top/left are subtracted as well.

use crate::geometry::{Rect, ScrollOffset, Viewport};

/// Viewport divisor used for centering.
pub const CENTERING_FACTOR: f64 = 2.8;

/// Compute the scroll offset that brings `target` toward the viewport center.
///
/// `target` and `companion` are viewport-relative. The result is clamped to
/// non-negative offsets.
pub fn centered_scroll_target(
    target: Rect,
    companion: Option<Rect>,
    viewport: Viewport,
) -> ScrollOffset {
    let doc = target.to_document(viewport.scroll);
    let (companion_top, companion_left) = companion.map_or((0.0, 0.0), |c| (c.top, c.left));
    let y = doc.top - companion_top - viewport.height / CENTERING_FACTOR;
    let x = doc.left - companion_left - viewport.width / CENTERING_FACTOR;
    ScrollOffset::new(x.max(0.0), y.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_with_bias() {
        let vp = Viewport::new(1400.0, 700.0);
        let target = Rect::from_origin_size(2000.0, 1500.0, 100.0, 50.0);
        let s = centered_scroll_target(target, None, vp);
        assert_eq!(s.x, 2000.0 - 1400.0 / CENTERING_FACTOR);
        assert_eq!(s.y, 1500.0 - 700.0 / CENTERING_FACTOR);
    }

    #[test]
    fn accounts_for_current_scroll() {
        let vp = Viewport::new(1400.0, 700.0).scrolled_to(ScrollOffset::new(0.0, 1000.0));
        let target = Rect::from_origin_size(600.0, 500.0, 100.0, 50.0);
        let s = centered_scroll_target(target, None, vp);
        assert_eq!(s.y, 1500.0 - 700.0 / CENTERING_FACTOR);
        assert_eq!(s.x, 600.0 - 1400.0 / CENTERING_FACTOR);
    }

    #[test]
    fn subtracts_companion_origin() {
        let vp = Viewport::new(1400.0, 700.0);
        let target = Rect::from_origin_size(2000.0, 1500.0, 100.0, 50.0);
        let companion = Rect::from_origin_size(40.0, 30.0, 200.0, 100.0);
        let s = centered_scroll_target(target, Some(companion), vp);
        assert_eq!(s.x, 2000.0 - 40.0 - 1400.0 / CENTERING_FACTOR);
        assert_eq!(s.y, 1500.0 - 30.0 - 700.0 / CENTERING_FACTOR);
    }

    #[test]
    fn clamps_to_origin() {
        let vp = Viewport::new(1400.0, 700.0);
        let target = Rect::from_origin_size(10.0, 10.0, 100.0, 50.0);
        assert_eq!(
            centered_scroll_target(target, None, vp),
            ScrollOffset::new(0.0, 0.0)
        );
    }
}
