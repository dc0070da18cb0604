#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are CSS pixels as reported by the host page. A [`Rect`] is
//! viewport-relative unless stated otherwise (the shape `getBoundingClientRect`
//! returns); adding a [`ScrollOffset`] converts it to document coordinates.

/// An axis-aligned bounding box described by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Right edge (`left + width`).
    pub right: f64,
    /// Bottom edge (`top + height`).
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its edges.
    #[inline]
    pub const fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(top, left, left + width, top + height)
    }

    /// Width (never negative).
    #[inline]
    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    /// Height (never negative).
    #[inline]
    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// Size of the rectangle.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Shift every edge by the given deltas.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.top + dy, self.left + dx, self.right + dx, self.bottom + dy)
    }

    /// Convert a viewport-relative rectangle to document coordinates.
    #[inline]
    #[must_use]
    pub fn to_document(&self, scroll: ScrollOffset) -> Self {
        self.translate(scroll.x, scroll.y)
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Current document scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    /// Horizontal scroll (`window.scrollX`).
    pub x: f64,
    /// Vertical scroll (`window.scrollY`).
    pub y: f64,
}

impl ScrollOffset {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visible window: inner size plus the current scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// `window.innerWidth`.
    pub width: f64,
    /// `window.innerHeight`.
    pub height: f64,
    /// Current scroll offset.
    pub scroll: ScrollOffset,
}

impl Viewport {
    /// A viewport scrolled to the origin.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll: ScrollOffset::new(0.0, 0.0),
        }
    }

    /// Same viewport at a different scroll position.
    #[inline]
    #[must_use]
    pub const fn scrolled_to(mut self, scroll: ScrollOffset) -> Self {
        self.scroll = scroll;
        self
    }

    /// Inner size.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
