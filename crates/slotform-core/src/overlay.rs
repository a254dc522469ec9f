//! Dropdown overlay geometry: pure positioning and clamping math.
//!
//! All coordinates are container-content coordinates: the widget container's
//! top-left content corner is the origin, scroll offsets already folded in.
//! The browser layer measures rects and scroll state; this module only does
//! the arithmetic, so the clamping rules are testable on native targets.

/// Gap between the anchor edge and the overlay.
pub const OVERLAY_GAP: f64 = 4.0;

/// Margin kept from the container's right edge when the overlay is shifted.
pub const OVERLAY_MARGIN: f64 = 8.0;

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Measured overlay dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Final overlay placement, relative to the container's content origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayPosition {
    pub left: f64,
    pub top: f64,
}

impl OverlayPosition {
    /// Place the overlay at the anchor's bottom-left corner, then clamp it
    /// into the visible `viewport`.
    ///
    /// - `anchor`: the clicked field's rect.
    /// - `overlay`: the painted overlay's size.
    /// - `viewport`: the container's visible region (scroll offset + client
    ///   size), in the same coordinate space.
    ///
    /// Right overflow shifts the overlay left by the overflow plus `margin`,
    /// never past the viewport's left edge. Bottom overflow flips the overlay
    /// above the anchor instead, floored at the viewport's top edge.
    pub fn compute(anchor: Rect, overlay: Size, viewport: Rect, gap: f64, margin: f64) -> Self {
        let mut left = anchor.x;
        let mut top = anchor.bottom() + gap;

        if left + overlay.width > viewport.right() {
            left = viewport.right() - overlay.width - margin;
        }
        if left < viewport.x {
            left = viewport.x;
        }

        if top + overlay.height > viewport.bottom() {
            top = anchor.y - overlay.height - gap;
            if top < viewport.y {
                top = viewport.y;
            }
        }

        Self { left, top }
    }
}
