//! Rectangle geometry for face regions.
//!
//! Provides the [`Rect`] type used throughout the pipeline, including the
//! context expansion applied to detected face boxes before enhancement.

// ============================================================
// Constants
// ============================================================

/// Horizontal padding divisor: each side grows by `width / 8`
const HORIZONTAL_PAD_DIVISOR: u32 = 8;

/// Vertical padding divisor: each side grows by `height / 6`
///
/// Larger than the horizontal growth because detectors tend to crop
/// hair and chin more aggressively than cheeks.
const VERTICAL_PAD_DIVISOR: u32 = 6;

// ============================================================
// Rect
// ============================================================

/// Axis-aligned rectangular sub-region of an image.
///
/// Invariants: `width > 0`, `height > 0`, and when associated with an image
/// of dimensions `(w, h)`: `x + width <= w`, `y + height <= h`. "No region"
/// is represented as `Option<Rect>` rather than a zero-area value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a rect without bounds checking.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Construct from possibly out-of-bounds detector output, clipping to
    /// the image. Returns `None` if nothing of the box survives clipping.
    pub fn from_detection(
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let clipped_x = x.max(0) as u32;
        let clipped_y = y.max(0) as u32;
        if clipped_x >= image_width || clipped_y >= image_height {
            return None;
        }

        // Portion of the box lost to the left/top clip
        let lost_x = (clipped_x as i64 - x) as u32;
        let lost_y = (clipped_y as i64 - y) as u32;
        let clipped_w = width
            .saturating_sub(lost_x)
            .min(image_width - clipped_x);
        let clipped_h = height
            .saturating_sub(lost_y)
            .min(image_height - clipped_y);

        if clipped_w == 0 || clipped_h == 0 {
            return None;
        }

        Some(Self::new(clipped_x, clipped_y, clipped_w, clipped_h))
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Whether the rect fits inside an image of the given dimensions.
    pub fn fits_in(&self, image_width: u32, image_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x + self.width <= image_width
            && self.y + self.height <= image_height
    }

    /// Expand the rect to give downstream stages context beyond the tight
    /// detection box, clamped to the image bounds.
    ///
    /// Each side grows by `width / 8` horizontally and `height / 6`
    /// vertically. After shifting the origin, width and height are
    /// independently capped against the space remaining on that side.
    pub fn expanded(&self, image_width: u32, image_height: u32) -> Rect {
        let pad_x = self.width / HORIZONTAL_PAD_DIVISOR;
        let pad_y = self.height / VERTICAL_PAD_DIVISOR;

        let x = self.x.saturating_sub(pad_x);
        let y = self.y.saturating_sub(pad_y);
        let width = (self.width + 2 * pad_x).min(image_width - x);
        let height = (self.height + 2 * pad_y).min(image_height - y);

        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area() {
        let rect = Rect::new(10, 20, 100, 120);
        assert_eq!(rect.area(), 12_000);
    }

    #[test]
    fn test_expanded_interior_rect() {
        // Far from every border: full padding on all sides
        let rect = Rect::new(100, 100, 80, 60);
        let expanded = rect.expanded(400, 400);

        assert_eq!(expanded.x, 90); // 100 - 80/8
        assert_eq!(expanded.y, 90); // 100 - 60/6
        assert_eq!(expanded.width, 100); // 80 + 2*10
        assert_eq!(expanded.height, 80); // 60 + 2*10
    }

    #[test]
    fn test_expanded_contains_original() {
        let rect = Rect::new(100, 100, 100, 120);
        let expanded = rect.expanded(400, 400);
        assert!(expanded.contains(&rect));
        assert!(expanded.fits_in(400, 400));
    }

    #[test]
    fn test_expanded_clamps_at_origin() {
        // Rect touching the top-left corner cannot move its origin
        let rect = Rect::new(0, 0, 80, 60);
        let expanded = rect.expanded(400, 400);

        assert_eq!(expanded.x, 0);
        assert_eq!(expanded.y, 0);
        assert_eq!(expanded.width, 100);
        assert_eq!(expanded.height, 80);
    }

    #[test]
    fn test_expanded_clamps_at_far_edge() {
        // Rect touching the bottom-right corner: width capped against
        // remaining space after the origin shift
        let rect = Rect::new(320, 340, 80, 60);
        let expanded = rect.expanded(400, 400);

        assert_eq!(expanded.x, 310);
        assert_eq!(expanded.y, 330);
        assert_eq!(expanded.width, 90); // 400 - 310
        assert_eq!(expanded.height, 70); // 400 - 330
        assert!(expanded.contains(&rect));
        assert!(expanded.fits_in(400, 400));
    }

    #[test]
    fn test_expanded_fills_small_image() {
        let rect = Rect::new(0, 0, 40, 36);
        let expanded = rect.expanded(44, 40);
        assert!(expanded.fits_in(44, 40));
        assert!(expanded.contains(&rect));
    }

    #[test]
    fn test_expanded_tiny_rect_no_padding() {
        // Integer division: sides too small to produce any padding
        let rect = Rect::new(50, 50, 7, 5);
        let expanded = rect.expanded(400, 400);
        assert_eq!(expanded, rect);
    }

    #[test]
    fn test_from_detection_in_bounds() {
        let rect = Rect::from_detection(10, 20, 50, 60, 400, 400).unwrap();
        assert_eq!(rect, Rect::new(10, 20, 50, 60));
    }

    #[test]
    fn test_from_detection_negative_origin() {
        let rect = Rect::from_detection(-10, -5, 50, 60, 400, 400).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 40, 55));
    }

    #[test]
    fn test_from_detection_overflowing_extent() {
        let rect = Rect::from_detection(380, 390, 50, 60, 400, 400).unwrap();
        assert_eq!(rect, Rect::new(380, 390, 20, 10));
    }

    #[test]
    fn test_from_detection_fully_outside() {
        assert!(Rect::from_detection(400, 0, 50, 60, 400, 400).is_none());
        assert!(Rect::from_detection(-60, 0, 50, 60, 400, 400).is_none());
    }

    #[test]
    fn test_contains() {
        let outer = Rect::new(10, 10, 100, 100);
        let inner = Rect::new(20, 20, 50, 50);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains(&outer));
    }
}
