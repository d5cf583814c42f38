//! Feathered compositing of the enhanced region into the source image.
//!
//! The enhanced region is resized back to the target rect's footprint, an
//! alpha mask that decays smoothly toward the rect boundary is built, and
//! the two sources are blended per pixel in floating point. Pixels outside
//! the rect are never touched; pixels at the boundary stay close to the
//! original image, so the seam is invisible.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::geometry::Rect;

// ============================================================
// Constants
// ============================================================

/// Feather radius as a fraction of rect width: `width / 20`
const FEATHER_RADIUS_DIVISOR: u32 = 20;

/// Minimum feather radius in pixels
const MIN_FEATHER_RADIUS: u32 = 3;

// ============================================================
// Feather mask
// ============================================================

/// Single-channel soft alpha mask the size of a target rect.
///
/// Built by convolving a unit field with a separable Gaussian that treats
/// everything outside the rect as zero, then min-max normalizing, so values
/// span exactly `[0, 1]`: near 1 in the interior, decaying monotonically
/// toward the border.
#[derive(Debug, Clone)]
pub struct FeatherMask {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl FeatherMask {
    /// Build a mask for a rect of the given dimensions, with the feather
    /// radius proportional to the rect width.
    pub fn new(width: u32, height: u32) -> Self {
        let radius = (width / FEATHER_RADIUS_DIVISOR).max(MIN_FEATHER_RADIUS);
        Self::with_radius(width, height, radius)
    }

    /// Build a mask with an explicit feather radius (floored at 1).
    pub fn with_radius(width: u32, height: u32, radius: u32) -> Self {
        let radius = radius.max(1) as usize;
        let kernel = gaussian_kernel(radius * 2 + 1, radius as f32);

        // Convolving a unit field with zero padding is just the kernel mass
        // that stays inside the span; compute each axis profile directly.
        let horizontal = edge_profile(width as usize, &kernel);
        let vertical = edge_profile(height as usize, &kernel);

        let mut values = Vec::with_capacity(width as usize * height as usize);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &vy in &vertical {
            for &vx in &horizontal {
                let v = vx * vy;
                min = min.min(v);
                max = max.max(v);
                values.push(v);
            }
        }

        // Normalize to span exactly [0, 1]
        if max > min {
            let range = max - min;
            for v in &mut values {
                *v = (*v - min) / range;
            }
        } else {
            values.fill(1.0);
        }

        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mask value at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }
}

/// 1-D profile of a unit span convolved with `kernel` under zero padding.
fn edge_profile(len: usize, kernel: &[f32]) -> Vec<f32> {
    let half = kernel.len() / 2;
    let mut profile = Vec::with_capacity(len);
    for x in 0..len {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let sx = x as i64 + ki as i64 - half as i64;
            if sx >= 0 && (sx as usize) < len {
                sum += kv;
            }
        }
        profile.push(sum);
    }
    profile
}

/// Generate a normalized 1D Gaussian kernel
fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let half = (size / 2) as i32;
    let mut kernel = Vec::with_capacity(size);
    let mut sum = 0.0f32;

    for i in 0..size {
        let x = (i as i32 - half) as f32;
        let g = (-x * x / (2.0 * sigma * sigma)).exp();
        kernel.push(g);
        sum += g;
    }

    for k in &mut kernel {
        *k /= sum;
    }

    kernel
}

// ============================================================
// Compositing
// ============================================================

/// Blend an enhanced region into `canvas` at `rect` with a feathered edge.
///
/// The region may be at any resolution; it is resized to the rect's exact
/// footprint first. Only pixels inside `rect` are modified. The rect must
/// fit inside the canvas.
pub fn composite_feathered(enhanced: &RgbImage, rect: Rect, canvas: &mut RgbImage) {
    debug_assert!(rect.fits_in(canvas.width(), canvas.height()));

    let resized = if enhanced.dimensions() == (rect.width, rect.height) {
        enhanced.clone()
    } else {
        imageops::resize(enhanced, rect.width, rect.height, FilterType::CatmullRom)
    };

    let mask = FeatherMask::new(rect.width, rect.height);

    for y in 0..rect.height {
        for x in 0..rect.width {
            let m = mask.get(x, y);
            let src = resized.get_pixel(x, y).0;
            let dst = canvas.get_pixel_mut(rect.x + x, rect.y + y);
            for channel in 0..3 {
                let s = src[channel] as f32 / 255.0;
                let d = dst.0[channel] as f32 / 255.0;
                let blended = s * m + d * (1.0 - m);
                dst.0[channel] = (blended * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_mask_spans_unit_range() {
        let mask = FeatherMask::new(100, 120);
        let min = mask.values.iter().copied().fold(f32::MAX, f32::min);
        let max = mask.values.iter().copied().fold(f32::MIN, f32::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
        assert!(mask.values.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_mask_interior_near_one_corners_near_zero() {
        let mask = FeatherMask::new(80, 80);
        assert!(mask.get(40, 40) > 0.99);
        assert_eq!(mask.get(0, 0), 0.0);
        assert!(mask.get(79, 79) < 0.01);
    }

    #[test]
    fn test_mask_monotonic_along_axes_and_diagonal() {
        let mask = FeatherMask::new(90, 70);
        let (cx, cy) = (45u32, 35u32);

        // Center to right edge
        let mut prev = mask.get(cx, cy);
        for x in cx..90 {
            let v = mask.get(x, cy);
            assert!(v <= prev + 1e-6);
            prev = v;
        }

        // Center to bottom edge
        let mut prev = mask.get(cx, cy);
        for y in cy..70 {
            let v = mask.get(cx, y);
            assert!(v <= prev + 1e-6);
            prev = v;
        }

        // Center toward the top-left corner
        let mut prev = mask.get(cx, cy);
        for step in 0..35 {
            let v = mask.get(cx - step, cy - step);
            assert!(v <= prev + 1e-6);
            prev = v;
        }
    }

    #[test]
    fn test_mask_radius_scales_with_width() {
        // width / 20 above the floor, floor of 3 below it
        let wide = FeatherMask::new(200, 50);
        let narrow = FeatherMask::new(40, 50);
        assert_eq!(wide.width(), 200);
        assert_eq!(narrow.width(), 40);

        // Wider rect feathers over more pixels: value at a fixed small
        // inset is further from 1 for the wide mask
        assert!(wide.get(4, 25) < narrow.get(4, 25));
    }

    #[test]
    fn test_degenerate_mask_is_opaque() {
        let mask = FeatherMask::with_radius(1, 1, 3);
        assert_eq!(mask.get(0, 0), 1.0);
    }

    #[test]
    fn test_composite_leaves_outside_untouched() {
        let mut canvas = RgbImage::from_pixel(100, 100, Rgb([10, 20, 30]));
        let enhanced = RgbImage::from_pixel(40, 40, Rgb([250, 240, 230]));
        let rect = Rect::new(30, 30, 40, 40);

        composite_feathered(&enhanced, rect, &mut canvas);

        for (x, y, pixel) in canvas.enumerate_pixels() {
            let inside = x >= 30 && x < 70 && y >= 30 && y < 70;
            if !inside {
                assert_eq!(pixel, &Rgb([10, 20, 30]), "pixel ({x},{y}) modified");
            }
        }
    }

    #[test]
    fn test_composite_endpoints() {
        let mut canvas = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let enhanced = RgbImage::from_pixel(60, 60, Rgb([255, 255, 255]));
        let rect = Rect::new(20, 20, 60, 60);

        composite_feathered(&enhanced, rect, &mut canvas);

        // Mask ~1 at the center: enhanced content wins
        assert!(canvas.get_pixel(50, 50).0[0] > 250);
        // Mask ~0 at the rect corner: original content survives
        assert!(canvas.get_pixel(20, 20).0[0] < 5);
    }

    #[test]
    fn test_composite_resizes_higher_resolution_region() {
        let mut canvas = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        // Region at 2x the rect footprint
        let enhanced = RgbImage::from_pixel(80, 80, Rgb([200, 200, 200]));
        let rect = Rect::new(30, 30, 40, 40);

        composite_feathered(&enhanced, rect, &mut canvas);

        assert!(canvas.get_pixel(50, 50).0[0] > 190);
        assert_eq!(canvas.get_pixel(0, 0).0[0], 0);
    }
}
