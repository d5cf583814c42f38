//! Unsharp-mask sharpening.
//!
//! `out = in * (1 + amount) - blurred * amount`, with the Gaussian kernel
//! size stepping up alongside the sharpen amount so stronger settings also
//! enhance larger-scale edges.

use image::RgbImage;

// ============================================================
// Constants
// ============================================================

/// Sharpen amounts below this use a 3-tap kernel
const KERNEL_5_THRESHOLD: f32 = 0.75;

/// Sharpen amounts below this (and at least 0.75) use a 5-tap kernel
const KERNEL_7_THRESHOLD: f32 = 1.5;

/// Sharpen amounts below this (and at least 1.5) use a 7-tap kernel
const KERNEL_9_THRESHOLD: f32 = 2.5;

// ============================================================
// Sharpening
// ============================================================

/// Kernel size selected for a sharpen amount.
pub fn kernel_size_for_amount(amount: f32) -> usize {
    if amount < KERNEL_5_THRESHOLD {
        3
    } else if amount < KERNEL_7_THRESHOLD {
        5
    } else if amount < KERNEL_9_THRESHOLD {
        7
    } else {
        9
    }
}

/// Apply unsharp-mask sharpening to a region.
///
/// Amounts at or below zero pass the region through unchanged.
pub fn unsharp_mask(region: &RgbImage, amount: f32) -> RgbImage {
    if amount <= 0.0 {
        return region.clone();
    }

    let (width, height) = region.dimensions();
    let size = kernel_size_for_amount(amount);
    let kernel = gaussian_kernel(size, sigma_for_kernel(size));

    let mut output = region.clone();
    for channel in 0..3 {
        let original: Vec<f32> = region.pixels().map(|p| p.0[channel] as f32).collect();
        let blurred = convolve_separable(&original, width, height, &kernel);

        for (i, pixel) in output.pixels_mut().enumerate() {
            let sharpened = original[i] * (1.0 + amount) - blurred[i] * amount;
            pixel.0[channel] = sharpened.round().clamp(0.0, 255.0) as u8;
        }
    }

    output
}

/// Sigma matched to a kernel size so the kernel captures ~3 sigma per side.
fn sigma_for_kernel(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
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

/// Separable 2D convolution with replicated borders
fn convolve_separable(data: &[f32], width: u32, height: u32, kernel: &[f32]) -> Vec<f32> {
    let w = width as usize;
    let h = height as usize;
    let k_half = kernel.len() / 2;

    // Horizontal pass
    let mut temp = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = (x as i32 + ki as i32 - k_half as i32).clamp(0, w as i32 - 1) as usize;
                sum += data[y * w + sx] * kv;
            }
            temp[y * w + x] = sum;
        }
    }

    // Vertical pass
    let mut result = vec![0.0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = (y as i32 + ki as i32 - k_half as i32).clamp(0, h as i32 - 1) as usize;
                sum += temp[sy * w + x] * kv;
            }
            result[y * w + x] = sum;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_kernel_size_thresholds() {
        assert_eq!(kernel_size_for_amount(0.1), 3);
        assert_eq!(kernel_size_for_amount(0.74), 3);
        assert_eq!(kernel_size_for_amount(0.75), 5);
        assert_eq!(kernel_size_for_amount(1.49), 5);
        assert_eq!(kernel_size_for_amount(1.5), 7);
        assert_eq!(kernel_size_for_amount(2.49), 7);
        assert_eq!(kernel_size_for_amount(2.5), 9);
        assert_eq!(kernel_size_for_amount(3.0), 9);
    }

    #[test]
    fn test_zero_amount_is_passthrough() {
        let region = RgbImage::from_fn(20, 20, |x, y| Rgb([x as u8, y as u8, 100]));
        assert_eq!(unsharp_mask(&region, 0.0), region);
        assert_eq!(unsharp_mask(&region, -1.0), region);
    }

    #[test]
    fn test_dimensions_preserved() {
        let region = RgbImage::from_pixel(31, 17, Rgb([90, 90, 90]));
        let sharpened = unsharp_mask(&region, 1.0);
        assert_eq!(sharpened.dimensions(), (31, 17));
    }

    #[test]
    fn test_flat_region_unchanged() {
        // No edges: original equals its own blur, so the mask is a no-op
        let region = RgbImage::from_pixel(20, 20, Rgb([90, 130, 200]));
        assert_eq!(unsharp_mask(&region, 1.0), region);
    }

    #[test]
    fn test_edge_contrast_increases() {
        let mut region = RgbImage::from_pixel(40, 40, Rgb([80, 80, 80]));
        for y in 0..40 {
            for x in 20..40 {
                region.put_pixel(x, y, Rgb([180, 180, 180]));
            }
        }

        let sharpened = unsharp_mask(&region, 1.5);

        // Dark side of the edge overshoots darker, bright side brighter
        assert!(sharpened.get_pixel(19, 20).0[0] <= region.get_pixel(19, 20).0[0]);
        assert!(sharpened.get_pixel(20, 20).0[0] >= region.get_pixel(20, 20).0[0]);
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        for size in [3usize, 5, 7, 9] {
            let kernel = gaussian_kernel(size, sigma_for_kernel(size));
            assert_eq!(kernel.len(), size);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4);
            // Center tap dominates
            assert!(kernel[size / 2] > kernel[0]);
        }
    }
}
