//! Color-aware non-local-means denoising.
//!
//! Patch similarity is measured jointly across luma and chroma so that the
//! weighting never treats channels independently, which is what produces
//! color fringing in per-channel denoisers. Patch distances are evaluated
//! with one integral image per search offset, keeping the template window
//! cost constant per pixel.

use image::RgbImage;

use super::clahe::rgb_to_ycbcr;

// ============================================================
// Constants
// ============================================================

/// Template (patch) window side length in pixels
const TEMPLATE_WINDOW: usize = 7;

/// Search window side length in pixels
const SEARCH_WINDOW: usize = 21;

/// Filter strength applied to luma differences
const LUMA_STRENGTH: f32 = 3.0;

/// Filter strength applied to chroma differences
const COLOR_STRENGTH: f32 = 3.0;

// ============================================================
// Denoising
// ============================================================

/// Apply mild non-local-means denoising to a region.
///
/// Intended to run after contrast equalization, which amplifies sensor
/// noise in flat areas. Strength constants are tuned to clean that up
/// without flattening facial texture.
pub fn denoise(region: &RgbImage) -> RgbImage {
    let (width, height) = region.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return region.clone();
    }

    let search_pad = (SEARCH_WINDOW / 2) as i64;
    let template_pad = (TEMPLATE_WINDOW / 2) as i64;

    // Decompose once; patch distances are computed in YCbCr
    let mut luma = vec![0.0f32; w * h];
    let mut cb = vec![0.0f32; w * h];
    let mut cr = vec![0.0f32; w * h];
    for (i, pixel) in region.pixels().enumerate() {
        let (y, pcb, pcr) = rgb_to_ycbcr(
            pixel.0[0] as f32,
            pixel.0[1] as f32,
            pixel.0[2] as f32,
        );
        luma[i] = y;
        cb[i] = pcb;
        cr[i] = pcr;
    }

    let luma_norm = LUMA_STRENGTH * LUMA_STRENGTH;
    let color_norm = COLOR_STRENGTH * COLOR_STRENGTH;

    let mut weight_sum = vec![0.0f32; w * h];
    let mut accum = vec![[0.0f32; 3]; w * h];
    let mut diff = vec![0.0f32; w * h];
    let mut integral = vec![0.0f64; (w + 1) * (h + 1)];

    let clamp_x = |x: i64| x.clamp(0, w as i64 - 1) as usize;
    let clamp_y = |y: i64| y.clamp(0, h as i64 - 1) as usize;

    for dy in -search_pad..=search_pad {
        for dx in -search_pad..=search_pad {
            // Normalized squared difference plane for this offset
            for y in 0..h {
                let qy = clamp_y(y as i64 + dy);
                for x in 0..w {
                    let qx = clamp_x(x as i64 + dx);
                    let p = y * w + x;
                    let q = qy * w + qx;
                    let dl = luma[p] - luma[q];
                    let dcb = cb[p] - cb[q];
                    let dcr = cr[p] - cr[q];
                    diff[p] = dl * dl / luma_norm + (dcb * dcb + dcr * dcr) / color_norm;
                }
            }

            build_integral(&diff, w, h, &mut integral);

            for y in 0..h {
                let y0 = (y as i64 - template_pad).max(0) as usize;
                let y1 = ((y as i64 + template_pad) as usize).min(h - 1) + 1;
                let qy = clamp_y(y as i64 + dy);

                for x in 0..w {
                    let x0 = (x as i64 - template_pad).max(0) as usize;
                    let x1 = ((x as i64 + template_pad) as usize).min(w - 1) + 1;

                    let patch_sum = window_sum(&integral, w, x0, y0, x1, y1);
                    let patch_area = ((x1 - x0) * (y1 - y0)) as f64;
                    let weight = (-(patch_sum / patch_area) as f32).exp();

                    let qx = clamp_x(x as i64 + dx);
                    let contribution = region.get_pixel(qx as u32, qy as u32).0;
                    let p = y * w + x;
                    weight_sum[p] += weight;
                    for channel in 0..3 {
                        accum[p][channel] += weight * contribution[channel] as f32;
                    }
                }
            }
        }
    }

    let mut output = RgbImage::new(width, height);
    for (i, pixel) in output.pixels_mut().enumerate() {
        for channel in 0..3 {
            let v = accum[i][channel] / weight_sum[i];
            pixel.0[channel] = v.clamp(0.0, 255.0).round() as u8;
        }
    }

    output
}

/// Summed-area table with a zero first row and column.
fn build_integral(data: &[f32], w: usize, h: usize, integral: &mut [f64]) {
    let stride = w + 1;
    for v in integral[..stride].iter_mut() {
        *v = 0.0;
    }
    for y in 0..h {
        let mut row_sum = 0.0f64;
        integral[(y + 1) * stride] = 0.0;
        for x in 0..w {
            row_sum += data[y * w + x] as f64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
}

/// Sum of `data[y0..y1, x0..x1]` from its summed-area table.
fn window_sum(integral: &[f64], w: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
    let stride = w + 1;
    integral[y1 * stride + x1] + integral[y0 * stride + x0]
        - integral[y0 * stride + x1]
        - integral[y1 * stride + x0]
}
