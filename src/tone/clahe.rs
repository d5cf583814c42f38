//! Contrast-limited adaptive histogram equalization on the luma channel.
//!
//! The region is converted to YCbCr, the Y plane is equalized per tile with
//! a clip limit and bilinear interpolation between tile lookup tables, and
//! the untouched chroma planes are recombined. Keeping chroma out of the
//! equalization avoids color-channel artifacts.

use image::RgbImage;

// ============================================================
// Constants
// ============================================================

/// Tile grid size (tiles per axis)
const TILE_GRID: usize = 8;

/// Clip limit as a multiple of the mean histogram bin height
const CLIP_LIMIT: f32 = 2.0;

// ============================================================
// Color conversion (full-range BT.601)
// ============================================================

pub(crate) fn rgb_to_ycbcr(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    (y, cb, cr)
}

pub(crate) fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> (f32, f32, f32) {
    let r = y + 1.402 * (cr - 128.0);
    let g = y - 0.344_136 * (cb - 128.0) - 0.714_136 * (cr - 128.0);
    let b = y + 1.772 * (cb - 128.0);
    (r, g, b)
}

// ============================================================
// Equalization
// ============================================================

/// Apply contrast-limited adaptive histogram equalization to the luma
/// channel of a region, leaving chroma untouched.
pub fn equalize_luma(region: &RgbImage) -> RgbImage {
    let (width, height) = region.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return region.clone();
    }

    let mut luma = vec![0u8; w * h];
    let mut cb = vec![0.0f32; w * h];
    let mut cr = vec![0.0f32; w * h];
    for (i, pixel) in region.pixels().enumerate() {
        let (y, pcb, pcr) = rgb_to_ycbcr(
            pixel.0[0] as f32,
            pixel.0[1] as f32,
            pixel.0[2] as f32,
        );
        luma[i] = y.clamp(0.0, 255.0).round() as u8;
        cb[i] = pcb;
        cr[i] = pcr;
    }

    let equalized = clahe(&luma, w, h);

    let mut output = RgbImage::new(width, height);
    for (i, pixel) in output.pixels_mut().enumerate() {
        let (r, g, b) = ycbcr_to_rgb(equalized[i] as f32, cb[i], cr[i]);
        pixel.0[0] = r.clamp(0.0, 255.0).round() as u8;
        pixel.0[1] = g.clamp(0.0, 255.0).round() as u8;
        pixel.0[2] = b.clamp(0.0, 255.0).round() as u8;
    }

    output
}

/// CLAHE over a single plane: per-tile clipped histograms, per-tile
/// equalization LUTs, bilinear interpolation between neighboring LUTs.
fn clahe(plane: &[u8], width: usize, height: usize) -> Vec<u8> {
    let tiles_x = TILE_GRID.min(width).max(1);
    let tiles_y = TILE_GRID.min(height).max(1);

    // One equalization LUT per tile; the plane is partitioned evenly so
    // every tile is non-empty and the last row/column never overshoots
    let mut luts = vec![[0u8; 256]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        let y0 = ty * height / tiles_y;
        let y1 = (ty + 1) * height / tiles_y;
        for tx in 0..tiles_x {
            let x0 = tx * width / tiles_x;
            let x1 = (tx + 1) * width / tiles_x;

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[plane[y * width + x] as usize] += 1;
                }
            }

            let total = ((x1 - x0) * (y1 - y0)) as u32;
            luts[ty * tiles_x + tx] = build_clipped_lut(&hist, total);
        }
    }

    // Map each pixel through the four surrounding tile LUTs, keyed off
    // the same even partition (tile centers at (t + 0.5) * dim / tiles)
    let tile_w = width as f32 / tiles_x as f32;
    let tile_h = height as f32 / tiles_y as f32;

    let mut output = vec![0u8; width * height];
    for y in 0..height {
        let fy = (y as f32 + 0.5) / tile_h - 0.5;
        let ty0 = fy.floor().clamp(0.0, (tiles_y - 1) as f32) as usize;
        let ty1 = (ty0 + 1).min(tiles_y - 1);
        let wy = (fy - ty0 as f32).clamp(0.0, 1.0);

        for x in 0..width {
            let fx = (x as f32 + 0.5) / tile_w - 0.5;
            let tx0 = fx.floor().clamp(0.0, (tiles_x - 1) as f32) as usize;
            let tx1 = (tx0 + 1).min(tiles_x - 1);
            let wx = (fx - tx0 as f32).clamp(0.0, 1.0);

            let v = plane[y * width + x] as usize;
            let tl = luts[ty0 * tiles_x + tx0][v] as f32;
            let tr = luts[ty0 * tiles_x + tx1][v] as f32;
            let bl = luts[ty1 * tiles_x + tx0][v] as f32;
            let br = luts[ty1 * tiles_x + tx1][v] as f32;

            let top = tl * (1.0 - wx) + tr * wx;
            let bottom = bl * (1.0 - wx) + br * wx;
            output[y * width + x] = (top * (1.0 - wy) + bottom * wy).round() as u8;
        }
    }

    output
}

/// Equalization LUT from a histogram clipped at `CLIP_LIMIT` times the
/// mean bin height, with the clipped excess redistributed uniformly.
fn build_clipped_lut(hist: &[u32; 256], total: u32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if total == 0 {
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let clip = ((CLIP_LIMIT * total as f32 / 256.0).round() as u32).max(1);

    let mut clipped = [0u32; 256];
    let mut excess = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        if count > clip {
            clipped[i] = clip;
            excess += count - clip;
        } else {
            clipped[i] = count;
        }
    }

    let bonus = excess / 256;
    for count in &mut clipped {
        *count += bonus;
    }

    let mut cumulative = 0u32;
    let redistributed: u32 = clipped.iter().sum();
    for (i, &count) in clipped.iter().enumerate() {
        cumulative += count;
        lut[i] = (cumulative as f32 / redistributed as f32 * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8;
    }

    lut
}
