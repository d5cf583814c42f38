//! Tone correction for the upsampled face region.
//!
//! Three pure stages in fixed order:
//!
//! 1. **Unsharp mask** ([`unsharp_mask`]) - edge contrast, kernel size
//!    stepped by sharpen amount
//! 2. **Luma equalization** ([`equalize_luma`]) - CLAHE on the Y channel
//!    only, chroma untouched
//! 3. **Denoise** ([`denoise`]) - joint-channel non-local means
//!
//! Sharpening runs before equalization so it never amplifies equalization
//! noise; denoising runs last to clean up after both.

mod clahe;
mod denoise;
mod unsharp;

// Re-export public API
pub use clahe::equalize_luma;
pub use denoise::denoise;
pub use unsharp::{kernel_size_for_amount, unsharp_mask};

use image::RgbImage;

/// Run the full tone-correction sequence over a region.
pub fn enhance_tone(region: &RgbImage, sharpen_amount: f32) -> RgbImage {
    let sharpened = unsharp_mask(region, sharpen_amount);
    let equalized = equalize_luma(&sharpened);
    denoise(&equalized)
}
