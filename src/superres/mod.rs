//! Region resolution enhancement.
//!
//! Prefers a learned upsampling model when one is supplied, falling back to
//! deterministic bicubic interpolation whenever the model is absent or
//! fails. Model failures are logged and swallowed here; resolution
//! enhancement is best-effort by contract and never aborts the run.

mod rten_backend;
mod types;

// Re-export public API
pub use rten_backend::RtenUpsampler;
pub use types::{ModelFamily, Result, SuperResError, Upsampler};

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::warn;

// ============================================================
// Constants
// ============================================================

/// Minimum requested scale at which a supplied model is engaged
const MODEL_MIN_SCALE: f32 = 1.5;

/// Requested scales at or below this pass through unresampled
const PASSTHROUGH_MAX_SCALE: f32 = 1.01;

// ============================================================
// Enhancement
// ============================================================

/// Increase the pixel resolution of a face region.
///
/// Decision order:
/// 1. model supplied and `scale >= 1.5`: run the model at its fixed
///    integer factor;
/// 2. model failed: log a diagnostic, bicubic at the requested scale;
/// 3. no model engaged and `scale > 1.01`: bicubic at the requested scale;
/// 4. otherwise: pass through unchanged (resampling at unity scale only
///    adds blur).
///
/// Returns the enhanced region together with the effective scale factor
/// actually applied.
pub fn enhance_resolution(
    region: &RgbImage,
    scale: f32,
    upsampler: Option<&dyn Upsampler>,
) -> (RgbImage, f32) {
    if let Some(upsampler) = upsampler {
        if scale >= MODEL_MIN_SCALE {
            match upsampler.upsample(region) {
                Ok(upsampled) => return (upsampled, upsampler.scale() as f32),
                Err(e) => {
                    warn!("Super-resolution failed: {e}. Using bicubic.");
                    return (bicubic_resize(region, scale), scale);
                }
            }
        }
    }

    if scale > PASSTHROUGH_MAX_SCALE {
        (bicubic_resize(region, scale), scale)
    } else {
        (region.clone(), 1.0)
    }
}

/// Deterministic bicubic-family resize by a uniform scale factor.
pub fn bicubic_resize(region: &RgbImage, scale: f32) -> RgbImage {
    let (width, height) = region.dimensions();
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);
    imageops::resize(region, new_width, new_height, FilterType::CatmullRom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Upsampler that always fails, for exercising the fallback branch.
    struct BrokenUpsampler;

    impl Upsampler for BrokenUpsampler {
        fn scale(&self) -> u32 {
            2
        }

        fn upsample(&self, _region: &RgbImage) -> Result<RgbImage> {
            Err(SuperResError::Inference("deliberately broken".to_string()))
        }
    }

    /// Upsampler that doubles dimensions with nearest-neighbor fill.
    struct DoublingUpsampler;

    impl Upsampler for DoublingUpsampler {
        fn scale(&self) -> u32 {
            2
        }

        fn upsample(&self, region: &RgbImage) -> Result<RgbImage> {
            let (w, h) = region.dimensions();
            Ok(RgbImage::from_fn(w * 2, h * 2, |x, y| {
                *region.get_pixel(x / 2, y / 2)
            }))
        }
    }

    fn gradient_region(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_bicubic_dimensions_across_scales() {
        let region = gradient_region(60, 40);
        for scale in [1.0f32, 1.5, 2.0, 3.0, 4.0] {
            let resized = bicubic_resize(&region, scale);
            assert_eq!(resized.width(), (60.0 * scale).round() as u32);
            assert_eq!(resized.height(), (40.0 * scale).round() as u32);
        }
    }

    #[test]
    fn test_unity_scale_without_model_is_passthrough() {
        let region = gradient_region(50, 50);
        let (out, effective) = enhance_resolution(&region, 1.0, None);
        assert_eq!(effective, 1.0);
        assert_eq!(out, region);
    }

    #[test]
    fn test_plain_bicubic_path() {
        let region = gradient_region(50, 40);
        let (out, effective) = enhance_resolution(&region, 2.0, None);
        assert_eq!(effective, 2.0);
        assert_eq!(out.dimensions(), (100, 80));
    }

    #[test]
    fn test_model_path_uses_model_scale() {
        let region = gradient_region(30, 30);
        let upsampler = DoublingUpsampler;
        let (out, effective) = enhance_resolution(&region, 2.0, Some(&upsampler));
        assert_eq!(effective, 2.0);
        assert_eq!(out.dimensions(), (60, 60));
    }

    #[test]
    fn test_model_ignored_below_engagement_threshold() {
        // Model present but scale < 1.5: deterministic path, not the model
        let region = gradient_region(40, 40);
        let upsampler = BrokenUpsampler;
        let (out, effective) = enhance_resolution(&region, 1.2, Some(&upsampler));
        assert_eq!(effective, 1.2);
        assert_eq!(out.dimensions(), (48, 48));
    }

    #[test]
    fn test_broken_model_falls_back_to_bicubic() {
        let region = gradient_region(40, 30);
        let upsampler = BrokenUpsampler;
        let (out, effective) = enhance_resolution(&region, 2.0, Some(&upsampler));

        // Fallback applies the requested scale, not the model's
        assert_eq!(effective, 2.0);
        assert_eq!(out.dimensions(), (80, 60));
        assert_eq!(out, bicubic_resize(&region, 2.0));
    }

    #[test]
    fn test_output_never_smaller_than_input() {
        let region = gradient_region(33, 21);
        for scale in [1.0f32, 1.01, 1.5, 2.5] {
            let (out, _) = enhance_resolution(&region, scale, None);
            assert!(out.width() >= region.width());
            assert!(out.height() >= region.height());
        }
    }
}
