//! Face region location.
//!
//! Runs a pluggable detector over a normalized grayscale view of the image
//! and selects the single largest candidate box.
//!
//! # Features
//!
//! - **Detector trait** ([`FaceDetector`]) - swap detector families freely
//! - **SeetaFace backend** ([`SeetaFaceDetector`]) - default implementation
//! - **Largest-candidate selection** with a deterministic tie-break

mod rustface_backend;
mod types;

// Re-export public API
pub use rustface_backend::SeetaFaceDetector;
pub use types::{DetectError, FaceDetector, Result};

use image::imageops::grayscale;
use image::RgbImage;
use imageproc::contrast::equalize_histogram;

use crate::geometry::Rect;

/// Locate the most salient face in `image`.
///
/// The image is reduced to luma and histogram-equalized first so detection
/// quality does not swing with exposure differences between inputs. Returns
/// `None` when the detector reports no candidates; the caller is expected
/// to pass the original image through unchanged in that case.
pub fn locate_face(image: &RgbImage, detector: &dyn FaceDetector) -> Option<Rect> {
    let gray = grayscale(image);
    let equalized = equalize_histogram(&gray);

    let candidates = detector.detect(&equalized);
    pick_largest(&candidates)
}

/// Select the candidate with the largest area.
///
/// Ties on area break toward the lowest `y`, then the lowest `x`, so the
/// result never depends on the detector's iteration order.
pub fn pick_largest(candidates: &[Rect]) -> Option<Rect> {
    candidates
        .iter()
        .copied()
        .max_by(|a, b| {
            a.area()
                .cmp(&b.area())
                .then(b.y.cmp(&a.y))
                .then(b.x.cmp(&a.x))
        })
}
