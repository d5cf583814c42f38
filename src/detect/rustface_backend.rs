//! Face detector backed by the `rustface` crate (SeetaFace engine).

use std::io::Cursor;
use std::path::Path;

use image::GrayImage;

use super::types::{DetectError, FaceDetector, Result};
use crate::geometry::Rect;

// ============================================================
// Constants
// ============================================================

/// Minimum detectable face size in pixels (both axes)
const MIN_FACE_SIZE: u32 = 40;

/// Multi-scale search step factor between pyramid levels
const SCALE_STEP: f32 = 1.2;

/// Detection score threshold (analog of a neighbor-vote count)
const SCORE_THRESHOLD: f64 = 5.0;

/// Sliding window step in pixels (both axes)
const SLIDE_WINDOW_STEP: u32 = 4;

// ============================================================
// Detector
// ============================================================

/// SeetaFace frontal-face detector loaded from a model file on disk.
///
/// The loaded model is immutable and cheap to clone; a fresh `rustface`
/// detector is built per call because detection needs `&mut`.
pub struct SeetaFaceDetector {
    model: rustface::Model,
}

impl SeetaFaceDetector {
    /// Load the SeetaFace model from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DetectError::ModelNotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path)?;
        let model = rustface::read_model(Cursor::new(data))
            .map_err(|e| DetectError::ModelLoad(format!("{e:?}")))?;

        Ok(Self { model })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&self, gray: &GrayImage) -> Vec<Rect> {
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(1.0 / SCALE_STEP);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                Rect::from_detection(
                    bbox.x() as i64,
                    bbox.y() as i64,
                    bbox.width(),
                    bbox.height(),
                    width,
                    height,
                )
            })
            .collect()
    }
}
