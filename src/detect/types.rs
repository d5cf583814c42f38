//! Common types for the detect module

use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::Rect;
use image::GrayImage;

/// Face detection error types
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Detector model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Failed to load detector model: {0}")]
    ModelLoad(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DetectError>;

/// Pluggable face detection backend.
///
/// The pipeline only ever sees this trait; swap in a different detector
/// family without touching any downstream stage.
pub trait FaceDetector: Send + Sync {
    /// Detect candidate face boxes in a preprocessed grayscale image.
    ///
    /// Returned rects are clipped to the image bounds. An empty vector is a
    /// normal outcome, not an error.
    fn detect(&self, gray: &GrayImage) -> Vec<Rect>;
}
