//! Common types for the superres module

use std::path::PathBuf;
use thiserror::Error;

use image::RgbImage;

/// Super-resolution error types
///
/// These never escape [`super::enhance_resolution`]; every failure is
/// converted into the bicubic fallback path.
#[derive(Debug, Error)]
pub enum SuperResError {
    #[error("Upsampling model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Failed to load upsampling model: {0}")]
    ModelLoad(String),

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Model produced unusable output: {0}")]
    BadOutput(String),
}

pub type Result<T> = std::result::Result<T, SuperResError>;

// ============================================================
// Model family
// ============================================================

/// Known super-resolution model families.
///
/// Resolved once at model-load time from the model file name; the pipeline
/// only ever consumes the already-resolved variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelFamily {
    /// Enhanced Deep Super-Resolution
    #[default]
    Edsr,

    /// Laplacian Pyramid Super-Resolution Network
    LapSrn,

    /// Unrecognized family; treated like EDSR
    Unknown,
}

impl ModelFamily {
    /// Sniff the family from a model file name.
    pub fn from_model_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("edsr") {
            ModelFamily::Edsr
        } else if lower.contains("lapsrn") {
            ModelFamily::LapSrn
        } else {
            ModelFamily::Unknown
        }
    }

    /// Integer scale factors the family supports.
    pub fn supported_scales(&self) -> &'static [u32] {
        match self {
            ModelFamily::Edsr | ModelFamily::Unknown => &[2, 3, 4],
            ModelFamily::LapSrn => &[2, 4, 8],
        }
    }

    /// The supported integer scale nearest to `requested`.
    ///
    /// Ties resolve toward the smaller factor.
    pub fn nearest_supported_scale(&self, requested: f32) -> u32 {
        let scales = self.supported_scales();
        let mut best = scales[0];
        let mut best_dist = (best as f32 - requested).abs();
        for &scale in &scales[1..] {
            let dist = (scale as f32 - requested).abs();
            if dist < best_dist {
                best = scale;
                best_dist = dist;
            }
        }
        best
    }
}

// ============================================================
// Upsampler trait
// ============================================================

/// Learned upsampling backend.
///
/// A handle is constructed by the model loader with its scale factor
/// already fixed; `upsample` either produces a region enlarged by exactly
/// that factor or reports why it could not.
pub trait Upsampler: Send + Sync {
    /// The integer scale factor this handle produces.
    fn scale(&self) -> u32;

    /// Upsample `region` by [`Upsampler::scale`].
    fn upsample(&self, region: &RgbImage) -> Result<RgbImage>;
}
