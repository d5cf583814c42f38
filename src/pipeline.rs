//! End-to-end face enhancement pipeline.
//!
//! Wires the stages together in strict forward order: locate → expand →
//! resolution enhance → tone enhance → feathered composite. Each stage
//! consumes its own buffer; only the final composite writes into a working
//! copy of the full-resolution image.

use image::imageops;
use image::RgbImage;
use tracing::{debug, info};

use crate::composite;
use crate::detect::{self, FaceDetector};
use crate::geometry::Rect;
use crate::superres::{self, Upsampler};
use crate::tone;

// ============================================================
// Constants
// ============================================================

/// Default sharpen amount
const DEFAULT_SHARPEN_AMOUNT: f32 = 1.0;

/// Default super-resolution scale factor
const DEFAULT_SR_SCALE: f32 = 2.0;

// ============================================================
// Options
// ============================================================

/// Numeric parameters consumed by the pipeline.
///
/// The pipeline is pure given an image and these options; there is no
/// hidden state and no cross-invocation cache.
#[derive(Debug, Clone, Copy)]
pub struct EnhanceOptions {
    /// Unsharp-mask strength (0 disables sharpening; 0-3 typical)
    pub sharpen_amount: f32,
    /// Requested super-resolution scale factor (>= 1.0)
    pub sr_scale: f32,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            sharpen_amount: DEFAULT_SHARPEN_AMOUNT,
            sr_scale: DEFAULT_SR_SCALE,
        }
    }
}

impl EnhanceOptions {
    /// Create a builder
    pub fn builder() -> EnhanceOptionsBuilder {
        EnhanceOptionsBuilder::default()
    }
}

/// Builder for EnhanceOptions
#[derive(Debug, Default)]
pub struct EnhanceOptionsBuilder {
    options: EnhanceOptions,
}

impl EnhanceOptionsBuilder {
    /// Set sharpen amount (floored at 0)
    #[must_use]
    pub fn sharpen_amount(mut self, amount: f32) -> Self {
        self.options.sharpen_amount = amount.max(0.0);
        self
    }

    /// Set super-resolution scale (floored at 1.0)
    #[must_use]
    pub fn sr_scale(mut self, scale: f32) -> Self {
        self.options.sr_scale = scale.max(1.0);
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> EnhanceOptions {
        self.options
    }
}

// ============================================================
// Outcome
// ============================================================

/// Result of one pipeline invocation.
#[derive(Debug)]
pub struct EnhanceOutcome {
    /// Full-resolution output image
    pub image: RgbImage,
    /// The enhanced (expanded) region, or `None` when no face was found
    /// and the output is the input unchanged
    pub region: Option<Rect>,
    /// Scale factor actually applied during resolution enhancement
    pub effective_scale: f32,
}

impl EnhanceOutcome {
    /// Whether any enhancement was applied.
    pub fn was_enhanced(&self) -> bool {
        self.region.is_some()
    }
}

// ============================================================
// Pipeline
// ============================================================

/// Face enhancement pipeline over a detector and an optional upsampler.
pub struct EnhancePipeline {
    options: EnhanceOptions,
    detector: Box<dyn FaceDetector>,
    upsampler: Option<Box<dyn Upsampler>>,
}

impl EnhancePipeline {
    /// Create a pipeline with the given detector and options.
    pub fn new(detector: Box<dyn FaceDetector>, options: EnhanceOptions) -> Self {
        Self {
            options,
            detector,
            upsampler: None,
        }
    }

    /// Attach a learned upsampling model.
    #[must_use]
    pub fn with_upsampler(mut self, upsampler: Box<dyn Upsampler>) -> Self {
        self.upsampler = Some(upsampler);
        self
    }

    pub fn options(&self) -> &EnhanceOptions {
        &self.options
    }

    /// Enhance the most salient face in `image`.
    ///
    /// Finding no face is a normal outcome: the returned image is then the
    /// input unchanged and [`EnhanceOutcome::region`] is `None`. A failing
    /// upsampling model never surfaces here; the resolution stage falls
    /// back to bicubic interpolation internally.
    pub fn enhance(&self, image: &RgbImage) -> EnhanceOutcome {
        let Some(face) = detect::locate_face(image, self.detector.as_ref()) else {
            info!("No face detected; passing the image through unchanged");
            return EnhanceOutcome {
                image: image.clone(),
                region: None,
                effective_scale: 1.0,
            };
        };

        let roi = face.expanded(image.width(), image.height());
        debug!(
            face.x, face.y, face.width, face.height,
            roi.x, roi.y, roi.width, roi.height,
            "face located"
        );

        let region = imageops::crop_imm(image, roi.x, roi.y, roi.width, roi.height).to_image();

        let (upsampled, effective_scale) = superres::enhance_resolution(
            &region,
            self.options.sr_scale,
            self.upsampler.as_deref(),
        );
        let toned = tone::enhance_tone(&upsampled, self.options.sharpen_amount);

        let mut canvas = image.clone();
        composite::composite_feathered(&toned, roi, &mut canvas);

        EnhanceOutcome {
            image: canvas,
            region: Some(roi),
            effective_scale,
        }
    }
}
