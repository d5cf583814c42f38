//! facelift - face-targeted photo enhancement
//!
//! Locates the most salient face in a still image, regenerates that region
//! at higher fidelity (learned super-resolution when a model is supplied,
//! bicubic interpolation otherwise), applies sharpening, local contrast
//! equalization and denoising, and composites the result back into the
//! original with a radially feathered blend so no seam is visible.
//!
//! # Pipeline
//!
//! Locator → Expander → ResolutionEnhancer → ToneEnhancer →
//! FeatherCompositor, strictly forward, single-threaded, one buffer per
//! stage.
//!
//! # Example
//!
//! ```rust,no_run
//! use facelift::{EnhanceOptions, EnhancePipeline, SeetaFaceDetector};
//! use std::path::Path;
//!
//! let detector = SeetaFaceDetector::from_file(Path::new("seeta_fd_frontal_v1.0.bin")).unwrap();
//! let pipeline = EnhancePipeline::new(Box::new(detector), EnhanceOptions::default());
//!
//! let image = image::open("portrait.jpg").unwrap().to_rgb8();
//! let outcome = pipeline.enhance(&image);
//! if outcome.was_enhanced() {
//!     outcome.image.save("enhanced.png").unwrap();
//! }
//! ```

pub mod cli;
pub mod composite;
pub mod config;
pub mod detect;
pub mod geometry;
pub mod pipeline;
pub mod superres;
pub mod tone;

// Re-export public API
pub use cli::Cli;
pub use composite::{composite_feathered, FeatherMask};
pub use config::{CliOverrides, Config, ConfigError};
pub use detect::{locate_face, DetectError, FaceDetector, SeetaFaceDetector};
pub use geometry::Rect;
pub use pipeline::{EnhanceOptions, EnhanceOutcome, EnhancePipeline};
pub use superres::{
    bicubic_resize, enhance_resolution, ModelFamily, RtenUpsampler, SuperResError, Upsampler,
};
pub use tone::{denoise, enhance_tone, equalize_luma, unsharp_mask};

/// Process exit codes used by the CLI
pub mod exit_codes {
    /// Successful completion
    pub const SUCCESS: i32 = 0;
    /// Unspecified failure
    pub const GENERAL_ERROR: i32 = 1;
    /// Input image missing or undecodable
    pub const INPUT_READ_FAILURE: i32 = 2;
    /// Detector model failed to load
    pub const DETECTOR_LOAD_FAILURE: i32 = 3;
    /// Output image could not be written
    pub const OUTPUT_WRITE_FAILURE: i32 = 4;
}
