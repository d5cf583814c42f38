//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{CliOverrides, DEFAULT_DETECTOR_MODEL};

// CLI defaults - only override config file values when the user
// explicitly changed these
const DEFAULT_SR_SCALE: f32 = 2.0;
const DEFAULT_SHARPEN: f32 = 1.0;

/// Face-targeted photo enhancer: detects the largest face, regenerates it
/// at higher fidelity, and composites it back without a visible seam.
#[derive(Debug, Parser)]
#[command(name = "facelift", version, about)]
pub struct Cli {
    /// Input image path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image path
    #[arg(short, long, default_value = "enhanced.png")]
    pub output: PathBuf,

    /// SeetaFace detector model file
    #[arg(long, default_value = DEFAULT_DETECTOR_MODEL)]
    pub detector_model: PathBuf,

    /// Super-resolution model (.rten); bicubic interpolation when omitted
    #[arg(long)]
    pub sr_model: Option<PathBuf>,

    /// Super-resolution scale factor (2, 3 or 4 engage a model)
    #[arg(long, default_value_t = DEFAULT_SR_SCALE)]
    pub sr_scale: f32,

    /// Unsharp-mask sharpen amount (0 disables, 0-3 typical)
    #[arg(long, default_value_t = DEFAULT_SHARPEN)]
    pub sharpen: f32,

    /// Config file path (default: ./facelift.toml, then user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Overrides for config merging.
    ///
    /// Only values the user explicitly changed from the CLI defaults are
    /// set, so a config file can still provide defaults of its own.
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::new();

        if (self.sharpen - DEFAULT_SHARPEN).abs() > f32::EPSILON {
            overrides.sharpen = Some(self.sharpen);
        }
        if (self.sr_scale - DEFAULT_SR_SCALE).abs() > f32::EPSILON {
            overrides.sr_scale = Some(self.sr_scale);
        }
        if self.detector_model != PathBuf::from(DEFAULT_DETECTOR_MODEL) {
            overrides.detector_model = Some(self.detector_model.clone());
        }
        overrides.sr_model = self.sr_model.clone();

        overrides
    }
}
