//! facelift - face-targeted photo enhancer
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use facelift::{
    exit_codes, Cli, Config, EnhancePipeline, RtenUpsampler, SeetaFaceDetector, Upsampler,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    std::process::exit(run(&cli));
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> i32 {
    let config = load_config(cli).unwrap_or_else(|e| {
        warn!("Failed to load config file: {e:#}");
        Config::default().merge_with_cli(&cli.overrides())
    });

    // Decode the input before anything heavier runs
    let image = match image::open(&cli.input) {
        Ok(decoded) => decoded.to_rgb8(),
        Err(e) => {
            error!("Failed to read input image {}: {e}", cli.input.display());
            return exit_codes::INPUT_READ_FAILURE;
        }
    };

    let detector = match SeetaFaceDetector::from_file(&config.detector_model) {
        Ok(detector) => detector,
        Err(e) => {
            error!("Failed to load detector: {e}");
            return exit_codes::DETECTOR_LOAD_FAILURE;
        }
    };

    let mut pipeline = EnhancePipeline::new(Box::new(detector), config.enhance_options());

    if let Some(model_path) = &config.sr_model {
        match RtenUpsampler::load(model_path, config.sr_scale) {
            Ok(upsampler) => {
                info!(
                    family = ?upsampler.family(),
                    scale = upsampler.scale(),
                    "Loaded super-resolution model"
                );
                pipeline = pipeline.with_upsampler(Box::new(upsampler));
            }
            // Best-effort by contract: a bad model never aborts the run
            Err(e) => warn!("Failed to load super-resolution model: {e}. Using bicubic."),
        }
    }

    let outcome = pipeline.enhance(&image);
    if !outcome.was_enhanced() {
        info!("No face detected. Saving original to output.");
    }

    match outcome.image.save(&cli.output) {
        Ok(()) => {
            info!("Saved: {}", cli.output.display());
            exit_codes::SUCCESS
        }
        Err(e) => {
            error!("Failed to write output {}: {e}", cli.output.display());
            exit_codes::OUTPUT_WRITE_FAILURE
        }
    }
}

/// Resolve the effective config: explicit file, else standard locations,
/// with CLI arguments merged over the file values.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let file_config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("config file {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(file_config.merge_with_cli(&cli.overrides()))
}
