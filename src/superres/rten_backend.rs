//! Upsampler backed by an `rten` model.
//!
//! Runs an NCHW f32 super-resolution network (EDSR / LapSRN exported to the
//! `.rten` format). Input pixels are fed normalized to `[0, 1]`; the output
//! tensor is clamped back into range and re-quantized.

use std::path::Path;

use image::RgbImage;
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::NdTensor;

use super::types::{ModelFamily, Result, SuperResError, Upsampler};

/// Learned upsampler over a loaded `rten` model.
pub struct RtenUpsampler {
    model: Model,
    family: ModelFamily,
    scale: u32,
}

impl RtenUpsampler {
    /// Load a model from `path` and fix its scale factor to the supported
    /// value nearest `requested_scale`.
    ///
    /// The family is sniffed from the file name; unrecognized names fall
    /// back to the EDSR scale set.
    pub fn load(path: &Path, requested_scale: f32) -> Result<Self> {
        if !path.exists() {
            return Err(SuperResError::ModelNotFound(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let family = ModelFamily::from_model_name(&name);
        let scale = family.nearest_supported_scale(requested_scale);

        let model =
            Model::load_file(path).map_err(|e| SuperResError::ModelLoad(e.to_string()))?;

        Ok(Self {
            model,
            family,
            scale,
        })
    }

    /// The family resolved at load time.
    pub fn family(&self) -> ModelFamily {
        self.family
    }
}

impl Upsampler for RtenUpsampler {
    fn scale(&self) -> u32 {
        self.scale
    }

    fn upsample(&self, region: &RgbImage) -> Result<RgbImage> {
        let (width, height) = region.dimensions();
        let (w, h) = (width as usize, height as usize);

        let mut input = NdTensor::<f32, 4>::zeros([1, 3, h, w]);
        for (x, y, pixel) in region.enumerate_pixels() {
            for channel in 0..3 {
                input[[0, channel, y as usize, x as usize]] =
                    pixel.0[channel] as f32 / 255.0;
            }
        }

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| SuperResError::Inference(e.to_string()))?;
        let output: NdTensor<f32, 4> = output
            .try_into()
            .map_err(|_| SuperResError::BadOutput("expected a 4-D float tensor".to_string()))?;

        let [_, channels, out_h, out_w] = output.shape();
        let expected_w = w * self.scale as usize;
        let expected_h = h * self.scale as usize;
        if channels != 3 || out_w != expected_w || out_h != expected_h {
            return Err(SuperResError::BadOutput(format!(
                "expected 3x{}x{} output, got {}x{}x{}",
                expected_h, expected_w, channels, out_h, out_w
            )));
        }

        let mut upsampled = RgbImage::new(expected_w as u32, expected_h as u32);
        for (x, y, pixel) in upsampled.enumerate_pixels_mut() {
            for channel in 0..3 {
                let v = output[[0, channel, y as usize, x as usize]];
                pixel.0[channel] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }

        Ok(upsampled)
    }
}
