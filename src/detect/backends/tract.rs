#![cfg(feature = "backend-tract")]

use std::path::Path;

use tract_onnx::prelude::*;

use crate::config::ModelSettings;
use crate::detect::backend::DetectorBackend;
use crate::detect::{decode_detections, resize_linear, DetectionRecord};
use crate::error::{LocatorError, Result};
use crate::frame::Frame;

/// Tract-based backend for an ONNX export of the SSD face detector.
///
/// The model is loaded and optimized once; `detect` only runs the plan.
/// Input is a `[1, 3, S, S]` blob built the way the reference detector was
/// fed: `resize_linear` to `S x S`, BGR channel order, and
/// `(value - mean) * scale` with 8-bit sample values carried as f32.
pub struct TractBackend {
    model: TypedRunnableModel<TypedModel>,
    input_size: u32,
    mean: [f32; 3],
    scale: f32,
    swap_rb: bool,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn load(settings: &ModelSettings) -> Result<Self> {
        let path = settings.path.as_path();
        if !path.is_file() {
            return Err(LocatorError::ModelLoad {
                path: path.to_path_buf(),
                source: "model file does not exist".into(),
            });
        }
        let size = settings.input_size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| model_load(path, e))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)),
            )
            .map_err(|e| model_load(path, e))?
            .into_optimized()
            .map_err(|e| model_load(path, e))?
            .into_runnable()
            .map_err(|e| model_load(path, e))?;

        log::info!(
            "loaded detector model {} ({}x{} input)",
            path.display(),
            size,
            size
        );

        Ok(Self {
            model,
            input_size: settings.input_size,
            mean: settings.mean,
            scale: settings.scale,
            swap_rb: settings.swap_rb,
        })
    }

    fn build_input(&self, frame: &Frame) -> Tensor {
        let size = self.input_size;
        let resized = resize_linear(frame.pixels(), size, size);
        // Decoded pixels are RGB; the detector expects BGR unless swap_rb is set.
        let source_channel = |channel: usize| {
            if self.swap_rb {
                channel
            } else {
                2 - channel
            }
        };

        let blob = tract_ndarray::Array4::from_shape_fn(
            (1, 3, size as usize, size as usize),
            |(_, channel, y, x)| {
                let pixel = resized.get_pixel(x as u32, y as u32);
                let value = pixel.0[source_channel(channel)] as f32;
                (value - self.mean[channel]) * self.scale
            },
        );
        blob.into_tensor()
    }
}

impl DetectorBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&self, frame: &Frame) -> Result<Vec<DetectionRecord>> {
        let input = self.build_input(frame);
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| LocatorError::Inference(format!("{:#}", e)))?;
        let output = outputs
            .first()
            .ok_or_else(|| LocatorError::Inference("model produced no outputs".into()))?;
        let values = output
            .to_array_view::<f32>()
            .map_err(|e| LocatorError::Inference(format!("output tensor was not f32: {:#}", e)))?;
        let values: Vec<f32> = values.iter().copied().collect();
        decode_detections(&values)
    }

    fn warm_up(&self) -> Result<()> {
        let blank = Frame::blank(self.input_size, self.input_size);
        self.detect(&blank).map(|_| ())
    }
}

fn model_load(path: &Path, err: TractError) -> LocatorError {
    LocatorError::ModelLoad {
        path: path.to_path_buf(),
        source: err.into(),
    }
}
