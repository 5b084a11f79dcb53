//! Burn inference backend.
//!
//! This module provides a `BurnEngine` that implements `InferenceEngine`
//! for running traffic-light detectors built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use pedlight_rs::integration::{BurnEngine, BurnModel};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(
//!         &self,
//!         input: burn::tensor::Tensor<NdArray, 4>,
//!     ) -> burn::tensor::Tensor<NdArray, 3> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("model.bin");
//! let engine = BurnEngine::new(model, Default::default());
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use ndarray::Array3;

use super::{InferenceEngine, InputTensor, IntoRawOutput};
use crate::detection::RawOutput;

/// Error type for Burn inference failures.
#[derive(Debug, thiserror::Error)]
pub enum BurnEngineError {
    /// Input tensor does not match the model's expected shape.
    #[error("invalid input shape: expected {expected:?}, got {got:?}")]
    InvalidInputShape {
        expected: [usize; 4],
        got: [usize; 4],
    },
    /// Model output could not be read back as f32.
    #[error("unreadable model output: {0}")]
    Output(String),
    /// Model output does not have a usable shape.
    #[error("invalid model output: {0}")]
    InvalidOutput(#[from] crate::error::Error),
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    ///
    /// # Returns
    /// Output tensor of shape [batch, 4 + classes, anchors].
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 3>;

    /// Get the expected input shape (batch, channels, height, width).
    fn input_shape(&self) -> [usize; 4] {
        [1, 3, 640, 640] // Default YOLO input size
    }
}

/// Burn-based inference engine implementing `InferenceEngine`.
pub struct BurnEngine<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
}

impl<B: Backend, M: BurnModel<B>> BurnEngine<B, M> {
    /// Create a new Burn engine with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self { model, device }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Upload the normalized input to the device.
    fn to_device(&self, input: &InputTensor) -> Result<Tensor<B, 4>, BurnEngineError> {
        let expected = self.model.input_shape();
        let got = input.shape();
        if got != expected {
            return Err(BurnEngineError::InvalidInputShape { expected, got });
        }

        let data = input.to_vec();
        Ok(Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape(got))
    }

    /// Read the `[batch, rows, cols]` output back into host memory.
    fn read_output(&self, output: Tensor<B, 3>) -> Result<RawOutput, BurnEngineError> {
        let [batch, rows, cols] = output.dims();
        let values = output
            .into_data()
            .to_vec::<f32>()
            .map_err(|err| BurnEngineError::Output(format!("{err:?}")))?;
        let batched = Array3::from_shape_vec((batch, rows, cols), values)
            .map_err(|err| BurnEngineError::Output(err.to_string()))?;
        Ok(batched.into_raw_output()?)
    }
}

impl<B: Backend, M: BurnModel<B>> InferenceEngine for BurnEngine<B, M> {
    type Error = BurnEngineError;

    fn run(&mut self, input: &InputTensor) -> Result<RawOutput, Self::Error> {
        let tensor = self.to_device(input)?;
        let output = self.model.forward(tensor);
        self.read_output(output)
    }
}
