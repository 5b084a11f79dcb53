//! Trait for the external inference engine.

use ndarray::{Array2, Array3};

use crate::detection::RawOutput;
use crate::error::Result;
use crate::integration::tensor::InputTensor;

/// Black-box inference engine: normalized input in, raw detector output out.
///
/// Implement this trait to connect any model runtime to the pipeline.
///
/// # Example
///
/// ```ignore
/// use pedlight_rs::{InferenceEngine, InputTensor, RawOutput};
///
/// struct MyRuntime {
///     // Your session here
/// }
///
/// impl InferenceEngine for MyRuntime {
///     type Error = std::io::Error;
///
///     fn run(&mut self, input: &InputTensor) -> Result<RawOutput, Self::Error> {
///         // Feed `input.view()` to the model and wrap its output
///         todo!()
///     }
/// }
/// ```
pub trait InferenceEngine {
    /// Error type for inference failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run the model on one input tensor.
    ///
    /// # Returns
    /// The `(4 + classes) x anchors` output matrix, or an error.
    fn run(&mut self, input: &InputTensor) -> std::result::Result<RawOutput, Self::Error>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for &mut E {
    type Error = E::Error;

    fn run(&mut self, input: &InputTensor) -> std::result::Result<RawOutput, Self::Error> {
        (**self).run(input)
    }
}

/// Helper trait for converting runtime-specific outputs to [`RawOutput`].
pub trait IntoRawOutput {
    fn into_raw_output(self) -> Result<RawOutput>;
}

impl IntoRawOutput for RawOutput {
    fn into_raw_output(self) -> Result<RawOutput> {
        Ok(self)
    }
}

impl IntoRawOutput for Array2<f32> {
    fn into_raw_output(self) -> Result<RawOutput> {
        Ok(RawOutput::new(self))
    }
}

/// `[batch, rows, cols]` outputs; batch entry 0 is used.
impl IntoRawOutput for Array3<f32> {
    fn into_raw_output(self) -> Result<RawOutput> {
        RawOutput::from_batched(self)
    }
}
