//! Integration with the components around the post-processing core.
//!
//! This module provides the camera-frame tensor builder, the inference
//! engine seam, the event sink that drives speech and the on-screen
//! indicator, and the `SignalPipeline` that ties them together.

mod cue;
mod engine;
mod pipeline;
mod tensor;

pub use cue::{Cue, CueSink, CueTable, EventSink, Indicator, IndicatorImage, RevertTimer, Speaker};
pub use engine::{InferenceEngine, IntoRawOutput};
pub use pipeline::{FrameReport, SignalPipeline};
pub use tensor::{InputTensor, TensorBuilder};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnEngine, BurnEngineError, BurnModel};
