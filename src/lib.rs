//! Pedestrian traffic-light detection post-processing.
//!
//! Turns the raw output of a YOLO-style detector into de-duplicated detections
//! and edge-triggered signal events:
//!
//! image -> [`InputTensor`] -> [`RawOutput`] -> [`Detection`]s -> NMS ->
//! [`FrameDetectionState`] transitions -> [`LabelActivated`] events.

pub mod config;
pub mod detection;
pub mod error;
pub mod integration;
pub mod tracker;

pub use config::PipelineConfig;
pub use detection::{
    BoundingBox, Detection, LabelTable, RawOutput, Selection, decode, non_max_suppression,
    select_candidates,
};
pub use error::{Error, Result};
pub use integration::{
    CueSink, EventSink, FrameReport, Indicator, IndicatorImage, InferenceEngine, InputTensor,
    SignalPipeline, Speaker, TensorBuilder,
};
pub use tracker::{FrameDetectionState, LabelActivated, LabelSet, track_transitions};
