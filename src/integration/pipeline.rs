//! SignalPipeline: one frame in, de-duplicated detections and label events out.

use image::DynamicImage;
use log::{debug, warn};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::detection::{
    Detection, LabelTable, RawOutput, decode, non_max_suppression, select_candidates,
};
use crate::error::{Error, Result};
use crate::integration::cue::EventSink;
use crate::integration::engine::InferenceEngine;
use crate::integration::tensor::TensorBuilder;
use crate::tracker::{FrameDetectionState, LabelActivated, track_transitions};

/// Outcome of processing one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// NMS output, ordered by class then descending score.
    pub detections: Vec<Detection>,
    /// Rising edges delivered to the sink this frame.
    pub activations: Vec<LabelActivated>,
    /// Anchors that passed the confidence threshold before NMS.
    pub candidates: usize,
}

/// Synchronous detection pipeline bundling an inference engine, the label
/// latch state and an event sink.
///
/// Frames must be fed one at a time. A frame that fails at any stage leaves
/// the latch state untouched and fires no events. Build a [`CueSink`] for it
/// with [`CueSink::from_config`] so the revert delay follows the same config.
///
/// [`CueSink`]: crate::integration::CueSink
/// [`CueSink::from_config`]: crate::integration::CueSink::from_config
pub struct SignalPipeline<E: InferenceEngine, S: EventSink> {
    engine: E,
    sink: S,
    labels: LabelTable,
    config: PipelineConfig,
    builder: TensorBuilder,
    state: FrameDetectionState,
}

impl<E: InferenceEngine, S: EventSink> SignalPipeline<E, S> {
    /// Create a new pipeline with the given engine, sink, labels and config.
    pub fn new(engine: E, sink: S, labels: LabelTable, config: PipelineConfig) -> Self {
        let builder = TensorBuilder::from_config(&config);
        let state = FrameDetectionState::new(&config.trigger_labels);
        Self {
            engine,
            sink,
            labels,
            config,
            builder,
            state,
        }
    }

    /// Create a new pipeline with the default configuration.
    pub fn with_default_config(engine: E, sink: S, labels: LabelTable) -> Self {
        Self::new(engine, sink, labels, PipelineConfig::default())
    }

    /// Process a single camera frame.
    ///
    /// Builds the input tensor, runs inference and hands the raw output to
    /// [`SignalPipeline::process_output`].
    pub fn process_frame(&mut self, image: &DynamicImage) -> Result<FrameReport> {
        let tensor = self.builder.build(image).inspect_err(|err| {
            warn!("skipping frame: {err}");
        })?;

        let output = self.engine.run(&tensor).map_err(|err| {
            warn!("skipping frame, inference failed: {err}");
            Error::Inference(Box::new(err))
        })?;

        self.process_output(&output)
    }

    /// Post-process an inference output: select, suppress, track and notify.
    pub fn process_output(&mut self, output: &RawOutput) -> Result<FrameReport> {
        let decoded = decode(output, &self.labels).inspect_err(|err| {
            warn!("discarding frame: {err}");
        })?;

        let selection = select_candidates(&decoded, &self.labels, &self.config);
        let detections = non_max_suppression(
            &selection.detections,
            self.labels.len(),
            self.config.iou_threshold,
            self.config.nms_queue_capacity,
        );

        let activations = track_transitions(&mut self.state, &selection.present);
        for activation in &activations {
            self.sink.label_activated(&activation.label);
        }

        debug!(
            "frame done: {} candidates, {} detections, {} activations",
            selection.detections.len(),
            detections.len(),
            activations.len()
        );

        Ok(FrameReport {
            detections,
            activations,
            candidates: selection.detections.len(),
        })
    }

    /// Unlatch every tracked label, as on a fresh start.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn state(&self) -> &FrameDetectionState {
        &self.state
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Get a mutable reference to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
