//! Pipeline policy knobs.

use std::time::Duration;

use serde::Deserialize;

/// Side length of the square model input, in pixels.
pub const INPUT_SIZE: u32 = 640;
pub const BATCH_SIZE: usize = 1;
/// Colour channels fed to the model (R, G, B).
pub const CHANNELS: usize = 3;
/// Anchors scoring at or below this value are discarded.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;
/// Boxes of the same class overlapping a kept box at or above this IoU are suppressed.
pub const IOU_THRESHOLD: f32 = 0.7;
/// Initial capacity of the per-class NMS working set.
pub const NMS_QUEUE_CAPACITY: usize = 50;
/// Delay before a cue indicator reverts to neutral.
pub const REVERT_DELAY: Duration = Duration::from_millis(3500);
/// Labels that participate in edge-triggered activation.
pub const TRIGGER_LABELS: [&str; 2] = ["green", "red"];

/// Configuration for the detection pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_size: u32,
    pub batch_size: usize,
    pub channels: usize,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub nms_queue_capacity: usize,
    #[serde(rename = "revert_delay_ms", deserialize_with = "millis::deserialize")]
    pub revert_delay: Duration,
    pub trigger_labels: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            batch_size: BATCH_SIZE,
            channels: CHANNELS,
            confidence_threshold: CONFIDENCE_THRESHOLD,
            iou_threshold: IOU_THRESHOLD,
            nms_queue_capacity: NMS_QUEUE_CAPACITY,
            revert_delay: REVERT_DELAY,
            trigger_labels: TRIGGER_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Override the model input side length.
    pub fn with_input_size(mut self, input_size: u32) -> Self {
        self.input_size = input_size;
        self
    }

    /// Override the confidence threshold for candidate selection.
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Override the IoU threshold used by NMS.
    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }

    /// Replace the set of labels that can trigger activation events.
    pub fn with_trigger_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Number of `f32` values in one input tensor.
    pub fn tensor_len(&self) -> usize {
        let side = self.input_size as usize;
        self.batch_size * self.channels * side * side
    }

    /// Largest valid pixel coordinate in model input space.
    pub fn max_coord(&self) -> f32 {
        self.input_size.saturating_sub(1) as f32
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
