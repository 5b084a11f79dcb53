//! Confidence filtering of decoded anchors.

use log::debug;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::detection::bbox::BoundingBox;
use crate::detection::decoder::{Anchor, DecodedOutput};
use crate::detection::labels::LabelTable;
use crate::tracker::LabelSet;

/// A single detection above the confidence threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
    /// Index into the label table.
    pub class_index: usize,
    /// Confidence score
    pub score: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_index: usize, score: f32, bbox: BoundingBox) -> Self {
        Self {
            class_index,
            score,
            bbox,
        }
    }
}

/// Candidates that survived the confidence threshold for one frame.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub detections: Vec<Detection>,
    /// Distinct lower-cased labels among `detections`.
    pub present: LabelSet,
}

/// Best class of an anchor: the first index holding the maximum score.
///
/// Returns `None` when no score is strictly positive.
pub fn best_class(anchor: &Anchor<'_>) -> Option<(usize, f32)> {
    let mut best = None;
    let mut max_score = 0.0f32;
    for (class_index, &score) in anchor.scores.iter().enumerate() {
        if score > max_score {
            max_score = score;
            best = Some(class_index);
        }
    }
    best.map(|class_index| (class_index, max_score))
}

/// Keep anchors whose best score exceeds the confidence threshold and record
/// which labels are present in the frame.
pub fn select_candidates(
    decoded: &DecodedOutput<'_>,
    labels: &LabelTable,
    config: &PipelineConfig,
) -> Selection {
    let max_coord = config.max_coord();
    let mut selection = Selection::default();

    for anchor in decoded.iter() {
        let Some((class_index, score)) = best_class(&anchor) else {
            continue;
        };
        if score <= config.confidence_threshold {
            continue;
        }

        let bbox = BoundingBox::from_center(
            anchor.center_x,
            anchor.center_y,
            anchor.width,
            anchor.height,
            max_coord,
        );
        selection
            .detections
            .push(Detection::new(class_index, score, bbox));

        if let Some(label) = labels.lowercase(class_index) {
            selection.present.insert(label.to_string());
        }
    }

    debug!(
        "selected {} of {} anchors, labels present: {:?}",
        selection.detections.len(),
        decoded.len(),
        selection.present
    );
    selection
}
