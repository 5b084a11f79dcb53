//! Rising-edge detection over per-frame label presence.

use log::info;
use serde::Serialize;

use crate::tracker::frame_state::{FrameDetectionState, LabelSet};

/// Emitted once when a tracked label goes from absent to present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LabelActivated {
    /// Lower-cased label
    pub label: String,
}

/// Advance `state` by one frame and return the rising edges.
///
/// For each tracked label: present and unlatched emits an event and latches,
/// present and latched stays silent, absent unlatches. Labels not tracked by
/// `state` are ignored. Events are returned in label order.
pub fn track_transitions(
    state: &mut FrameDetectionState,
    present: &LabelSet,
) -> Vec<LabelActivated> {
    let mut activations = Vec::new();

    for (label, latched) in state.flags_mut() {
        let detected = present.contains(label);
        if detected && !*latched {
            info!("label activated: {label}");
            activations.push(LabelActivated {
                label: label.to_string(),
            });
        }
        *latched = detected;
    }

    activations
}
