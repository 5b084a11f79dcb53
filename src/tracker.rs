mod frame_state;
mod label_event;

pub use frame_state::{FrameDetectionState, LabelSet};
pub use label_event::{LabelActivated, track_transitions};
