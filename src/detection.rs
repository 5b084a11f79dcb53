//! Detector output post-processing: decoding, candidate selection and NMS.

mod bbox;
mod decoder;
mod labels;
mod nms;
mod selector;

pub use bbox::{BoundingBox, overlap};
pub use decoder::{Anchor, BOX_FIELDS, DecodedOutput, RawOutput, decode};
pub use labels::LabelTable;
pub use nms::non_max_suppression;
pub use selector::{Detection, Selection, best_class, select_candidates};
