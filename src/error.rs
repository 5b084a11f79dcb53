//! Error type shared by every pipeline stage.

use std::path::PathBuf;

/// Errors raised while turning a frame into detections and events.
///
/// Every variant is frame-local except [`Error::AssetLoad`], which is raised
/// once while loading the label table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source image has a zero dimension.
    #[error("invalid source image: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// The configured channel count is not RGB.
    #[error("unsupported channel count {channels}, only 3 (RGB) is supported")]
    UnsupportedChannels { channels: usize },

    /// The raw output row count does not match `4 + labels`.
    #[error("raw output has {rows} rows, expected {expected_rows} (4 box fields + labels)")]
    ShapeMismatch { expected_rows: usize, rows: usize },

    /// The raw output buffer length does not match its declared shape.
    #[error("raw output buffer holds {len} values, shape {rows}x{cols} needs {}", .rows * .cols)]
    BufferLength { rows: usize, cols: usize, len: usize },

    /// The raw output carries no batch entries.
    #[error("raw output contains no batch entries")]
    EmptyOutput,

    #[error("label table is empty")]
    EmptyLabelTable,

    /// The label asset could not be read.
    #[error("failed to load labels from {path}: {source}")]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inference engine failed on this frame.
    #[error("inference failed: {0}")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Whether the error only invalidates the current frame.
    pub fn is_frame_local(&self) -> bool {
        !matches!(self, Error::AssetLoad { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
