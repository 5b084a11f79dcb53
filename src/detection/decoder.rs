//! Typed view over the detector's raw output.
//!
//! YOLOv8-style heads emit a `(4 + classes) x anchors` matrix: rows 0..4 of a
//! column hold the anchor's box (center x, center y, width, height) and row
//! `4 + k` holds the score for class `k`. Scores for one anchor are therefore
//! strided by `anchors` in the flat buffer; the decoder reads the transposed
//! view so each anchor is a contiguous logical row.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis, s};

use crate::detection::labels::LabelTable;
use crate::error::{Error, Result};

/// Number of leading rows holding box geometry.
pub const BOX_FIELDS: usize = 4;

/// Raw output matrix of shape `(rows, cols)` = `(4 + classes, anchors)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutput {
    data: Array2<f32>,
}

impl RawOutput {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// Wrap a flat row-major buffer of `rows * cols` values.
    pub fn from_shape_vec(rows: usize, cols: usize, values: Vec<f32>) -> Result<Self> {
        let len = values.len();
        let data = Array2::from_shape_vec((rows, cols), values)
            .map_err(|_| Error::BufferLength { rows, cols, len })?;
        Ok(Self { data })
    }

    /// Take the first batch entry of a `(batch, rows, cols)` output.
    pub fn from_batched(batched: Array3<f32>) -> Result<Self> {
        if batched.len_of(Axis(0)) == 0 {
            return Err(Error::EmptyOutput);
        }
        Ok(Self {
            data: batched.index_axis(Axis(0), 0).to_owned(),
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of anchors (candidate columns).
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }
}

/// One anchor column of the raw output.
#[derive(Debug, Clone)]
pub struct Anchor<'a> {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    /// Per-class scores; index `k` is class `k`.
    pub scores: ArrayView1<'a, f32>,
}

/// Shape-checked, transposed view of a raw output.
#[derive(Debug, Clone)]
pub struct DecodedOutput<'a> {
    anchors: ArrayView2<'a, f32>,
}

impl<'a> DecodedOutput<'a> {
    pub fn len(&self) -> usize {
        self.anchors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.nrows() == 0
    }

    pub fn class_count(&self) -> usize {
        self.anchors.ncols() - BOX_FIELDS
    }

    pub fn anchor(&self, index: usize) -> Option<Anchor<'a>> {
        (index < self.len())
            .then(|| to_anchor(self.anchors.clone().index_axis_move(Axis(0), index)))
    }

    pub fn iter(&self) -> impl Iterator<Item = Anchor<'a>> {
        let anchors = self.anchors.clone();
        (0..anchors.nrows()).map(move |i| to_anchor(anchors.clone().index_axis_move(Axis(0), i)))
    }
}

fn to_anchor(row: ArrayView1<'_, f32>) -> Anchor<'_> {
    Anchor {
        center_x: row[0],
        center_y: row[1],
        width: row[2],
        height: row[3],
        scores: row.slice_move(s![BOX_FIELDS..]),
    }
}

/// Validate the output against the label table and present it per anchor.
pub fn decode<'a>(output: &'a RawOutput, labels: &LabelTable) -> Result<DecodedOutput<'a>> {
    if labels.is_empty() {
        return Err(Error::EmptyLabelTable);
    }
    let expected_rows = BOX_FIELDS + labels.len();
    if output.rows() != expected_rows {
        return Err(Error::ShapeMismatch {
            expected_rows,
            rows: output.rows(),
        });
    }
    Ok(DecodedOutput {
        anchors: output.data.t(),
    })
}
