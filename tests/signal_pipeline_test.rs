use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use image::DynamicImage;
use ndarray::Array2;
use pedlight_rs::integration::IntoRawOutput;
use pedlight_rs::{
    CueSink, Error, Indicator, IndicatorImage, InferenceEngine, InputTensor, LabelTable,
    RawOutput, SignalPipeline, Speaker,
};

/// Replays one scripted output per frame.
struct ScriptedEngine {
    frames: VecDeque<RawOutput>,
}

#[derive(Debug, thiserror::Error)]
#[error("script exhausted")]
struct Exhausted;

impl InferenceEngine for ScriptedEngine {
    type Error = Exhausted;

    fn run(&mut self, _input: &InputTensor) -> Result<RawOutput, Self::Error> {
        self.frames.pop_front().ok_or(Exhausted)
    }
}

#[derive(Default)]
struct Phrases(Vec<String>);

impl Speaker for Phrases {
    fn speak(&mut self, text: &str) {
        self.0.push(text.to_string());
    }
}

#[derive(Default)]
struct Screen(Mutex<Vec<IndicatorImage>>);

impl Indicator for Screen {
    fn show(&self, image: IndicatorImage) {
        self.0.lock().unwrap().push(image);
    }
}

const LABELS: [&str; 3] = ["Green", "Red", "Car"];

/// One anchor per `(class, score, cx)` entry, all 40x80 boxes at y = 200.
fn output(anchors: &[(usize, f32, f32)]) -> RawOutput {
    let mut data = Array2::zeros((4 + LABELS.len(), anchors.len().max(1)));
    for (i, &(class, score, cx)) in anchors.iter().enumerate() {
        data[[0, i]] = cx;
        data[[1, i]] = 200.0;
        data[[2, i]] = 40.0;
        data[[3, i]] = 80.0;
        data[[4 + class, i]] = score;
    }
    data.into_raw_output().unwrap()
}

fn empty() -> RawOutput {
    output(&[])
}

fn green() -> RawOutput {
    output(&[(0, 0.9, 300.0)])
}

#[test]
fn test_edge_triggered_cues() {
    let frames = VecDeque::from(vec![empty(), green(), green(), empty(), green()]);
    let screen = Arc::new(Screen::default());
    let sink = CueSink::new(Phrases::default(), Arc::clone(&screen));
    let labels = LabelTable::new(LABELS).unwrap();
    let mut pipeline =
        SignalPipeline::with_default_config(ScriptedEngine { frames }, sink, labels);

    let frame = DynamicImage::new_rgb8(160, 120);
    let fired: Vec<usize> = (1..=5)
        .filter(|_| !pipeline.process_frame(&frame).unwrap().activations.is_empty())
        .collect();

    assert_eq!(fired, vec![2, 5]);
    assert_eq!(pipeline.sink().speaker().0.len(), 2);
    assert_eq!(
        screen.0.lock().unwrap()[..2],
        [IndicatorImage::Green, IndicatorImage::Green]
    );
}

#[test]
fn test_duplicate_boxes_collapse_but_classes_do_not() {
    let frames = VecDeque::from(vec![output(&[
        (0, 0.9, 300.0),
        (0, 0.6, 302.0), // same class, heavy overlap
        (1, 0.8, 300.0), // other class, same box
        (2, 0.7, 500.0), // untracked label
        (1, 0.2, 100.0), // below threshold
    ])]);
    let labels = LabelTable::new(LABELS).unwrap();
    let mut events = Vec::new();
    let mut pipeline = SignalPipeline::with_default_config(
        ScriptedEngine { frames },
        |label: &str| events.push(label.to_string()),
        labels,
    );

    let report = pipeline
        .process_frame(&DynamicImage::new_rgb8(64, 64))
        .unwrap();
    drop(pipeline);

    assert_eq!(report.candidates, 4);
    let kept: Vec<(usize, f32)> = report
        .detections
        .iter()
        .map(|d| (d.class_index, d.score))
        .collect();
    assert_eq!(kept, vec![(0, 0.9), (1, 0.8), (2, 0.7)]);
    assert_eq!(events, vec!["green", "red"]);
}

#[test]
fn test_bad_frame_does_not_touch_state() {
    let mismatched = RawOutput::new(Array2::zeros((5, 3)));
    let frames = VecDeque::from(vec![green(), mismatched, empty(), green()]);
    let labels = LabelTable::new(LABELS).unwrap();
    let mut count = 0usize;
    let mut pipeline = SignalPipeline::with_default_config(
        ScriptedEngine { frames },
        |_: &str| count += 1,
        labels,
    );
    let frame = DynamicImage::new_rgb8(32, 32);

    pipeline.process_frame(&frame).unwrap();
    assert!(pipeline.state().is_latched("green"));

    let err = pipeline.process_frame(&frame).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert!(err.is_frame_local());
    assert!(pipeline.state().is_latched("green"));

    pipeline.process_frame(&frame).unwrap();
    pipeline.process_frame(&frame).unwrap();

    // Script exhausted: inference error, nothing fires.
    assert!(matches!(
        pipeline.process_frame(&frame),
        Err(Error::Inference(_))
    ));
    drop(pipeline);
    assert_eq!(count, 2);
}
