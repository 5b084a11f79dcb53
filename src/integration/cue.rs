//! Event sink: turns label activations into a spoken phrase and a transient
//! indicator image.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::config::{PipelineConfig, REVERT_DELAY};

/// Receives one call per rising edge of a tracked label.
pub trait EventSink {
    fn label_activated(&mut self, label: &str);
}

impl<F: FnMut(&str)> EventSink for F {
    fn label_activated(&mut self, label: &str) {
        self(label)
    }
}

/// Text-to-speech output.
pub trait Speaker {
    /// Speak `text`, replacing any utterance in progress.
    fn speak(&mut self, text: &str);

    /// Whether the engine has finished initialising. Phrases sent before
    /// that are dropped.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Image shown by the on-screen indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorImage {
    #[default]
    Neutral,
    Green,
    Red,
}

/// On-screen indicator. Called from the sink and from the revert timer thread.
pub trait Indicator: Send + Sync + 'static {
    fn show(&self, image: IndicatorImage);
}

/// What to say and show for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub phrase: String,
    pub image: IndicatorImage,
}

/// Mapping from lower-cased label to its cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTable {
    cues: HashMap<String, Cue>,
}

impl Default for CueTable {
    fn default() -> Self {
        Self::empty()
            .with_cue("green", "Green light. You may cross now.", IndicatorImage::Green)
            .with_cue("red", "Red light. Please stop.", IndicatorImage::Red)
    }
}

impl CueTable {
    pub fn empty() -> Self {
        Self {
            cues: HashMap::new(),
        }
    }

    pub fn with_cue(
        mut self,
        label: &str,
        phrase: impl Into<String>,
        image: IndicatorImage,
    ) -> Self {
        self.cues.insert(
            label.to_lowercase(),
            Cue {
                phrase: phrase.into(),
                image,
            },
        );
        self
    }

    pub fn get(&self, label: &str) -> Option<&Cue> {
        self.cues.get(label)
    }
}

/// Cancellable one-shot task that puts the indicator back to neutral.
///
/// Scheduling replaces any pending revert; dropping the timer cancels it.
#[derive(Debug)]
pub struct RevertTimer {
    delay: Duration,
    pending: Option<Sender<()>>,
}

impl RevertTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Show [`IndicatorImage::Neutral`] on `indicator` after the delay.
    pub fn schedule<I: Indicator>(&mut self, indicator: Arc<I>) {
        self.cancel();

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let delay = self.delay;
        let spawned = thread::Builder::new()
            .name("cue-revert".into())
            .spawn(move || {
                // A send or a dropped sender both mean cancelled.
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(delay) {
                    indicator.show(IndicatorImage::Neutral);
                }
            });

        match spawned {
            Ok(_) => self.pending = Some(cancel_tx),
            Err(err) => warn!("failed to start indicator revert timer: {err}"),
        }
    }

    /// Cancel the pending revert, if any.
    pub fn cancel(&mut self) {
        if let Some(cancel_tx) = self.pending.take() {
            let _ = cancel_tx.send(());
        }
    }
}

impl Drop for RevertTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// [`EventSink`] that speaks a phrase and flashes an indicator image for each
/// activation, reverting the indicator to neutral after a fixed delay.
pub struct CueSink<S: Speaker, I: Indicator> {
    speaker: S,
    indicator: Arc<I>,
    cues: CueTable,
    timer: RevertTimer,
}

impl<S: Speaker, I: Indicator> CueSink<S, I> {
    /// Create a sink with the default green/red cues and revert delay.
    pub fn new(speaker: S, indicator: Arc<I>) -> Self {
        Self::with_cues(speaker, indicator, CueTable::default(), REVERT_DELAY)
    }

    /// Create a sink with the default cues and the configured revert delay.
    pub fn from_config(speaker: S, indicator: Arc<I>, config: &PipelineConfig) -> Self {
        Self::with_cues(speaker, indicator, CueTable::default(), config.revert_delay)
    }

    pub fn with_cues(
        speaker: S,
        indicator: Arc<I>,
        cues: CueTable,
        revert_delay: Duration,
    ) -> Self {
        Self {
            speaker,
            indicator,
            cues,
            timer: RevertTimer::new(revert_delay),
        }
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }

    pub fn speaker_mut(&mut self) -> &mut S {
        &mut self.speaker
    }

    pub fn indicator(&self) -> &Arc<I> {
        &self.indicator
    }

    pub fn revert_delay(&self) -> Duration {
        self.timer.delay()
    }
}

impl<S: Speaker, I: Indicator> EventSink for CueSink<S, I> {
    fn label_activated(&mut self, label: &str) {
        let Some(cue) = self.cues.get(label) else {
            debug!("no cue configured for label {label}");
            return;
        };

        if self.speaker.is_ready() {
            self.speaker.speak(&cue.phrase);
        } else {
            warn!("speech not ready, dropping cue for {label}");
        }

        self.indicator.show(cue.image);
        self.timer.schedule(Arc::clone(&self.indicator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSpeaker {
        ready: bool,
        spoken: Vec<String>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str) {
            self.spoken.push(text.to_string());
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    #[derive(Default)]
    struct RecordingIndicator {
        shown: Mutex<Vec<IndicatorImage>>,
    }

    impl Indicator for RecordingIndicator {
        fn show(&self, image: IndicatorImage) {
            self.shown.lock().unwrap().push(image);
        }
    }

    impl RecordingIndicator {
        fn shown(&self) -> Vec<IndicatorImage> {
            self.shown.lock().unwrap().clone()
        }
    }

    fn ready_speaker() -> RecordingSpeaker {
        RecordingSpeaker {
            ready: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_known_label_speaks_and_shows() {
        let indicator = Arc::new(RecordingIndicator::default());
        let mut sink = CueSink::new(ready_speaker(), Arc::clone(&indicator));

        sink.label_activated("green");
        assert_eq!(sink.speaker().spoken, vec!["Green light. You may cross now."]);
        assert_eq!(indicator.shown(), vec![IndicatorImage::Green]);
    }

    #[test]
    fn test_unknown_label_is_ignored() {
        let indicator = Arc::new(RecordingIndicator::default());
        let mut sink = CueSink::new(ready_speaker(), Arc::clone(&indicator));

        sink.label_activated("car");
        assert!(sink.speaker().spoken.is_empty());
        assert!(indicator.shown().is_empty());
    }

    #[test]
    fn test_unready_speaker_still_shows_indicator() {
        let indicator = Arc::new(RecordingIndicator::default());
        let mut sink = CueSink::new(RecordingSpeaker::default(), Arc::clone(&indicator));

        sink.label_activated("red");
        assert!(sink.speaker().spoken.is_empty());
        assert_eq!(indicator.shown(), vec![IndicatorImage::Red]);
    }

    #[test]
    fn test_indicator_reverts_after_delay() {
        let indicator = Arc::new(RecordingIndicator::default());
        let mut sink = CueSink::with_cues(
            ready_speaker(),
            Arc::clone(&indicator),
            CueTable::default(),
            Duration::from_millis(20),
        );

        sink.label_activated("red");
        thread::sleep(Duration::from_millis(300));
        assert_eq!(
            indicator.shown(),
            vec![IndicatorImage::Red, IndicatorImage::Neutral]
        );
    }

    #[test]
    fn test_config_revert_delay_reaches_sink() {
        let indicator = Arc::new(RecordingIndicator::default());
        let config = PipelineConfig {
            revert_delay: Duration::from_millis(20),
            ..Default::default()
        };
        let mut sink = CueSink::from_config(ready_speaker(), Arc::clone(&indicator), &config);
        assert_eq!(sink.revert_delay(), Duration::from_millis(20));
        assert_eq!(
            CueSink::new(ready_speaker(), Arc::clone(&indicator)).revert_delay(),
            REVERT_DELAY
        );

        sink.label_activated("green");
        thread::sleep(Duration::from_millis(300));
        assert_eq!(
            indicator.shown(),
            vec![IndicatorImage::Green, IndicatorImage::Neutral]
        );
    }

    #[test]
    fn test_new_cue_replaces_pending_revert() {
        let indicator = Arc::new(RecordingIndicator::default());
        let mut sink = CueSink::with_cues(
            ready_speaker(),
            Arc::clone(&indicator),
            CueTable::default(),
            Duration::from_millis(200),
        );

        sink.label_activated("red");
        sink.label_activated("green");
        thread::sleep(Duration::from_millis(600));
        assert_eq!(
            indicator.shown(),
            vec![
                IndicatorImage::Red,
                IndicatorImage::Green,
                IndicatorImage::Neutral
            ]
        );
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let indicator = Arc::new(RecordingIndicator::default());
        let mut timer = RevertTimer::new(Duration::from_millis(20));
        timer.schedule(Arc::clone(&indicator));
        timer.cancel();
        thread::sleep(Duration::from_millis(150));
        assert!(indicator.shown().is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |label: &str| seen.push(label.to_string());
            sink.label_activated("green");
        }
        assert_eq!(seen, vec!["green"]);
    }
}
