use std::collections::{BTreeMap, BTreeSet};

/// Distinct lower-cased labels detected in one frame.
pub type LabelSet = BTreeSet<String>;

/// Per-label latch carried across frames.
///
/// Only labels registered at construction participate; each flag is `true`
/// while its label has been present in every frame since its last rising edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameDetectionState {
    latched: BTreeMap<String, bool>,
}

impl FrameDetectionState {
    /// Create a state with every trigger label unlatched.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            latched: labels
                .into_iter()
                .map(|l| (l.as_ref().to_lowercase(), false))
                .collect(),
        }
    }

    /// Whether `label` is tracked and currently latched.
    pub fn is_latched(&self, label: &str) -> bool {
        self.latched.get(label).copied().unwrap_or(false)
    }

    pub fn is_tracked(&self, label: &str) -> bool {
        self.latched.contains_key(label)
    }

    /// Tracked labels in lexical order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.latched.keys().map(String::as_str)
    }

    /// Unlatch every tracked label.
    pub fn reset(&mut self) {
        self.latched.values_mut().for_each(|flag| *flag = false);
    }

    pub(crate) fn flags_mut(&mut self) -> impl Iterator<Item = (&str, &mut bool)> {
        self.latched.iter_mut().map(|(label, flag)| (label.as_str(), flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_unlatched() {
        let state = FrameDetectionState::new(["Green", "red"]);
        assert!(state.is_tracked("green"));
        assert!(!state.is_latched("green"));
        assert!(!state.is_tracked("car"));
        assert_eq!(state.labels().collect::<Vec<_>>(), vec!["green", "red"]);
    }

    #[test]
    fn test_reset_clears_flags() {
        let mut state = FrameDetectionState::new(["green"]);
        for (_, flag) in state.flags_mut() {
            *flag = true;
        }
        assert!(state.is_latched("green"));
        state.reset();
        assert!(!state.is_latched("green"));
    }
}
