//! Utterance endpointing
//!
//! Splits the microphone stream into single utterances using RMS energy:
//! speech starts when a block is louder than the threshold and ends after
//! a stretch of trailing silence.

use super::capture::rms_energy;

/// Default RMS energy above which a block counts as speech
pub const DEFAULT_ENERGY_THRESHOLD: f32 = 0.03;

/// Voiced samples needed before an utterance can end (0.3s at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends an utterance (0.8s at 16kHz)
const END_SILENCE_SAMPLES: usize = 12_800;

/// Longest utterance kept before it is cut off (30s at 16kHz)
pub const MAX_UTTERANCE_SAMPLES: usize = 480_000;

/// State of the endpointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for speech to start
    Idle,
    /// Speech started, accumulating samples
    Speaking,
    /// A full utterance is buffered and ready to be taken
    Complete,
}

/// Detects where one spoken utterance starts and ends
pub struct SpeechDetector {
    threshold: f32,
    state: DetectorState,
    buffer: Vec<f32>,
    voiced_samples: usize,
    silence_samples: usize,
}

impl SpeechDetector {
    /// Create a detector with the default energy threshold
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_ENERGY_THRESHOLD)
    }

    /// Create a detector with a custom energy threshold
    #[must_use]
    pub const fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            state: DetectorState::Idle,
            buffer: Vec::new(),
            voiced_samples: 0,
            silence_samples: 0,
        }
    }

    /// Feed a block of samples
    ///
    /// Returns true once an utterance is complete; further blocks are
    /// ignored until it is taken.
    pub fn process(&mut self, samples: &[f32]) -> bool {
        let energy = rms_energy(samples);
        let is_speech = energy > self.threshold;

        match self.state {
            DetectorState::Idle => {
                if is_speech {
                    self.state = DetectorState::Speaking;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.voiced_samples = samples.len();
                    self.silence_samples = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            DetectorState::Speaking => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.voiced_samples += samples.len();
                    self.silence_samples = 0;
                } else {
                    self.silence_samples += samples.len();
                }

                let at_cap = self.buffer.len() >= MAX_UTTERANCE_SAMPLES;
                if at_cap {
                    self.buffer.truncate(MAX_UTTERANCE_SAMPLES);
                }

                if at_cap || self.silence_samples > END_SILENCE_SAMPLES {
                    if self.voiced_samples > MIN_SPEECH_SAMPLES {
                        tracing::debug!(
                            samples = self.buffer.len(),
                            cut_off = at_cap,
                            "utterance complete"
                        );
                        self.state = DetectorState::Complete;
                    } else {
                        tracing::trace!("too little speech, discarding");
                        self.reset();
                    }
                }
            }
            DetectorState::Complete => {}
        }

        self.state == DetectorState::Complete
    }

    /// Take the buffered utterance and return to `Idle`
    pub fn take_utterance(&mut self) -> Vec<f32> {
        let utterance = std::mem::take(&mut self.buffer);
        self.reset();
        utterance
    }

    /// Samples buffered so far
    #[must_use]
    pub fn buffered(&self) -> &[f32] {
        &self.buffer
    }

    /// Drop any partial utterance
    pub fn reset(&mut self) {
        self.state = DetectorState::Idle;
        self.buffer.clear();
        self.voiced_samples = 0;
        self.silence_samples = 0;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }

    /// Energy threshold in use
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for SpeechDetector {
    fn default() -> Self {
        Self::new()
    }
}
