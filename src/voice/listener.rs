//! Microphone-backed speech capture

use async_trait::async_trait;

use super::capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
use super::detector::SpeechDetector;
use super::stt::SpeechToText;
use crate::agent::SpeechCapture;
use crate::Error;
use crate::error::RecognitionError;

/// Records one utterance from the microphone and transcribes it
///
/// The microphone only records while listening, so the agent's own
/// speech is not picked up between turns.
pub struct MicrophoneListener {
    capture: AudioCapture,
    detector: SpeechDetector,
    stt: SpeechToText,
}

impl MicrophoneListener {
    /// Combine a microphone, an endpointer and a transcriber
    #[must_use]
    pub const fn new(capture: AudioCapture, detector: SpeechDetector, stt: SpeechToText) -> Self {
        Self {
            capture,
            detector,
            stt,
        }
    }

    async fn record_utterance(&mut self) -> crate::Result<Vec<f32>> {
        self.detector.reset();
        self.capture.start()?;
        tracing::info!("listening...");

        let complete = loop {
            let Some(block) = self.capture.next_block().await else {
                break false;
            };
            if self.detector.process(&block) {
                break true;
            }
        };

        self.capture.stop();
        if !complete {
            return Err(Error::Audio("microphone stream ended".to_string()));
        }
        Ok(self.detector.take_utterance())
    }
}

#[async_trait(?Send)]
impl SpeechCapture for MicrophoneListener {
    async fn listen(&mut self) -> Result<String, RecognitionError> {
        let samples = self.record_utterance().await?;
        tracing::debug!(samples = samples.len(), "utterance recorded");

        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        let transcript = self.stt.transcribe(&wav).await?;

        if transcript.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }
        Ok(transcript)
    }
}
