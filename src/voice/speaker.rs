//! Speaker-backed speech output

use async_trait::async_trait;

use super::playback::AudioPlayback;
use super::tts::TextToSpeech;
use crate::agent::SpeechOutput;
use crate::Result;

/// Synthesizes responses and plays them on the default output device
pub struct VoiceSpeaker {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl VoiceSpeaker {
    /// Combine a synthesizer with a playback device
    #[must_use]
    pub const fn new(tts: TextToSpeech, playback: AudioPlayback) -> Self {
        Self { tts, playback }
    }
}

#[async_trait(?Send)]
impl SpeechOutput for VoiceSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            tracing::debug!("no text provided for speech");
            return Ok(());
        }

        let mp3 = self.tts.synthesize(text).await?;
        self.playback.play_mp3(&mp3).await
    }
}
