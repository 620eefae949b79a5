//! Voice input and output
//!
//! Microphone capture, utterance endpointing and STT feed the session
//! loop through [`MicrophoneListener`]; TTS and playback speak responses
//! through [`VoiceSpeaker`]. The console pair stands in for both when no
//! audio hardware is available.

mod capture;
mod console;
mod detector;
mod listener;
mod playback;
mod speaker;
mod stt;
mod tts;

pub use capture::{AudioCapture, SAMPLE_RATE, rms_energy, samples_to_wav};
pub use console::{ConsoleInput, ConsoleOutput, END_OF_INPUT_UTTERANCE};
pub use detector::{
    DEFAULT_ENERGY_THRESHOLD, DetectorState, MAX_UTTERANCE_SAMPLES, SpeechDetector,
};
pub use listener::MicrophoneListener;
pub use playback::{AudioPlayback, decode_mp3};
pub use speaker::VoiceSpeaker;
pub use stt::{SpeechToText, SttProvider};
pub use tts::{TextToSpeech, TtsProvider, TtsVoice};
