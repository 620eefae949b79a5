//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;

use friday::agent::{SpeechCapture, SpeechOutput};
use friday::voice::{
    ConsoleInput, ConsoleOutput, DetectorState, END_OF_INPUT_UTTERANCE, SAMPLE_RATE,
    SpeechDetector, samples_to_wav,
};
use friday::RecognitionError;

/// Generate sine wave audio samples
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn generate_silence(duration_secs: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    vec![0.0; num_samples]
}

#[test]
fn test_detector_creation() {
    let detector = SpeechDetector::with_threshold(0.05);

    assert_eq!(detector.state(), DetectorState::Idle);
    assert!((detector.threshold() - 0.05).abs() < f32::EPSILON);
    assert!(detector.buffered().is_empty());
}

#[test]
fn test_speech_activity_detection() {
    let mut detector = SpeechDetector::new();

    // Silent samples - should not trigger
    let silence = generate_silence(0.1);
    assert!(!detector.process(&silence));
    assert_eq!(detector.state(), DetectorState::Idle);

    // Loud samples - should start an utterance
    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    assert!(!detector.process(&speech));
    assert_eq!(detector.state(), DetectorState::Speaking);

    // Trailing silence completes the segment
    let silence = generate_silence(1.0);
    assert!(detector.process(&silence));
    assert_eq!(detector.state(), DetectorState::Complete);
}

#[test]
fn test_pause_inside_utterance_does_not_end_it() {
    let mut detector = SpeechDetector::new();

    detector.process(&generate_sine_samples(440.0, 0.4, 0.3));
    assert!(!detector.process(&generate_silence(0.3)));
    assert!(!detector.process(&generate_sine_samples(440.0, 0.4, 0.3)));
    assert_eq!(detector.state(), DetectorState::Speaking);
}

#[test]
fn test_speech_buffer_accumulation() {
    let mut detector = SpeechDetector::new();

    let chunk1 = generate_sine_samples(440.0, 0.1, 0.3);
    detector.process(&chunk1);

    let chunk2 = generate_sine_samples(440.0, 0.1, 0.3);
    detector.process(&chunk2);

    // Buffer should contain both chunks
    assert_eq!(detector.buffered().len(), chunk1.len() + chunk2.len());
}

#[test]
fn test_take_utterance() {
    let mut detector = SpeechDetector::new();

    let speech = generate_sine_samples(440.0, 0.5, 0.3);
    let silence = generate_silence(1.0);
    detector.process(&speech);
    assert!(detector.process(&silence));

    let taken = detector.take_utterance();
    assert_eq!(taken.len(), speech.len() + silence.len());

    // Back to idle with an empty buffer
    assert_eq!(detector.state(), DetectorState::Idle);
    assert!(detector.buffered().is_empty());
}

#[test]
fn test_complete_ignores_further_audio() {
    let mut detector = SpeechDetector::new();

    detector.process(&generate_sine_samples(440.0, 0.5, 0.3));
    assert!(detector.process(&generate_silence(1.0)));
    let buffered = detector.buffered().len();

    assert!(detector.process(&generate_sine_samples(440.0, 0.2, 0.3)));
    assert_eq!(detector.buffered().len(), buffered);
}

#[test]
fn test_samples_to_wav() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav_data = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");

    // WAV header is 44 bytes
    assert!(wav_data.len() > 44);
}

#[test]
fn test_wav_readback() {
    let original_samples: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav_data = samples_to_wav(&original_samples, SAMPLE_RATE).unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples.len(), original_samples.len());
    assert_eq!(read_samples[0], 0);
    assert!(read_samples[3] > 32_000);
}

#[tokio::test]
async fn test_console_round_trip() {
    let mut input = ConsoleInput::from_reader(&b"what time is it\n\n"[..]);
    let mut output = ConsoleOutput::new(Vec::new());

    let heard = input.listen().await.unwrap();
    output.speak(&format!("You said: {heard}")).await.unwrap();

    assert_eq!(
        input.listen().await.unwrap_err(),
        RecognitionError::Unintelligible
    );
    assert_eq!(input.listen().await.unwrap(), END_OF_INPUT_UTTERANCE);

    let printed = String::from_utf8(output.into_inner()).unwrap();
    assert_eq!(printed, "AI --> You said: what time is it\n");
}
