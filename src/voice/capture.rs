//! Microphone capture
//!
//! The cpal callback forwards each block of samples over a channel, so the
//! async side can await audio instead of polling a shared buffer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use tokio::sync::mpsc;

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// A running input stream and the receiving end of its blocks
struct Recording {
    _stream: Stream,
    blocks: mpsc::UnboundedReceiver<Vec<f32>>,
}

/// Streams 16kHz mono blocks from the default input device
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    recording: Option<Recording>,
}

impl AudioCapture {
    /// Open the default input device at 16kHz mono
    ///
    /// # Errors
    ///
    /// Returns error if no suitable input device exists
    pub fn new() -> Result<Self> {
        let device = cpal::default_host()
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("input device cannot record 16kHz mono".to_string()))?
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            "microphone opened"
        );

        Ok(Self {
            device,
            config,
            recording: None,
        })
    }

    /// Start recording; a no-op if already recording
    ///
    /// # Errors
    ///
    /// Returns error if the input stream cannot be started
    pub fn start(&mut self) -> Result<()> {
        if self.recording.is_some() {
            return Ok(());
        }

        let (tx, blocks) = mpsc::unbounded_channel();
        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Receiver gone means recording stopped
                    let _ = tx.send(data.to_vec());
                },
                |err| {
                    tracing::error!(error = %err, "microphone stream error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.recording = Some(Recording {
            _stream: stream,
            blocks,
        });

        tracing::debug!("microphone recording");
        Ok(())
    }

    /// Stop recording and discard anything not yet received
    pub fn stop(&mut self) {
        if self.recording.take().is_some() {
            tracing::debug!("microphone stopped");
        }
    }

    /// Wait for the next block of samples
    ///
    /// Returns `None` when not recording or the stream has died.
    pub async fn next_block(&mut self) -> Option<Vec<f32>> {
        match self.recording.as_mut() {
            Some(recording) => recording.blocks.recv().await,
            None => None,
        }
    }

    /// Every sample received so far, without waiting
    pub fn drain(&mut self) -> Vec<f32> {
        let mut samples = Vec::new();
        if let Some(recording) = self.recording.as_mut() {
            while let Ok(block) = recording.blocks.try_recv() {
                samples.extend_from_slice(&block);
            }
        }
        samples
    }

    /// Capture sample rate
    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
}

/// Encode mono f32 samples as 16-bit PCM WAV for STT APIs
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let wav_error = |e: hound::Error| Error::Audio(format!("wav encoding failed: {e}"));

    let mut cursor = std::io::Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer.write_sample(pcm).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)?;

    Ok(cursor.into_inner())
}

/// RMS energy of a block of samples
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn rms_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
