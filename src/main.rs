use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use friday::agent::{
    EncyclopediaProvider, IntentRouter, SessionLoop, SpeechCapture, SpeechOutput, Utterance,
    WebSearchProvider,
};
use friday::config::Overrides;
use friday::knowledge::{SearchDisabled, WebSearchTool, WikipediaClient};
use friday::model::ChatModel;
use friday::voice::{
    AudioCapture, AudioPlayback, ConsoleInput, ConsoleOutput, DEFAULT_ENERGY_THRESHOLD,
    MicrophoneListener, SpeechDetector, SpeechToText, TextToSpeech, VoiceSpeaker, rms_energy,
};
use friday::Config;

/// Friday - a voice assistant that listens, looks things up and talks back
#[derive(Parser)]
#[command(name = "friday", version, about)]
struct Cli {
    /// Name the agent answers to
    #[arg(short, long, env = "FRIDAY_NAME")]
    name: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Type and read instead of using the microphone and speaker
    #[arg(long, env = "FRIDAY_TEXT_MODE")]
    text: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
#[allow(clippy::enum_variant_names)]
enum Command {
    /// Route one typed utterance and print the reply
    Ask {
        /// What to say to the agent
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so `FRIDAY_NAME` and friends can come from `.env`
    let dotenv = friday::config::load_dotenv();
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,friday=info",
        1 => "info,friday=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring .env"),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = Overrides {
        name: cli.name.clone(),
        disable_voice: cli.text,
    };

    // Handle subcommands
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Ask { utterance } => ask(&overrides, &utterance.join(" ")).await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&overrides, &text).await,
            Command::Setup => friday::setup::run_setup(),
        };
    }

    tracing::info!(text_mode = cli.text, "starting up");

    let config = Config::load(&overrides)?;
    tracing::debug!(?config, "loaded configuration");

    let router = build_router(&config)?;

    if config.voice.enabled {
        let capture = microphone(&config)?;
        let output = speaker(&config)?;
        tracing::info!("friday ready - say \"{}\"", config.agent.name);
        converse(capture, output, router).await;
    } else {
        println!("Talk to {} (type \"exit\" to quit)", config.agent.name);
        converse(ConsoleInput::stdin(), ConsoleOutput::stdout(), router).await;
    }

    tracing::info!("closing down");
    Ok(())
}

/// Run the session loop until the user says goodbye
#[allow(clippy::future_not_send)]
async fn converse<C: SpeechCapture, S: SpeechOutput>(capture: C, output: S, router: IntentRouter) {
    let mut session = SessionLoop::new(capture, output, router);
    let summary = session.run().await;
    tracing::debug!(?summary, "session summary");
}

/// Wire the router to its lookup and conversation services
fn build_router(config: &Config) -> anyhow::Result<IntentRouter> {
    let encyclopedia: Arc<dyn EncyclopediaProvider> = Arc::new(WikipediaClient::new(
        &config.agent.wikipedia_language,
        config.agent.contact_email.as_deref(),
    )?);

    let web_search: Arc<dyn WebSearchProvider> = match config.search()? {
        Some(provider) => {
            tracing::info!(provider = provider.name(), "web search enabled");
            Arc::new(WebSearchTool::new(provider))
        }
        None => {
            tracing::warn!("no web search API key configured, web searches will fail");
            Arc::new(SearchDisabled)
        }
    };

    let chat = config.chat_model();
    if chat.api_key.is_none() {
        tracing::warn!(base_url = %chat.base_url, "no model API key configured");
    }
    let model = Arc::new(ChatModel::new(chat));

    Ok(IntentRouter::new(
        config.agent.name.clone(),
        encyclopedia,
        web_search,
        model,
    ))
}

fn microphone(config: &Config) -> anyhow::Result<MicrophoneListener> {
    let api_key = config
        .stt_api_key()
        .context("voice mode needs an STT API key (run `friday setup` or pass --text)")?;
    let stt = SpeechToText::new(
        config.voice.stt_provider,
        api_key.to_string(),
        config.voice.stt_model.clone(),
    )?;

    Ok(MicrophoneListener::new(
        AudioCapture::new()?,
        SpeechDetector::with_threshold(config.voice.energy_threshold),
        stt,
    ))
}

fn speaker(config: &Config) -> anyhow::Result<VoiceSpeaker> {
    let api_key = config
        .tts_api_key()
        .context("voice mode needs a TTS API key (run `friday setup` or pass --text)")?;
    let tts = TextToSpeech::new(
        config.voice.tts_provider,
        api_key.to_string(),
        config.tts_voice(),
    )?;

    Ok(VoiceSpeaker::new(tts, AudioPlayback::new()?))
}

/// Route a single utterance and print the reply
async fn ask(overrides: &Overrides, text: &str) -> anyhow::Result<()> {
    let config = Config::load(overrides)?;
    let mut router = build_router(&config)?;

    let reply = router.route(&Utterance::from(text.trim())).await;
    tracing::debug!(intent = %reply.intent, "routed");

    if !reply.is_silent() {
        println!("{}", reply.text);
    }
    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    let sample_rate = capture.sample_rate();
    println!("Sample rate: {sample_rate} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.drain();
        let energy = rms_energy(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("Speech is detected above an RMS of about {DEFAULT_ENERGY_THRESHOLD:.2};");
    println!("set voice.energy_threshold in the config file to adjust it.");

    Ok(())
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;

    let sample_rate = 24000_i32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), sample_rate);

    playback.play(samples).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");
    println!("If you didn't hear anything, check:");
    println!("  1. Run: pactl info | grep 'Default Sink'");
    println!("  2. Run: pactl list sinks short");
    println!("  3. Try: pavucontrol (to check output levels)");

    Ok(())
}

/// Synthesize and play a sentence with the configured voice
async fn test_tts(overrides: &Overrides, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load(overrides)?;
    let api_key = config
        .tts_api_key()
        .context("no TTS API key configured (run `friday setup`)")?;
    let tts = TextToSpeech::new(
        config.voice.tts_provider,
        api_key.to_string(),
        config.tts_voice(),
    )?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    if mp3_data.len() > 3 {
        println!(
            "First 4 bytes: {:02x} {:02x} {:02x} {:02x}",
            mp3_data[0], mp3_data[1], mp3_data[2], mp3_data[3]
        );
    }

    println!("Playing audio...");
    let mut playback = AudioPlayback::new()?;
    playback.play_mp3(&mp3_data).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
