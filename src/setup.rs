//! Interactive first-run setup wizard (`friday setup`)

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use crate::config::file::{
    self, AgentFileConfig, FridayConfigFile, ModelFileConfig, SearchFileConfig, VoiceFileConfig,
};
use crate::config::DEFAULT_AGENT_NAME;
use crate::model::DEFAULT_MODEL;

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Friday Setup\n");

    // Load existing config if present
    let existing = file::load_config_file();
    let config_path = file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/friday/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    let mut api_keys = existing.api_keys;

    // 1. Agent identity
    let name: String = Input::new()
        .with_prompt("What should the assistant be called?")
        .default(
            existing
                .agent
                .name
                .unwrap_or_else(|| DEFAULT_AGENT_NAME.to_string()),
        )
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("the name can't be blank")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let contact_email: String = Input::new()
        .with_prompt("Contact email sent to Wikipedia (leave blank to skip)")
        .default(existing.agent.contact_email.unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    // 2. Conversational model
    api_keys.openai = prompt_key("OpenAI", "OPENAI_API_KEY", api_keys.openai)?;

    let model: String = Input::new()
        .with_prompt("Chat model")
        .default(
            existing
                .model
                .model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        )
        .interact_text()?;

    // 3. Web search
    let providers = ["Google", "Serper", "Brave", "(none)"];
    let default_provider = existing
        .search
        .provider
        .as_deref()
        .and_then(|p| providers.iter().position(|&l| l.eq_ignore_ascii_case(p)))
        .unwrap_or(0);

    let provider_idx = Select::new()
        .with_prompt("Web search provider for \"search google for ...\"")
        .items(&providers)
        .default(default_provider)
        .interact()?;

    let search_provider = match provider_idx {
        0 => {
            api_keys.google = prompt_key("Google", "GOOGLE_API_KEY", api_keys.google)?;
            api_keys.google_cse_id =
                prompt_key("Search engine ID", "GOOGLE_CSE_ID", api_keys.google_cse_id)?;
            Some("google")
        }
        1 => {
            api_keys.serper = prompt_key("Serper", "SERPER_API_KEY", api_keys.serper)?;
            Some("serper")
        }
        2 => {
            api_keys.brave = prompt_key("Brave", "BRAVE_API_KEY", api_keys.brave)?;
            Some("brave")
        }
        _ => None,
    };

    // 4. Voice (optional)
    let voice_default = existing.voice.enabled.unwrap_or(true);
    let enable_voice = Confirm::new()
        .with_prompt("Use the microphone and speaker? (otherwise type to talk)")
        .default(voice_default)
        .interact()?;

    let voice = if enable_voice {
        if api_keys.openai.is_none() {
            println!("Voice uses OpenAI Whisper and TTS unless configured otherwise.");
            api_keys.openai = prompt_key("OpenAI", "OPENAI_API_KEY", None)?;
        }

        VoiceFileConfig {
            enabled: Some(true),
            stt_model: Some(
                existing
                    .voice
                    .stt_model
                    .unwrap_or_else(|| "whisper-1".to_string()),
            ),
            tts_model: Some(
                existing
                    .voice
                    .tts_model
                    .unwrap_or_else(|| "tts-1".to_string()),
            ),
            tts_voice: Some(
                existing
                    .voice
                    .tts_voice
                    .unwrap_or_else(|| "alloy".to_string()),
            ),
            tts_speed: existing.voice.tts_speed.or(Some(1.0)),
            ..existing.voice
        }
    } else {
        VoiceFileConfig {
            enabled: Some(false),
            ..existing.voice
        }
    };

    // 5. Build and write config
    let config_file = FridayConfigFile {
        agent: AgentFileConfig {
            name: Some(name.trim().to_string()),
            contact_email: non_empty(&contact_email),
            wikipedia_language: existing.agent.wikipedia_language,
        },
        voice,
        model: ModelFileConfig {
            model: Some(model),
            ..existing.model
        },
        search: SearchFileConfig {
            provider: search_provider.map(str::to_string),
        },
        api_keys,
    };

    file::write_config_file(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());

    let hint = if enable_voice { "friday -v" } else { "friday --text" };
    println!("\nSetup complete! Run `{hint}` to start.");

    Ok(())
}

/// Ask for an API key, keeping the current one on blank input
fn prompt_key(
    label: &str,
    env_hint: &str,
    current: Option<String>,
) -> anyhow::Result<Option<String>> {
    let prompt = match current.as_deref().map(mask_key) {
        Some(masked) => format!("{label} API key (current: {masked}, leave blank to keep)"),
        None => format!("{label} API key ({env_hint}, leave blank to skip)"),
    };

    let input: String = Input::new()
        .with_prompt(&prompt)
        .allow_empty(true)
        .interact_text()?;

    Ok(non_empty(&input).or(current))
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
