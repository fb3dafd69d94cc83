// Shadow.AI Command Line Interface
// Drive the meeting avatar brain from a terminal

mod console;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::json;
use shadow_brain::{
    analyze_response, AvatarSession, BrainConfig, CompletionBackend, ShadowSettings,
};
use shadow_llm::{LLMManager, Provider};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shadow")]
#[command(about = "Shadow.AI meeting avatar brain", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(long, short, global = true)]
    config: Option<String>,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console against a live provider
    Console {
        /// Meeting identifier for the session
        #[arg(long, default_value = "console")]
        meeting: String,
    },

    /// Print the system prompt for the configured persona
    Prompt,

    /// Classify a reply text into emotion and action
    Analyze {
        text: String,
    },

    /// Run one dialogue turn and print the reply as JSON
    Ask {
        text: String,

        /// Session metadata appended to the utterance
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Prompt => {
            println!("{}", shadow_brain::prompt::build_system_prompt(&settings.brain));
        }
        Commands::Analyze { text } => {
            let analysis = analyze_response(&text);
            let output = json!({
                "emotion": analysis.emotion,
                "action": analysis.action,
                "cue": analysis.cue(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Ask { text, context } => {
            let session = open_session("cli", &settings)?;
            let reply = session.respond(&text, context.as_deref()).await?;
            let output = json!({
                "reply": reply,
                "cue": reply.cue(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Console { meeting } => {
            let session = open_session(&meeting, &settings)?;
            let mut console = console::InteractiveConsole::new(session);
            console.run().await?;
        }
    }

    Ok(())
}

fn load_settings(path: Option<&str>) -> anyhow::Result<ShadowSettings> {
    let settings = match path {
        Some(path) => ShadowSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path))?,
        None => ShadowSettings::default(),
    };
    let settings = settings.merge_env();
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

fn open_session(meeting: &str, settings: &ShadowSettings) -> anyhow::Result<AvatarSession> {
    let manager = LLMManager::from_env(settings.llm.clone());
    let Some(provider) = manager.default_provider() else {
        bail!(
            "No LLM provider configured. Set {} or {}",
            Provider::GigaChat.env_var_name(),
            Provider::OpenAI.env_var_name()
        );
    };
    if !manager.configured_providers().contains(&provider) {
        warn!(
            "Default provider {} has no key; replies will fall back",
            provider.as_str()
        );
    }
    info!("Using LLM provider: {}", provider.as_str());

    let mut options = settings.options.clone();
    options.model = resolve_model(&options.model, provider);

    let backend: Arc<dyn CompletionBackend> = Arc::new(manager);
    let config: BrainConfig = settings.brain.clone();
    Ok(AvatarSession::new(meeting, config, options, backend)?)
}

/// The stock model name targets GigaChat; other providers get their own default.
fn resolve_model(model: &str, provider: Provider) -> String {
    if model == Provider::GigaChat.default_model() && provider != Provider::GigaChat {
        provider.default_model().to_string()
    } else {
        model.to_string()
    }
}
