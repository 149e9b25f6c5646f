//! CLI entry point for aura-chat

mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use aura_chat::{ExchangeController, VoiceAdapter};
use aura_core::config::{Config, ConfigLoader};
use aura_core::logging::init_logging;
use aura_core::session::{ChatStore, SessionManager};
use aura_providers::{AnswerClient, AnswerProvider, SpeechSynthesizer, Transcriber};
use view::ConsoleView;

#[derive(Parser)]
#[command(name = "aura")]
#[command(about = "Terminal chat client for the Aura answering service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize aura-chat configuration
    Onboard,
    /// Interactive chat
    Chat {
        /// Reopen a specific session instead of the last active one
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Send a single question and print the answer
    Ask {
        /// Question to send
        #[arg(short, long)]
        question: String,
        /// Session to append the exchange to
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Show configuration and service status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = if let Some(dir) = cli.config_dir {
        ConfigLoader::with_dir(dir)
    } else {
        ConfigLoader::new()
    };

    match cli.command {
        Commands::Onboard => {
            run_onboard(&loader)?;
        }
        Commands::Chat { session } => {
            let config = loader.load()?;
            let _guard = init_logging(&config.logging);
            info!("Starting interactive chat");
            run_chat(&config, session).await?;
        }
        Commands::Ask { question, session } => {
            let config = loader.load()?;
            let _guard = init_logging(&config.logging);
            run_ask(&config, &question, session).await?;
        }
        Commands::Status => {
            let config = loader.load()?;
            run_status(&loader, &config)?;
        }
    }

    Ok(())
}

/// Expand tilde in path
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn build_controller(config: &Config) -> ExchangeController<ConsoleView> {
    let data_dir = expand_tilde(&config.storage.data_dir);
    let sessions = SessionManager::new(ChatStore::with_dir(&data_dir));
    let provider: Arc<dyn AnswerProvider> =
        Arc::new(AnswerClient::new(config.ask.base_url.clone()));
    let voice = VoiceAdapter::new(&config.voice, data_dir.join("audio"));
    ExchangeController::new(sessions, ConsoleView::new(), provider, Some(voice))
}

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_help() {
    println!("Commands:");
    println!("  /new               start a new chat");
    println!("  /history           list saved chats");
    println!("  /open <n|id>       switch to a chat from the history list");
    println!("  /rename [n|id]     rename a chat (current one by default)");
    println!("  /delete [n|id]     delete a chat (current one by default)");
    println!("  /clear             delete ALL chat history");
    println!("  /mic <audio-file>  ask with a recorded question");
    println!("  /speak             speak the last answer again");
    println!("  /quit              exit");
    println!("Anything else is sent as a question.");
}

/// Resolve a `/history` index or raw id; defaults to the current session
fn resolve_session(controller: &ExchangeController<ConsoleView>, arg: &str) -> Option<String> {
    if arg.is_empty() {
        return controller.sessions().current_id().map(str::to_string);
    }
    if let Ok(index) = arg.parse::<usize>() {
        let history = controller.sessions().history();
        if (1..=history.len()).contains(&index) {
            return Some(history[index - 1].id.clone());
        }
    }
    Some(arg.to_string())
}

async fn run_chat(config: &Config, session: Option<String>) -> Result<()> {
    let mut controller = build_controller(config);
    controller.startup()?;
    if let Some(id) = session {
        if !controller.open(&id)? {
            println!("{} unknown session {}", style("!").yellow().bold(), id);
        }
    }

    println!(
        "{}",
        style("Aura chat — type a question, /help for commands.").cyan()
    );

    loop {
        let line = match Input::<String>::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(_) => break,
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('/') {
            let mut parts = rest.splitn(2, ' ');
            let command = parts.next().unwrap_or("");
            let arg = parts.next().unwrap_or("").trim().to_string();
            match command {
                "quit" | "q" => break,
                "help" => print_help(),
                "new" => {
                    controller.new_chat()?;
                }
                "history" => controller.view().show_history(),
                "open" => {
                    if arg.is_empty() {
                        println!("Usage: /open <number|id>");
                    } else if let Some(id) = resolve_session(&controller, &arg) {
                        controller.open(&id)?;
                    }
                }
                "rename" => run_rename(&mut controller, &arg)?,
                "delete" => run_delete(&mut controller, &arg)?,
                "clear" => run_clear(&mut controller)?,
                "mic" => run_mic(&mut controller, &arg).await?,
                "speak" => controller.speak_last().await,
                other => println!("Unknown command: /{}", other),
            }
        } else {
            let spinner = start_spinner("thinking...");
            controller.send(&line).await?;
            spinner.finish_and_clear();
        }
    }

    Ok(())
}

fn run_rename(controller: &mut ExchangeController<ConsoleView>, arg: &str) -> Result<()> {
    let Some(id) = resolve_session(controller, arg) else {
        println!("No chat selected.");
        return Ok(());
    };
    let initial = controller
        .sessions()
        .get(&id)
        .map(|session| session.title.clone())
        .unwrap_or_default();

    let new_title = match Input::<String>::new()
        .with_prompt("Enter new chat name")
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
    {
        Ok(title) => title,
        // Cancel is a no-op
        Err(_) => return Ok(()),
    };
    controller.rename(&id, &new_title)?;
    Ok(())
}

fn run_delete(controller: &mut ExchangeController<ConsoleView>, arg: &str) -> Result<()> {
    let Some(id) = resolve_session(controller, arg) else {
        println!("No chat selected.");
        return Ok(());
    };
    let confirmed = Confirm::new()
        .with_prompt("Delete this chat permanently?")
        .default(false)
        .interact()
        .unwrap_or(false);
    if confirmed {
        controller.delete(&id)?;
    }
    Ok(())
}

fn run_clear(controller: &mut ExchangeController<ConsoleView>) -> Result<()> {
    let confirmed = Confirm::new()
        .with_prompt("Are you sure you want to delete ALL chat history?")
        .default(false)
        .interact()
        .unwrap_or(false);
    if confirmed {
        controller.clear_all()?;
    }
    Ok(())
}

async fn run_mic(controller: &mut ExchangeController<ConsoleView>, arg: &str) -> Result<()> {
    if arg.is_empty() {
        println!("Usage: /mic <audio-file>");
        return Ok(());
    }
    let spinner = start_spinner("listening...");
    controller.send_voice(Path::new(arg)).await?;
    spinner.finish_and_clear();
    Ok(())
}

async fn run_ask(config: &Config, question: &str, session: Option<String>) -> Result<()> {
    let mut controller = build_controller(config);
    controller.startup()?;
    if let Some(id) = session {
        if !controller.open(&id)? {
            anyhow::bail!("No session {}", id);
        }
    }

    let spinner = start_spinner("thinking...");
    controller.send(question).await?;
    spinner.finish_and_clear();
    Ok(())
}

/// Run the onboard wizard
fn run_onboard(loader: &ConfigLoader) -> Result<()> {
    println!("{}", style("Welcome to Aura!").bold().cyan());
    println!("Let's set up your configuration.\n");

    let config_path = loader.config_dir().join("config.json");
    if config_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt("Configuration already exists. Overwrite?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Onboard cancelled.");
            return Ok(());
        }
    }

    let base_url: String = Input::new()
        .with_prompt("Answering service base URL")
        .default("http://localhost:5000".to_string())
        .interact_text()?;

    let mut config = Config::default();
    config.ask.base_url = base_url;

    let enable_voice = Confirm::new()
        .with_prompt("Enable voice input/output?")
        .default(false)
        .interact()?;
    if enable_voice {
        let transcription_key: String = Input::new()
            .with_prompt("Transcription API key (Groq, empty to skip)")
            .allow_empty(true)
            .interact_text()?;
        config.voice.transcription.api_key = transcription_key;

        let speech_key: String = Input::new()
            .with_prompt("Speech API key (empty to skip)")
            .allow_empty(true)
            .interact_text()?;
        config.voice.speech.api_key = speech_key;
    }

    loader.save(&config)?;

    println!(
        "\n{}",
        style("Configuration saved successfully!").green().bold()
    );
    println!("Config location: {}", config_path.display());
    println!("\nYou can now run:");
    println!("  {} - Start chatting", style("aura chat").cyan());
    println!(
        "  {} - One-shot question",
        style("aura ask --question 'Hello!'").cyan()
    );

    Ok(())
}

/// Show system status
fn run_status(loader: &ConfigLoader, config: &Config) -> Result<()> {
    println!("{}", style("Aura Status").bold().cyan());
    println!();

    println!("{}", style("Configuration:").bold());
    println!("  Config directory: {}", loader.config_dir().display());
    println!("  Answering service: {}", config.ask.base_url);
    let data_dir = expand_tilde(&config.storage.data_dir);
    println!("  Data directory: {}", data_dir.display());
    println!();

    println!("{}", style("Voice:").bold());
    let transcriber = Transcriber::new(&config.voice.transcription);
    let synthesizer = SpeechSynthesizer::new(&config.voice.speech);
    for (name, configured) in [
        ("speech-to-text", transcriber.is_configured()),
        ("text-to-speech", synthesizer.is_configured()),
    ] {
        let status = if configured {
            style("configured").green()
        } else {
            style("not configured").red()
        };
        println!("  {}: {}", name, status);
    }
    println!();

    println!("{}", style("Sessions:").bold());
    let store = ChatStore::with_dir(&data_dir);
    println!("  Stored chats: {}", store.load_all().len());
    match store.last_active_id() {
        Some(id) => println!("  Last active: {}", id),
        None => println!("  Last active: -"),
    }

    Ok(())
}
