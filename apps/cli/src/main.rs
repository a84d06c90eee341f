mod runtime;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use candor_dispatch::{CredentialConfig, OpenAiClient};
use candor_session_core::{SessionParams, spawn_session};
use candor_storage::{ContextStore, StoreKey};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::runtime::PrintRuntime;

#[derive(Parser)]
#[command(name = "candor", about = "Live interview question assistant")]
struct Cli {
    /// Context store file; defaults to the platform data dir.
    #[arg(long, global = true, env = "CANDOR_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the stored OpenAI API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Manage the stored resume context.
    Resume {
        #[command(subcommand)]
        action: ResumeAction,
    },
    /// Listen for questions: each stdin line extends the live transcript.
    Listen {
        /// OpenAI-compatible API base override.
        #[arg(long, env = "CANDOR_API_BASE")]
        api_base: Option<String>,

        /// Quiet period in milliseconds before a segment is evaluated.
        #[arg(long, default_value_t = 1500)]
        quiet_ms: u64,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Save the API key.
    Set { value: String },
    /// Remove the saved API key.
    Clear,
}

#[derive(Subcommand)]
enum ResumeAction {
    /// Read a resume file (.txt verbatim; .pdf/.doc/.docx by filename only).
    Set { path: PathBuf },
    /// Print the stored resume context.
    Show,
    /// Remove the stored resume context.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match cli.store {
        Some(path) => ContextStore::new(path),
        None => ContextStore::at_default_base()?,
    };

    match cli.command {
        Command::Key { action } => match action {
            KeyAction::Set { value } => {
                store.set(StoreKey::ApiKey, value).await?;
                eprintln!("API key saved");
            }
            KeyAction::Clear => {
                store.remove(StoreKey::ApiKey).await?;
                eprintln!("API key removed");
            }
        },
        Command::Resume { action } => match action {
            ResumeAction::Set { path } => {
                let content = candor_storage::read_resume_file(&path).await?;
                store.set(StoreKey::Resume, content).await?;
                eprintln!("Resume saved");
            }
            ResumeAction::Show => match store.get(StoreKey::Resume).await? {
                Some(resume) => println!("{resume}"),
                None => eprintln!("no resume stored"),
            },
            ResumeAction::Clear => {
                store.remove(StoreKey::Resume).await?;
                eprintln!("Resume data cleared");
            }
        },
        Command::Listen { api_base, quiet_ms } => {
            listen(&store, api_base, quiet_ms).await?;
        }
    }

    Ok(())
}

async fn listen(
    store: &ContextStore,
    api_base: Option<String>,
    quiet_ms: u64,
) -> anyhow::Result<()> {
    let Some(api_key) = store.get(StoreKey::ApiKey).await? else {
        anyhow::bail!("no API key stored; run `candor key set <value>` first");
    };

    let mut credential = CredentialConfig::new(api_key);
    if let Some(resume) = store.get(StoreKey::Resume).await? {
        credential = credential.with_resume(resume);
    }

    let client = match api_base {
        Some(base) => OpenAiClient::builder().api_base(base).build(),
        None => OpenAiClient::default(),
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let params = SessionParams::new(session_id, credential)
        .with_quiet_interval(Duration::from_millis(quiet_ms));
    let handle = spawn_session(Arc::new(PrintRuntime), client, params);

    eprintln!("Type lines of speech; questions are answered after a pause.");
    eprintln!("Press Ctrl+C (or close stdin) to stop.");

    let mut transcript = String::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => {
                    // Stdin simulates cumulative recognition snapshots: every
                    // line extends the same growing transcript.
                    if !transcript.is_empty() {
                        transcript.push(' ');
                    }
                    transcript.push_str(line.trim());
                    handle.update_transcript(transcript.clone())?;
                }
                None => break,
            },
        }
    }

    eprintln!("Stopping session...");
    handle.stop().await;
    Ok(())
}
