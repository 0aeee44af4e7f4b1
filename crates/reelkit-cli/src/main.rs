use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use reelkit_core::{Assistant, AssistantEvent, Notifier, SessionHandle};
use reelkit_db::SqliteGateway;
use reelkit_wizard::WizardStore;

#[derive(Parser)]
#[command(name = "reelkit")]
struct Cli {
    /// Model id to talk to.
    #[arg(long, default_value = reelkit_anthropic::DEFAULT_MODEL_ID)]
    model: String,

    /// Sqlite database path. Defaults to the app data directory.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Session key; reusing a key resumes the same stored project.
    #[arg(long, default_value = "local")]
    session: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let db_path = match cli.db {
        Some(path) => path,
        None => reelkit_app::project_db_path()?,
    };
    let gateway = Arc::new(SqliteGateway::open(&db_path)?);

    let notifier = Notifier::new();
    spawn_notification_printer(&notifier);

    let session = SessionHandle::new(&cli.session, WizardStore::new(), gateway, notifier);
    let model = reelkit_anthropic::from_env(&cli.model);
    let assistant = Assistant::new(model, session.clone());

    println!("reelkit — type a message, /state to inspect, /reset to start over, /quit to exit.");
    for message in assistant.messages() {
        if let Some(text) = message.text() {
            println!("assistant: {text}");
        }
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                assistant.reset();
                println!("(conversation and wizard state cleared)");
                continue;
            }
            "/state" => {
                let state = session.store().current();
                println!("{}", serde_json::to_string_pretty(&state)?);
                continue;
            }
            _ => {}
        }

        let mut stream = assistant.send(line);
        while let Some(event) = stream.next().await {
            match event {
                AssistantEvent::UserMessage { .. } => {}
                AssistantEvent::ToolCallStart { name, .. } => {
                    println!("  [tool] {name} ...");
                }
                AssistantEvent::ToolCallDone { content, .. } => {
                    println!("  [tool] -> {content}");
                }
                AssistantEvent::AssistantMessage { content } => {
                    println!("assistant: {content}");
                }
                AssistantEvent::TurnComplete { usage } => {
                    println!(
                        "  ({} in / {} out tokens)",
                        usage.input_tokens, usage.output_tokens
                    );
                }
                AssistantEvent::Error { error } => {
                    eprintln!("error: {error}");
                }
            }
        }
    }

    Ok(())
}

/// Print out-of-band UI notifications (generation requests and the like)
/// as they arrive, without blocking the chat loop.
fn spawn_notification_printer(notifier: &Notifier) {
    let mut rx = notifier.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            println!("  [notify] {}: {}", event.name, event.detail);
        }
    });
}
