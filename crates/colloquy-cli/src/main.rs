mod commands;
mod config;
mod health;
mod store;
mod terminal;

use anyhow::Context;
use colloquy_persist::{MessageCache, ThreadRegistry};
use colloquy_session::{SessionError, SessionOrchestrator};
use colloquy_stream::{HttpAgentClient, StreamingClient};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::commands::{Command, HELP};
use crate::config::Config;
use crate::terminal::{Input, TerminalPrompt, TerminalUi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(
        account_id = %config.account.id,
        base_url = %config.agent.base_url,
        "Starting Colloquy"
    );

    let store = store::build_store(&config).await?;
    let registry = Arc::new(
        ThreadRegistry::load(
            store,
            Arc::new(MessageCache::new()),
            config.account.id.clone(),
            config.account.subscription_tier,
        )
        .await,
    );

    let agent = HttpAgentClient::new(&config.agent).context("Failed to build agent client")?;
    let client = StreamingClient::new(Arc::new(agent), config.account.id.clone(), registry.quota())
        .with_config(config.agent.clone());

    let input = terminal::stdin_lines();
    let session = Arc::new(
        SessionOrchestrator::builder()
            .registry(registry)
            .client(client.clone())
            .prompt(Arc::new(TerminalPrompt::new(input.clone())))
            .ui(Arc::new(TerminalUi))
            .build()?,
    );

    session.cleanup_abandoned_threads().await;

    let poller = health::spawn_health_poller(client, health::POLL_INTERVAL);
    let renderer = terminal::spawn_renderer(session.subscribe_view());

    println!("{}", HELP);
    list_threads(&session);

    let result = run(&session, &input).await;

    poller.abort();
    renderer.abort();
    tracing::info!("Session closed");
    result
}

async fn run(session: &Arc<SessionOrchestrator>, input: &Input) -> anyhow::Result<()> {
    loop {
        print!("> ");
        terminal::flush();

        let line = { input.lock().await.next_line().await? };
        let Some(line) = line else {
            return Ok(());
        };
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Send(text) => {
                session.ensure_thread_on_focus().await;
                match session.send_message(&text).await {
                    Ok(outcome) => tracing::debug!(outcome = ?outcome, "Turn done"),
                    Err(e) => println!("{}", e),
                }
            }
            Command::New => {
                let _ = session.switch_to(None);
                match session.start_new_chat().await {
                    Ok(thread) => println!("new chat {}", thread.id),
                    Err(e) => println!("{}", e),
                }
            }
            Command::Home => {
                let _ = session.switch_to(None);
            }
            Command::Switch(id) => {
                if session.switch_to(Some(&id)).is_none() {
                    println!("{}", SessionError::ThreadNotFound(id));
                }
            }
            Command::Delete(id) => match session.delete_thread(&id).await {
                Ok(thread) => println!("deleted \"{}\"", thread.name),
                Err(e) => println!("{}", e),
            },
            Command::Clear => match session.clear_current().await {
                Ok(thread) => println!("deleted \"{}\"", thread.name),
                Err(e) => println!("{}", e),
            },
            Command::List => list_threads(session),
            Command::Health => {
                let report = session.client().health().await;
                println!(
                    "{:?} (version {}, database {}, checkpointer {})",
                    report.status, report.version, report.database, report.checkpointer
                );
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(()),
            Command::Unknown(raw) => println!("unknown command: {} (try /help)", raw),
        }
    }
}

fn list_threads(session: &SessionOrchestrator) {
    let registry = session.registry();
    let current = registry.current();
    println!("chats ({}/{}):", registry.len(), registry.quota());
    for thread in registry.threads() {
        let marker = if current.as_deref() == Some(thread.id.as_str()) { "*" } else { " " };
        println!(" {} {}  {}", marker, thread.id, thread.name);
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
