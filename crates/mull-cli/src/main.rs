//! mull - terminal chat with a local reasoning model

mod commands;
mod config;
mod ui;
mod utils;

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use mull_agent::{OllamaTransport, Orchestrator, OrchestratorConfig, TurnHandle};
use mull_ai::models::{self, FileModelSource};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// mull - chat with a local reasoning model
#[derive(Parser, Debug)]
#[command(name = "mull")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model to use (default: first entry of the models file)
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the inference server (default: http://localhost:11434)
    #[arg(long)]
    base_url: Option<String>,

    /// File listing selectable models, one per line (default: models.txt)
    #[arg(long)]
    models_file: Option<String>,

    /// Abort a turn after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Run in non-interactive mode with a single prompt
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// List selectable models and exit
    #[arg(long)]
    list_models: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never mix with the answer
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("mull=debug,mull_ai=debug,mull_agent=debug")
            .with_writer(io::stderr)
            .init();
    }

    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let cfg = config::Config::load();

    // CLI takes precedence over the config file
    let models_file = args
        .models_file
        .or(cfg.models_file.clone())
        .unwrap_or_else(|| models::DEFAULT_MODELS_FILE.to_string());
    let available_models = models::available_models(&FileModelSource::new(models_file));

    let model = args
        .model
        .or(cfg.model.clone())
        .or_else(|| available_models.first().cloned())
        .unwrap_or_else(|| models::DEFAULT_MODEL.to_string());

    let base_url = args
        .base_url
        .or(cfg.base_url.clone())
        .unwrap_or_else(|| mull_ai::DEFAULT_BASE_URL.to_string());

    let timeout = match args.timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => cfg.timeout(),
    };

    if args.list_models {
        println!("{}", commands::ModelCommand::list(&model, &available_models));
        return Ok(());
    }

    tracing::debug!(%model, %base_url, ?timeout, "Starting");

    let transport = Arc::new(OllamaTransport::new(base_url));
    let base_url = transport.base_url().to_string();
    let mut orchestrator = Orchestrator::new(
        OrchestratorConfig { model, timeout },
        transport,
    );

    spawn_interrupt_handler(orchestrator.handle());

    if let Some(command) = args.command {
        return run_command(&mut orchestrator, &command, &base_url).await;
    }

    run_interactive(&mut orchestrator, &available_models, &base_url).await
}

/// How long an aborted turn may take to wind down before Ctrl-C exits
const ABORT_GRACE: Duration = Duration::from_secs(2);

/// Ctrl-C aborts the running turn; at the prompt it exits.
fn spawn_interrupt_handler(handle: TurnHandle) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if handle.is_running() {
                tracing::debug!("Interrupt: aborting turn");
                handle.abort();
                if !handle.wait_for_idle_timeout(ABORT_GRACE).await {
                    eprintln!("\nTurn did not stop; exiting.");
                    std::process::exit(130);
                }
            } else {
                println!();
                std::process::exit(130);
            }
        }
    });
}

/// Render events for one turn until it ends
fn spawn_renderer(orchestrator: &Orchestrator, base_url: &str) -> JoinHandle<()> {
    let mut receiver = orchestrator.subscribe();
    let is_tty = io::stdout().is_terminal();
    let mut view = ui::TerminalView::new(io::stdout(), io::stderr(), is_tty, base_url);

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match view.handle_event(&event) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!("Failed to render event: {}", e);
                        break;
                    }
                },
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!("Renderer lagged by {} events", n);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn run_command(
    orchestrator: &mut Orchestrator,
    command: &str,
    base_url: &str,
) -> anyhow::Result<()> {
    let renderer = spawn_renderer(orchestrator, base_url);
    let result = orchestrator.submit(command).await;
    renderer.await?;

    // The renderer already reported the failure
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_interactive(
    orchestrator: &mut Orchestrator,
    available_models: &[String],
    base_url: &str,
) -> anyhow::Result<()> {
    if io::stderr().is_terminal() {
        eprintln!("mull ({}) - /help for commands", orchestrator.model());
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(result) = commands::execute_command(
            input,
            orchestrator.history(),
            orchestrator.model(),
            available_models,
        ) {
            match result {
                commands::CommandResult::Exit => break,
                commands::CommandResult::Message(msg) => {
                    println!("{}", msg);
                }
                commands::CommandResult::ChangeModel(model) => {
                    println!("Switched to: {}", model);
                    orchestrator.set_model(model);
                }
                commands::CommandResult::Unknown(cmd) => {
                    println!("Unknown command: /{}", cmd);
                    println!("Type /help for available commands.");
                }
            }
            println!();
            continue;
        }

        println!();
        let renderer = spawn_renderer(orchestrator, base_url);
        // Failures are rendered as notices; the session continues
        let _ = orchestrator.submit(input).await;
        renderer.await?;
        println!();
    }

    Ok(())
}
