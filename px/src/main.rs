//! PlanExec - plan-execute conversational agent
//!
//! CLI entry point for one-shot chat, the interactive REPL and thread
//! administration.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use checkpointstore::ThreadStore;
use planexec::cli::{Cli, Command, ThreadsCommand, get_log_path};
use planexec::config::Config;
use planexec::repl;
use planexec::service::PlanExecuteService;
use planexec::tools::ToolRegistry;
use planexec::ChatRequest;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planexec")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, not stdout/stderr - the terminal is for chat.
    // Append so `px logs` can show output from earlier runs.
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("planexec.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "PlanExec loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Chat { message, thread } => cmd_chat(&config, &message, &thread).await,
        Command::Repl { thread } => repl::run_interactive(&config, thread).await,
        Command::Threads { command } => cmd_threads(&config, command),
        Command::Tools => cmd_tools(),
        Command::Logs { lines } => cmd_logs(lines),
    }
}

/// Send one message and print the response
async fn cmd_chat(config: &Config, message: &str, thread: &str) -> Result<()> {
    config.validate()?;

    let service = PlanExecuteService::from_config(config)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = repl::spawn_event_printer(rx);

    let req = ChatRequest::new(message, thread);
    let result = service.chat_with_events(&req, Some(&tx)).await;

    drop(tx);
    let _ = printer.await;

    match result {
        Ok(response) => {
            println!("\n{}", response.response);
            Ok(())
        }
        Err(e) => Err(eyre::eyre!("Chat failed: {}", e)),
    }
}

/// Inspect and manage conversation threads
fn cmd_threads(config: &Config, command: ThreadsCommand) -> Result<()> {
    let store = ThreadStore::open(&config.storage.checkpoint_dir)?;

    match command {
        ThreadsCommand::List => {
            let threads = store.list()?;
            if threads.is_empty() {
                println!("No threads found");
            } else {
                for thread in threads {
                    println!("{}", thread);
                }
            }
        }
        ThreadsCommand::Show { thread_id } => match store.raw(&thread_id)? {
            Some(content) => println!("{}", content),
            None => println!("No checkpoint for thread: {}", thread_id.yellow()),
        },
        ThreadsCommand::Delete { thread_id } => {
            store.delete(&thread_id)?;
            println!("{} Deleted thread: {}", "✓".green(), thread_id);
        }
    }

    Ok(())
}

/// Show the last N log lines
fn cmd_logs(lines: usize) -> Result<()> {
    let log_path = get_log_path();

    if !log_path.exists() {
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    let file = fs::File::open(&log_path).context("Failed to open log file")?;
    let reader = BufReader::new(file);
    let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{}", line);
    }

    Ok(())
}

/// List registered tools with their descriptions
fn cmd_tools() -> Result<()> {
    let registry = ToolRegistry::standard();

    println!("Registered tools:");
    println!();
    for def in registry.definitions() {
        println!("  {}", def.name.bold());
        println!("    {}", def.description);
    }

    Ok(())
}
