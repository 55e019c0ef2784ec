//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PlanExec - plan-execute conversational agent
#[derive(Parser)]
#[command(
    name = "px",
    about = "Plan-execute conversational agent with tool use",
    version,
    after_help = "Logs are written to: ~/.local/share/planexec/logs/planexec.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Send one message and print the response
    Chat {
        /// The user message
        message: String,

        /// Thread id (multi-turn follow-ups reuse the same id)
        #[arg(short, long, default_value = "default")]
        thread: String,
    },

    /// Interactive chat session
    Repl {
        /// Thread id to start on
        #[arg(short, long, default_value = "default")]
        thread: String,
    },

    /// Inspect and manage conversation threads
    Threads {
        #[command(subcommand)]
        command: ThreadsCommand,
    },

    /// List registered tools
    Tools,

    /// Show recent log output
    Logs {
        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}

/// Thread management subcommands
#[derive(Subcommand)]
pub enum ThreadsCommand {
    /// List all threads with a checkpoint
    List,

    /// Display a thread's checkpoint as JSON
    Show {
        /// Thread id to display
        thread_id: String,
    },

    /// Delete a thread's checkpoint
    Delete {
        /// Thread id to delete
        thread_id: String,
    },
}

/// Path to the log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planexec")
        .join("logs")
        .join("planexec.log")
}
