//! CLI argument parsing for checkpointstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ck")]
#[command(author, version, about = "Per-thread conversation checkpoint store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all threads with a checkpoint
    List,

    /// Display a thread's checkpoint as JSON
    Show {
        /// Thread id to display
        #[arg(required = true)]
        thread_id: String,
    },

    /// Delete a thread's checkpoint
    Delete {
        /// Thread id to delete
        #[arg(required = true)]
        thread_id: String,
    },
}
