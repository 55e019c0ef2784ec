use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use checkpointstore::ThreadStore;
use checkpointstore::cli::Cli;
use checkpointstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("checkpointstore starting");

    match cli.command {
        checkpointstore::cli::Command::List => {
            let store = ThreadStore::open(&config.store_path)?;
            let threads = store.list()?;
            if threads.is_empty() {
                println!("No threads found");
            } else {
                for thread in threads {
                    println!("{}", thread);
                }
            }
        }
        checkpointstore::cli::Command::Show { thread_id } => {
            let store = ThreadStore::open(&config.store_path)?;
            match store.raw(&thread_id)? {
                Some(content) => println!("{}", content),
                None => println!("No checkpoint for thread: {}", thread_id.yellow()),
            }
        }
        checkpointstore::cli::Command::Delete { thread_id } => {
            let store = ThreadStore::open(&config.store_path)?;
            store.delete(&thread_id)?;
            println!("{} Deleted thread: {}", "✓".green(), thread_id);
        }
    }

    Ok(())
}
