//! Interactive REPL for PlanExec
//!
//! Line-based chat session with slash commands for thread management and
//! progress lines printed while a turn runs.

use colored::*;
use eyre::Result;
use rand::Rng;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::agent::{AgentEvent, ChatRequest};
use crate::config::Config;
use crate::service::PlanExecuteService;

/// Spawn a task that prints agent events as progress lines
///
/// Runs until the event channel closes (i.e. the turn is over).
pub fn spawn_event_printer(mut rx: mpsc::UnboundedReceiver<AgentEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                AgentEvent::PlanCreated { steps } => {
                    println!("{} planned {} step(s)", "→".cyan(), steps.len());
                    for (i, step) in steps.iter().enumerate() {
                        println!("    {}. {}", i + 1, step);
                    }
                }
                AgentEvent::StepStarted { step } => {
                    println!("{} {}", "⚙".yellow(), step);
                }
                AgentEvent::ToolInvoked { tool } => {
                    println!("    {} {}", "tool:".dimmed(), tool);
                }
                AgentEvent::ToolObserved { tool, preview } => {
                    println!("    {} {}: {}", "obs:".dimmed(), tool, preview);
                }
                AgentEvent::StepCompleted { preview, .. } => {
                    println!("    {} {}", "✓".green(), preview);
                }
                AgentEvent::PlanRevised { steps } => {
                    println!("{} plan revised, {} step(s) remain", "→".cyan(), steps.len());
                }
                AgentEvent::Completed { .. } => {}
            }
        }
    })
}

/// Run the interactive REPL
///
/// This is the main entry point for `px repl`.
pub async fn run_interactive(config: &Config, initial_thread: String) -> Result<()> {
    config.validate()?;

    let service = PlanExecuteService::from_config(config)?;
    let mut thread = initial_thread;
    let mut rl = DefaultEditor::new()?;

    println!(
        "PlanExec interactive session. {} switches threads, {} starts a fresh one, {} exits.",
        "/thread <id>".bold(),
        "/new".bold(),
        "/quit".bold()
    );

    loop {
        match rl.readline(&format!("{}> ", thread.cyan())) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Some(rest) = line.strip_prefix("/thread") {
                    let candidate = rest.trim();
                    match checkpointstore::validate_thread_id(candidate) {
                        Ok(()) => {
                            thread = candidate.to_string();
                            println!("switched to thread {}", thread.cyan());
                        }
                        Err(e) => println!("{} {}", "error:".red(), e),
                    }
                    continue;
                }

                match line.as_str() {
                    "/quit" | "/exit" => break,
                    "/new" => {
                        thread = fresh_thread_id();
                        println!("switched to thread {}", thread.cyan());
                        continue;
                    }
                    _ => {}
                }

                let (tx, rx) = mpsc::unbounded_channel();
                let printer = spawn_event_printer(rx);

                let req = ChatRequest::new(line, thread.clone());
                let result = service.chat_with_events(&req, Some(&tx)).await;

                // Close the channel so the printer drains and exits
                drop(tx);
                let _ = printer.await;

                match result {
                    Ok(response) => println!("\n{}\n", response.response),
                    Err(e) => println!("{} {}", "error:".red(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(eyre::eyre!("Readline error: {}", e)),
        }
    }

    Ok(())
}

/// Generate a fresh short thread id
fn fresh_thread_id() -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    let suffix: String = (0..6).map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char).collect();
    format!("thread-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_thread_id_is_valid() {
        let id = fresh_thread_id();
        assert!(id.starts_with("thread-"));
        assert!(checkpointstore::validate_thread_id(&id).is_ok());
    }

    #[test]
    fn test_fresh_thread_ids_differ() {
        assert_ne!(fresh_thread_id(), fresh_thread_id());
    }
}
