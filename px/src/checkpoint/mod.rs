//! CheckpointManager - actor that owns the ThreadStore
//!
//! Serializes all checkpoint reads and writes through one task, which
//! gives read-your-writes ordering per thread and safe concurrent access
//! across threads.

use std::path::Path;

use checkpointstore::ThreadStore;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::agent::ConversationState;

/// Errors from the checkpoint boundary
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Checkpoint actor channel closed")]
    ChannelError,

    #[error("Checkpoint store error: {0}")]
    StoreError(String),
}

enum CheckpointCommand {
    Load {
        thread_id: String,
        reply: oneshot::Sender<Result<ConversationState, StateError>>,
    },
    Save {
        thread_id: String,
        state: Box<ConversationState>,
        reply: oneshot::Sender<Result<(), StateError>>,
    },
    Delete {
        thread_id: String,
        reply: oneshot::Sender<Result<(), StateError>>,
    },
    List {
        reply: oneshot::Sender<Result<Vec<String>, StateError>>,
    },
}

/// Handle to send commands to the checkpoint actor
#[derive(Clone)]
pub struct CheckpointManager {
    tx: mpsc::Sender<CheckpointCommand>,
}

impl CheckpointManager {
    /// Spawn a new checkpoint actor over a store directory
    pub fn spawn(store_path: impl AsRef<Path>) -> eyre::Result<Self> {
        let store = ThreadStore::open(store_path.as_ref())?;
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(actor_loop(store, rx));
        info!(store_path = %store_path.as_ref().display(), "CheckpointManager spawned");

        Ok(Self { tx })
    }

    /// Load the state for a thread (empty default when absent)
    pub async fn load(&self, thread_id: &str) -> Result<ConversationState, StateError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CheckpointCommand::Load {
                thread_id: thread_id.to_string(),
                reply,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Persist the state for a thread
    pub async fn save(&self, thread_id: &str, state: &ConversationState) -> Result<(), StateError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CheckpointCommand::Save {
                thread_id: thread_id.to_string(),
                state: Box::new(state.clone()),
                reply,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Delete a thread's checkpoint (administrative operation)
    pub async fn delete(&self, thread_id: &str) -> Result<(), StateError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CheckpointCommand::Delete {
                thread_id: thread_id.to_string(),
                reply,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// List all checkpointed thread ids
    pub async fn list(&self) -> Result<Vec<String>, StateError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(CheckpointCommand::List { reply })
            .await
            .map_err(|_| StateError::ChannelError)?;
        rx.await.map_err(|_| StateError::ChannelError)?
    }
}

/// The actor loop that owns the store and processes commands in order
async fn actor_loop(store: ThreadStore, mut rx: mpsc::Receiver<CheckpointCommand>) {
    debug!("Checkpoint actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            CheckpointCommand::Load { thread_id, reply } => {
                debug!(%thread_id, "actor_loop: Load command");
                let result = store
                    .load::<ConversationState>(&thread_id)
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            CheckpointCommand::Save { thread_id, state, reply } => {
                debug!(%thread_id, "actor_loop: Save command");
                let result = store
                    .save(&thread_id, state.as_ref())
                    .map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            CheckpointCommand::Delete { thread_id, reply } => {
                debug!(%thread_id, "actor_loop: Delete command");
                let result = store.delete(&thread_id).map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }

            CheckpointCommand::List { reply } => {
                debug!("actor_loop: List command");
                let result = store.list().map_err(|e| StateError::StoreError(e.to_string()));
                let _ = reply.send(result);
            }
        }
    }

    debug!("Checkpoint actor stopped");
}
