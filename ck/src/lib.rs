//! CheckpointStore - per-thread conversation checkpoints
//!
//! Persists one JSON snapshot per logical conversation thread so that an
//! agent run can resume where the previous request left off. Writes go
//! through a temp file and an atomic rename, so an interrupted run leaves
//! the last complete snapshot untouched.
//!
//! # Layout
//!
//! ```text
//! .checkpoints/
//! ├── default.json
//! ├── trip-booking.json
//! └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use checkpointstore::ThreadStore;
//!
//! let store = ThreadStore::open(".checkpoints")?;
//! let state: MyState = store.load("default")?;   // Default::default() if absent
//! store.save("default", &state)?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{ThreadId, ThreadStore, validate_thread_id};

/// File extension used for thread snapshots
pub const SNAPSHOT_EXT: &str = "json";
