//! Line Miner - cooperative proof-of-work over lines of text
//!
//! Every submitted line is hashed with SHA-256 together with fresh random
//! nonces until a digest with the required number of leading zero hex digits
//! turns up. Searches run side by side on a single thread and take turns at
//! fixed round intervals, so the loop reading new lines stays responsive.
//!
//! # Example
//!
//! ```no_run
//! use line_miner_rs::{ConsoleSink, InputPolicy, OsNonceSource, Session, run_local};
//! use line_miner_rs::config::DifficultyConfig;
//! use std::collections::VecDeque;
//! use std::rc::Rc;
//!
//! let report = run_local(async {
//!     let sink = Rc::new(ConsoleSink::new(std::io::stdout()));
//!     let session = Session::new(
//!         DifficultyConfig::default(),
//!         InputPolicy::Concurrent,
//!         sink,
//!         OsNonceSource,
//!     )?;
//!     let lines: VecDeque<String> = VecDeque::from(vec!["abc".to_string()]);
//!     session.run(lines, std::future::pending()).await
//! })??;
//! assert_eq!(report.results.len(), 1);
//! # Ok::<(), line_miner_rs::MinerError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Miner core: hashing, difficulty, engine, registry and scheduler
pub mod miner;

/// Event sinks receiving job progress and results
pub mod output;

/// Line sources feeding the session
pub mod input;

/// Host loop tying input, scheduler and sink together
pub mod session;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

#[cfg(test)]
mod test_utils;

// Core exports
pub use cli::Commands;
pub use config::{Config, InputPolicy, OutputFormat};
pub use input::LineSource;
pub use miner::{
    JobOutcome, JobRegistry, MiningEngine, NonceSource, OsNonceSource, Scheduler,
    SequenceNonceSource, run_local,
};
pub use output::{ConsoleSink, EventSink, JsonSink};
pub use session::{Session, SessionEnd, SessionReport};
pub use types::{Job, JobId, JobStatus, MiningEvent, MiningResult};
pub use utils::{MinerError, init_logging};
