// src/miner/mod.rs
//! Core mining functionality
//!
//! This module contains all components related to the search:
//! - Digest computation and the difficulty predicate
//! - Nonce sources
//! - The cooperative search loop and its job registry
//! - The single-threaded scheduler running jobs side by side

/// SHA-256 digest of a line and nonce, plus solution verification
pub mod hasher;

/// Leading-zero difficulty predicate
pub mod difficulty;

/// Injectable randomness for nonce generation
pub mod nonce;

/// Search loop with cooperative yield points
pub mod engine;

/// Job id allocation and job history
pub mod registry;

/// Cooperative job scheduler
///
/// Runs many searches on one thread, interleaving them only where the
/// engine yields.
pub mod scheduler;

// Re-export main components for cleaner imports
pub use self::engine::MiningEngine;
pub use self::nonce::{NonceSource, OsNonceSource, SequenceNonceSource};
pub use self::registry::{JobRegistry, Summary};
pub use self::scheduler::{JobOutcome, Scheduler, run_local};
