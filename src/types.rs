// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to each mining job, starting at 1
pub type JobId = u64;

/// Number of random bytes drawn for every attempt
pub const NONCE_LEN: usize = 20;

/// Random bytes appended to the input line before hashing
pub type Nonce = [u8; NONCE_LEN];

/// Lifecycle state of a job
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// The search loop is still drawing nonces
    Running,
    /// A matching digest was found and reported
    Completed,
    /// The random source failed; the job stopped without a result
    Failed,
}

impl JobStatus {
    /// Terminal jobs never change again
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A submitted line and the progress of its search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Unique, strictly increasing identifier
    pub id: JobId,
    /// The line being hashed
    pub input_line: String,
    /// Rounds recorded at the last suspension point or at termination
    pub rounds_completed: u64,
    /// Current lifecycle state
    pub status: JobStatus,
}

impl Job {
    /// Creates a fresh running job that has not attempted anything yet
    pub fn new(id: JobId, input_line: impl Into<String>) -> Self {
        Job {
            id,
            input_line: input_line.into(),
            rounds_completed: 0,
            status: JobStatus::Running,
        }
    }
}

/// The winning attempt of a finished job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningResult {
    /// Job that produced this result
    pub job_id: JobId,
    /// The line that was hashed
    pub input_line: String,
    /// Hex digest satisfying the difficulty
    pub digest_hex: String,
    /// Hex encoding of the 20-byte nonce
    pub nonce_hex: String,
    /// 1-based attempt number of the match
    pub rounds: u64,
}

/// Events reported to an [`EventSink`](crate::output::EventSink)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MiningEvent {
    /// A job picked up its line
    Started {
        /// Job identifier
        job_id: JobId,
        /// The submitted line
        line: String,
    },
    /// A job is about to yield to the scheduler
    Suspended {
        /// Job identifier
        job_id: JobId,
        /// Rounds attempted so far
        rounds: u64,
    },
    /// A job got control back after yielding
    Resumed {
        /// Job identifier
        job_id: JobId,
        /// Rounds attempted so far
        rounds: u64,
    },
    /// A job found a matching digest
    Completed(MiningResult),
    /// A job stopped because of an error
    Failed {
        /// Job identifier
        job_id: JobId,
        /// Rounds completed before the failure
        rounds: u64,
        /// Human readable cause
        reason: String,
    },
}

impl MiningEvent {
    /// The job this event belongs to
    pub fn job_id(&self) -> JobId {
        match self {
            MiningEvent::Started { job_id, .. }
            | MiningEvent::Suspended { job_id, .. }
            | MiningEvent::Resumed { job_id, .. }
            | MiningEvent::Failed { job_id, .. } => *job_id,
            MiningEvent::Completed(result) => result.job_id,
        }
    }
}
