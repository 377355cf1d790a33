// src/output/mod.rs
//! Event sinks
//!
//! Jobs report their progress through an [`EventSink`]. The sink is shared by
//! every job on the scheduler; each event is delivered in a single call that
//! never spans a yield point, so events from different jobs never interleave
//! mid-line.

/// Plain text rendering
pub mod console;

/// JSON lines rendering
pub mod json;

pub use console::ConsoleSink;
pub use json::JsonSink;

use crate::types::{JobId, MiningEvent, MiningResult};
use crate::utils::error::MinerError;

/// Receiver of job progress and results
///
/// Implementors only provide [`EventSink::emit`]; the `on_*` helpers build the
/// matching [`MiningEvent`]. Any error returned here is treated as fatal for
/// the whole session.
pub trait EventSink {
    /// Delivers one event
    fn emit(&self, event: &MiningEvent) -> Result<(), MinerError>;

    /// Flushes buffered output
    fn flush(&self) -> Result<(), MinerError> {
        Ok(())
    }

    /// The session is ready for the next line
    fn on_prompt(&self) -> Result<(), MinerError> {
        Ok(())
    }

    /// The line source is exhausted; running jobs carry on
    fn on_input_closed(&self) -> Result<(), MinerError> {
        Ok(())
    }

    /// A job started processing `line`
    fn on_start(&self, job_id: JobId, line: &str) -> Result<(), MinerError> {
        self.emit(&MiningEvent::Started {
            job_id,
            line: line.to_owned(),
        })
    }

    /// A job is about to yield after `rounds` attempts
    fn on_suspend(&self, job_id: JobId, rounds: u64) -> Result<(), MinerError> {
        self.emit(&MiningEvent::Suspended { job_id, rounds })
    }

    /// A job resumed after yielding at `rounds` attempts
    fn on_resume(&self, job_id: JobId, rounds: u64) -> Result<(), MinerError> {
        self.emit(&MiningEvent::Resumed { job_id, rounds })
    }

    /// A job found its result
    fn on_complete(&self, result: &MiningResult) -> Result<(), MinerError> {
        self.emit(&MiningEvent::Completed(result.clone()))
    }

    /// A job stopped because of `error`
    fn on_failure(&self, job_id: JobId, rounds: u64, error: &MinerError) -> Result<(), MinerError> {
        self.emit(&MiningEvent::Failed {
            job_id,
            rounds,
            reason: error.to_string(),
        })
    }
}

/// Maps a write failure on the underlying stream to a sink error
pub(crate) fn sink_error(e: impl std::fmt::Display) -> MinerError {
    MinerError::SinkError(format!("Failed to write event: {}", e))
}
