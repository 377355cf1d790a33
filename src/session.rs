// src/session.rs
//! Interactive mining session
//!
//! The session is the host loop sharing the scheduler thread with the jobs.
//! It reads lines, spawns a job per non-empty line, reaps finished jobs and
//! stops on interrupt, on a fatal error, or once input is exhausted and the
//! last job finished.

use crate::config::{DifficultyConfig, InputPolicy};
use crate::input::LineSource;
use crate::miner::engine::MiningEngine;
use crate::miner::nonce::NonceSource;
use crate::miner::registry::{JobRegistry, Summary};
use crate::miner::scheduler::{JobOutcome, Scheduler};
use crate::output::EventSink;
use crate::types::MiningResult;
use crate::utils::error::MinerError;
use std::future::Future;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The line source ran dry and every job finished
    InputClosed,
    /// The shutdown signal fired; live jobs were dropped
    Interrupted,
}

/// What a session produced
#[derive(Debug)]
pub struct SessionReport {
    /// Why the session stopped
    pub end: SessionEnd,
    /// Results of the jobs reaped before the end, in completion order
    pub results: Vec<MiningResult>,
    /// Registry counts at the end
    pub summary: Summary,
}

/// Drives a scheduler from a line source
///
/// Must run inside a [`tokio::task::LocalSet`], e.g. through
/// [`run_local`](crate::miner::scheduler::run_local).
pub struct Session<N> {
    policy: InputPolicy,
    scheduler: Scheduler<N>,
    fatal: UnboundedReceiver<MinerError>,
    registry: Rc<JobRegistry>,
    sink: Rc<dyn EventSink>,
}

impl<N> Session<N>
where
    N: NonceSource + Clone + 'static,
{
    /// Creates a session with a fresh job registry
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` if `difficulty` is invalid.
    pub fn new(
        difficulty: DifficultyConfig,
        policy: InputPolicy,
        sink: Rc<dyn EventSink>,
        nonces: N,
    ) -> Result<Self, MinerError> {
        let registry = Rc::new(JobRegistry::new());
        let engine = MiningEngine::new(difficulty, Rc::clone(&registry), Rc::clone(&sink))?;
        let (scheduler, fatal) = Scheduler::new(engine, nonces);

        Ok(Session {
            policy,
            scheduler,
            fatal,
            registry,
            sink,
        })
    }

    /// Registry shared with the session's jobs
    pub fn registry(&self) -> &Rc<JobRegistry> {
        &self.registry
    }

    /// Runs until `shutdown` resolves, a fatal error occurs, or `source` is
    /// exhausted and all jobs finished
    ///
    /// Consumes the session: jobs still suspended when it returns are
    /// dropped and emit nothing further.
    ///
    /// # Errors
    /// - the first fatal error raised by a job (output sink failure)
    /// - errors reading from `source`
    /// - `MinerError::TaskError` if a job task panicked
    pub async fn run<S, F>(mut self, mut source: S, shutdown: F) -> Result<SessionReport, MinerError>
    where
        S: LineSource,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let config = *self.scheduler.engine().config();
        log::info!(
            "Session started: difficulty {}, yield every {} rounds, {:?} input",
            config.leading_zero_hex_digits,
            config.yield_every_rounds,
            self.policy
        );

        let mut input_open = true;
        let mut prompted = false;
        let mut results = Vec::new();

        let end = loop {
            if !input_open && self.scheduler.is_idle() {
                break SessionEnd::InputClosed;
            }
            let accepting = input_open
                && (self.policy == InputPolicy::Concurrent || self.scheduler.is_idle());
            let busy = !self.scheduler.is_idle();
            if accepting && !prompted {
                self.sink.on_prompt()?;
                prompted = true;
            }

            tokio::select! {
                biased;

                _ = &mut shutdown => break SessionEnd::Interrupted,

                Some(error) = self.fatal.recv() => return Err(error),

                Some(outcome) = self.scheduler.next_finished(), if busy => {
                    match outcome? {
                        JobOutcome::Completed(result) => results.push(result),
                        JobOutcome::Failed { job_id, error } => {
                            log::warn!("Job #{} gave up: {}", job_id, error);
                        }
                        JobOutcome::Aborted(job_id) => {
                            log::debug!("Job #{} aborted", job_id);
                        }
                    }
                }

                // Disabled branches still build their future; keep the read lazy.
                line = async { source.next_line().await }, if accepting => match line? {
                    Some(line) => {
                        prompted = false;
                        if self.scheduler.spawn(line).is_none() {
                            log::trace!("Ignoring empty line");
                        }
                    }
                    None => {
                        log::info!(
                            "Input closed, waiting for {} running job(s)",
                            self.scheduler.live_jobs()
                        );
                        input_open = false;
                        self.sink.on_input_closed()?;
                    }
                },
            }
        };

        let summary = self.registry.summary();
        match end {
            SessionEnd::Interrupted => log::info!(
                "Interrupted: {} job(s) completed, {} dropped while running",
                summary.completed,
                summary.running
            ),
            SessionEnd::InputClosed => log::info!(
                "Session finished: {} job(s) completed, {} failed, {} rounds",
                summary.completed,
                summary.failed,
                summary.total_rounds
            ),
        }
        self.sink.flush()?;

        Ok(SessionReport {
            end,
            results,
            summary,
        })
    }
}
