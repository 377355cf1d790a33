// src/miner/engine.rs
//! Proof-of-work search loop
//!
//! A search draws a fresh nonce every round, hashes it together with the
//! line and stops at the first digest that meets the difficulty. Every
//! `yield_every_rounds` rounds the loop hands control back to the scheduler;
//! between those points it never awaits, so a chunk of rounds runs without
//! interleaving with other jobs.

use crate::config::DifficultyConfig;
use crate::miner::nonce::NonceSource;
use crate::miner::registry::JobRegistry;
use crate::miner::{difficulty, hasher};
use crate::output::EventSink;
use crate::types::{JobId, MiningResult, NONCE_LEN, Nonce};
use crate::utils::error::MinerError;
use std::rc::Rc;
use tokio::task;

/// Runs searches and reports their progress
pub struct MiningEngine {
    /// Difficulty and yield cadence shared by every job
    config: DifficultyConfig,
    /// Where jobs are numbered and tracked
    registry: Rc<JobRegistry>,
    /// Receiver of progress and result events
    sink: Rc<dyn EventSink>,
}

impl MiningEngine {
    /// Creates an engine
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` if `config` is invalid.
    pub fn new(
        config: DifficultyConfig,
        registry: Rc<JobRegistry>,
        sink: Rc<dyn EventSink>,
    ) -> Result<Self, MinerError> {
        config.validate()?;
        Ok(MiningEngine {
            config,
            registry,
            sink,
        })
    }

    /// Difficulty settings in use
    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Registry tracking this engine's jobs
    pub fn registry(&self) -> &Rc<JobRegistry> {
        &self.registry
    }

    /// Allocates a job for `line` without starting the search
    pub fn open_job(&self, line: &str) -> JobId {
        self.registry.open(line)
    }

    /// Opens a job for `line` and searches until a matching digest is found
    ///
    /// # Errors
    /// - `MinerError::NonceError` if `nonces` fails; the job is marked failed
    ///   and a failure event is emitted
    /// - `MinerError::SinkError` if an event could not be delivered
    pub async fn search<N>(&self, line: &str, nonces: &mut N) -> Result<MiningResult, MinerError>
    where
        N: NonceSource + ?Sized,
    {
        let job_id = self.open_job(line);
        self.mine(job_id, line, nonces).await
    }

    /// Runs the search loop for an already opened job
    ///
    /// Only yields at multiples of `yield_every_rounds`. There is no round
    /// limit: the loop ends on a match or on an error.
    ///
    /// # Errors
    /// `MinerError::JobError` if `job_id` is not a running job opened for
    /// `line`; nothing is emitted in that case.
    pub(crate) async fn mine<N>(
        &self,
        job_id: JobId,
        line: &str,
        nonces: &mut N,
    ) -> Result<MiningResult, MinerError>
    where
        N: NonceSource + ?Sized,
    {
        let DifficultyConfig {
            leading_zero_hex_digits,
            yield_every_rounds,
        } = self.config;

        match self.registry.lookup(job_id) {
            Some(job) if job.status.is_terminal() => {
                return Err(MinerError::JobError(format!(
                    "job #{} is already {}",
                    job_id, job.status
                )));
            }
            Some(job) if job.input_line != line => {
                return Err(MinerError::JobError(format!(
                    "job #{} was opened for a different line",
                    job_id
                )));
            }
            Some(_) => {}
            None => {
                return Err(MinerError::JobError(format!("job #{} was never opened", job_id)));
            }
        }

        log::debug!(
            "Job #{} started (difficulty {}, yield every {} rounds)",
            job_id,
            leading_zero_hex_digits,
            yield_every_rounds
        );
        self.sink.on_start(job_id, line)?;

        let mut nonce: Nonce = [0u8; NONCE_LEN];
        let mut rounds: u64 = 0;

        loop {
            rounds += 1;

            if let Err(err) = nonces.fill(&mut nonce) {
                let completed = rounds - 1;
                log::warn!("Job #{} failed after {} rounds: {}", job_id, completed, err);
                self.registry.fail(job_id, completed);
                self.sink.on_failure(job_id, completed, &err)?;
                return Err(err);
            }

            let digest_hex = hasher::digest(line.as_bytes(), &nonce);

            if difficulty::satisfies(&digest_hex, leading_zero_hex_digits) {
                let result = MiningResult {
                    job_id,
                    input_line: line.to_owned(),
                    digest_hex,
                    nonce_hex: hex::encode(nonce),
                    rounds,
                };
                log::debug!("Job #{} matched after {} rounds", job_id, rounds);
                self.registry.complete(job_id, rounds);
                self.sink.on_complete(&result)?;
                return Ok(result);
            }

            if rounds % yield_every_rounds == 0 {
                self.registry.progress(job_id, rounds);
                self.sink.on_suspend(job_id, rounds)?;
                log::trace!("Job #{} yielding at {} rounds", job_id, rounds);
                task::yield_now().await;
                self.sink.on_resume(job_id, rounds)?;
            }
        }
    }
}
