// src/miner/scheduler.rs
//! Cooperative job scheduler
//!
//! All jobs run as `!Send` tasks on a single thread: a tokio current-thread
//! runtime driving a [`LocalSet`]. A job only gives up the thread at the
//! engine's explicit yield. Tokio wakes every task deferred by `yield_now`
//! on the next scheduler tick, so each suspended job resumes. The resume
//! order between jobs is unspecified.
//!
//! There is no way to cancel a running job. Dropping the scheduler (process
//! shutdown) drops suspended jobs without resuming them.

use crate::miner::engine::MiningEngine;
use crate::miner::nonce::NonceSource;
use crate::types::{JobId, MiningResult};
use crate::utils::error::MinerError;
use std::future::Future;
use std::rc::Rc;
use tokio::runtime::Builder;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinSet, LocalSet};

/// Final state of a job task
#[derive(Debug)]
pub enum JobOutcome {
    /// The job found a matching digest
    Completed(MiningResult),
    /// The job stopped on an error local to it
    Failed {
        /// Job identifier
        job_id: JobId,
        /// Cause, already reported to the sink
        error: MinerError,
    },
    /// The job stopped on a fatal error, forwarded to the fatal channel
    Aborted(JobId),
}

/// Spawns searches onto the local task set and collects their outcomes
///
/// Must be used from within a [`LocalSet`], see [`run_local`].
pub struct Scheduler<N> {
    /// Engine shared by every job
    engine: Rc<MiningEngine>,
    /// Prototype cloned into each job
    nonces: N,
    /// Live and finished-but-unreaped job tasks
    jobs: JoinSet<JobOutcome>,
    /// Fatal errors raised inside jobs
    fatal: UnboundedSender<MinerError>,
}

impl<N> Scheduler<N>
where
    N: NonceSource + Clone + 'static,
{
    /// Creates a scheduler and the receiving end of its fatal-error channel
    ///
    /// The session watches the receiver and stops as soon as a job reports a
    /// fatal error.
    pub fn new(engine: MiningEngine, nonces: N) -> (Self, UnboundedReceiver<MinerError>) {
        let (fatal, fatal_rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler {
            engine: Rc::new(engine),
            nonces,
            jobs: JoinSet::new(),
            fatal,
        };
        (scheduler, fatal_rx)
    }

    /// Engine running the jobs
    pub fn engine(&self) -> &MiningEngine {
        &self.engine
    }

    /// Spawns a search for `line`
    ///
    /// Empty lines are ignored and return `None`. The job id is allocated
    /// here, so ids follow submission order no matter when each task first
    /// runs. The task starts the next time the scheduler thread is idle.
    pub fn spawn(&mut self, line: impl Into<String>) -> Option<JobId> {
        let line = line.into();
        if line.is_empty() {
            return None;
        }

        let job_id = self.engine.open_job(&line);
        let engine = Rc::clone(&self.engine);
        let mut nonces = self.nonces.clone();
        let fatal = self.fatal.clone();

        self.jobs.spawn_local(async move {
            match engine.mine(job_id, &line, &mut nonces).await {
                Ok(result) => JobOutcome::Completed(result),
                Err(error) if error.is_fatal() => {
                    log::error!("Job #{} hit a fatal error: {}", job_id, error);
                    let _ = fatal.send(error);
                    JobOutcome::Aborted(job_id)
                }
                Err(error) => JobOutcome::Failed { job_id, error },
            }
        });

        log::debug!("Spawned job #{} ({} live)", job_id, self.jobs.len());
        Some(job_id)
    }

    /// Waits for the next job to finish
    ///
    /// Returns `None` when no jobs are live.
    ///
    /// # Errors
    /// Returns `MinerError::TaskError` if the job task panicked.
    pub async fn next_finished(&mut self) -> Option<Result<JobOutcome, MinerError>> {
        self.jobs
            .join_next()
            .await
            .map(|joined| joined.map_err(MinerError::from))
    }

    /// Number of jobs not yet reaped
    pub fn live_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// `true` when every spawned job has been reaped
    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Drives `future` to completion on a single-threaded runtime with a [`LocalSet`]
///
/// The runtime is shut down in the background afterwards, so a blocking
/// stdin read still pending on tokio's blocking pool does not hold up exit.
///
/// # Errors
/// Returns `MinerError::IoError` if the runtime cannot be built.
pub fn run_local<F: Future>(future: F) -> Result<F::Output, MinerError> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let local = LocalSet::new();
    let output = local.block_on(&runtime, future);

    drop(local);
    runtime.shutdown_background();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyConfig;
    use crate::miner::hasher;
    use crate::miner::nonce::{OsNonceSource, SequenceNonceSource};
    use crate::miner::registry::JobRegistry;
    use crate::test_utils::{FailingNonceSource, RecordingSink, byte_fill_nonces};
    use crate::types::{JobStatus, MiningEvent};

    fn scheduler<N: NonceSource + Clone + 'static>(
        k: u32,
        yield_every: u64,
        nonces: N,
        sink: Rc<RecordingSink>,
    ) -> (Scheduler<N>, UnboundedReceiver<MinerError>) {
        let engine = MiningEngine::new(
            DifficultyConfig::new(k, yield_every).unwrap(),
            Rc::new(JobRegistry::new()),
            sink,
        )
        .unwrap();
        Scheduler::new(engine, nonces)
    }

    async fn drain<N: NonceSource + Clone + 'static>(
        scheduler: &mut Scheduler<N>,
    ) -> Vec<JobOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = scheduler.next_finished().await {
            outcomes.push(outcome.unwrap());
        }
        outcomes
    }

    #[tokio::test]
    async fn back_to_back_lines_keep_their_ids() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let sink = Rc::new(RecordingSink::new());
                let (mut scheduler, _fatal) = scheduler(2, 16, OsNonceSource, sink);

                assert_eq!(scheduler.spawn("abc"), Some(1));
                assert_eq!(scheduler.spawn("xyz"), Some(2));

                let mut results: Vec<MiningResult> = drain(&mut scheduler)
                    .await
                    .into_iter()
                    .map(|outcome| match outcome {
                        JobOutcome::Completed(result) => result,
                        other => panic!("unexpected outcome {:?}", other),
                    })
                    .collect();
                results.sort_by_key(|r| r.job_id);

                assert_eq!(results[0].job_id, 1);
                assert_eq!(results[0].input_line, "abc");
                assert_eq!(results[1].job_id, 2);
                assert_eq!(results[1].input_line, "xyz");
                for result in &results {
                    assert!(
                        hasher::verify(&result.input_line, &result.nonce_hex, &result.digest_hex, 2)
                            .unwrap()
                    );
                }
            })
            .await;
    }

    #[tokio::test]
    async fn empty_lines_are_ignored() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let sink = Rc::new(RecordingSink::new());
                let (mut scheduler, _fatal) = scheduler(0, 1, OsNonceSource, sink.clone());

                assert_eq!(scheduler.spawn(""), None);
                assert!(scheduler.is_idle());
                assert!(scheduler.next_finished().await.is_none());
                assert_eq!(scheduler.spawn("a"), Some(1));
                assert_eq!(scheduler.live_jobs(), 1);
                drain(&mut scheduler).await;
                assert_eq!(sink.len(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn jobs_interleave_only_at_yield_points() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let sink = Rc::new(RecordingSink::new());
                // Byte-fill sequence with k = 2 finishes at round 33 for "abc".
                let nonces = SequenceNonceSource::new(byte_fill_nonces()).unwrap();
                let (mut scheduler, _fatal) = scheduler(2, 10, nonces, sink.clone());

                scheduler.spawn("abc");
                scheduler.spawn("abc");
                drain(&mut scheduler).await;

                let order: Vec<(u64, &'static str)> = sink
                    .events()
                    .iter()
                    .map(|event| {
                        let kind = match event {
                            MiningEvent::Started { .. } => "start",
                            MiningEvent::Suspended { .. } => "suspend",
                            MiningEvent::Resumed { .. } => "resume",
                            MiningEvent::Completed(_) => "done",
                            MiningEvent::Failed { .. } => "failed",
                        };
                        (event.job_id(), kind)
                    })
                    .collect();

                // A chunk opened by a start or resume runs to its suspend or
                // result without events from the other job in between.
                for pair in order.windows(2) {
                    if matches!(pair[0].1, "start" | "resume") {
                        assert_eq!(pair[0].0, pair[1].0, "chunk interrupted: {:?}", pair);
                        assert!(matches!(pair[1].1, "suspend" | "done"));
                    }
                }
                // Both jobs start before either one resumes.
                let second_start = order.iter().position(|e| *e == (2, "start")).unwrap();
                let first_resume = order.iter().position(|e| e.1 == "resume").unwrap();
                assert!(second_start < first_resume);

                let result = |job_id| MiningResult {
                    job_id,
                    input_line: "abc".into(),
                    digest_hex: hasher::digest(b"abc", &[32; 20]),
                    nonce_hex: hex::encode([32u8; 20]),
                    rounds: 33,
                };
                for job_id in [1, 2] {
                    let mut expected = vec![MiningEvent::Started {
                        job_id,
                        line: "abc".into(),
                    }];
                    for rounds in [10, 20, 30] {
                        expected.push(MiningEvent::Suspended { job_id, rounds });
                        expected.push(MiningEvent::Resumed { job_id, rounds });
                    }
                    expected.push(MiningEvent::Completed(result(job_id)));
                    assert_eq!(sink.events_for(job_id), expected);
                }
            })
            .await;
    }

    #[tokio::test]
    async fn ids_follow_submission_not_completion() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let sink = Rc::new(RecordingSink::new());
                // With byte-fill nonces and k = 1, "xyz" first matches at round 35
                // and "def" at round 2.
                let nonces = SequenceNonceSource::new(byte_fill_nonces()).unwrap();
                let (mut scheduler, _fatal) = scheduler(1, 1, nonces, sink.clone());
                let registry = Rc::clone(scheduler.engine().registry());

                assert_eq!(scheduler.spawn("xyz"), Some(1));
                assert_eq!(scheduler.spawn("def"), Some(2));
                let outcomes = drain(&mut scheduler).await;
                assert_eq!(outcomes.len(), 2);

                let completions: Vec<(u64, String, u64)> = sink
                    .events()
                    .into_iter()
                    .filter_map(|event| match event {
                        MiningEvent::Completed(r) => Some((r.job_id, r.input_line, r.rounds)),
                        _ => None,
                    })
                    .collect();
                assert_eq!(
                    completions,
                    vec![(2, "def".to_string(), 2), (1, "xyz".to_string(), 35)]
                );

                for (id, line) in [(1, "xyz"), (2, "def")] {
                    let job = registry.lookup(id).unwrap();
                    assert_eq!(job.input_line, line);
                    assert_eq!(job.status, JobStatus::Completed);
                }
            })
            .await;
    }

    #[tokio::test]
    async fn nonce_failure_stays_within_its_job() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let sink = Rc::new(RecordingSink::new());
                let (mut failing, _fatal) =
                    scheduler(1, 100_000, FailingNonceSource::after(5), sink.clone());
                let registry = Rc::clone(failing.engine().registry());

                failing.spawn("abc");
                let outcomes = drain(&mut failing).await;
                assert!(matches!(
                    outcomes.as_slice(),
                    [JobOutcome::Failed {
                        job_id: 1,
                        error: MinerError::NonceError(_)
                    }]
                ));
                assert_eq!(registry.lookup(1).unwrap().status, JobStatus::Failed);
            })
            .await;
    }

    #[tokio::test]
    async fn fatal_errors_reach_the_channel() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let sink = Rc::new(RecordingSink::failing_after(0));
                let (mut scheduler, mut fatal) = scheduler(0, 1, OsNonceSource, sink);

                scheduler.spawn("abc");
                let outcomes = drain(&mut scheduler).await;
                assert!(matches!(outcomes.as_slice(), [JobOutcome::Aborted(1)]));
                assert!(fatal.recv().await.unwrap().is_fatal());
            })
            .await;
    }

    #[test]
    fn run_local_drives_spawned_jobs() {
        let result = run_local(async {
            let sink = Rc::new(RecordingSink::new());
            let (mut scheduler, _fatal) = scheduler(1, 4, OsNonceSource, sink);
            scheduler.spawn("line");
            match scheduler.next_finished().await {
                Some(Ok(JobOutcome::Completed(result))) => result,
                other => panic!("unexpected outcome {:?}", other),
            }
        })
        .unwrap();

        assert_eq!(result.job_id, 1);
        assert!(result.digest_hex.starts_with('0'));
    }
}
