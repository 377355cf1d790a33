// src/miner/registry.rs
//! Job id allocation and job history
//!
//! The registry lives on the scheduler thread and is shared between the
//! session and every running job. State sits behind `Cell`/`RefCell`; no
//! borrow is ever held across an `.await`, so jobs interleaving at their
//! yield points never observe each other mid-update.

use crate::types::{Job, JobId, JobStatus};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Allocates job ids and keeps every job ever submitted
#[derive(Debug, Default)]
pub struct JobRegistry {
    /// Last id handed out; 0 means none yet
    last_id: Cell<JobId>,
    /// All jobs, ordered by id
    jobs: RefCell<BTreeMap<JobId, Job>>,
}

/// Aggregate view of the registry for end-of-session reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Jobs ever submitted
    pub jobs: usize,
    /// Jobs still searching
    pub running: usize,
    /// Jobs that produced a result
    pub completed: usize,
    /// Jobs stopped by an error
    pub failed: usize,
    /// Rounds recorded across all jobs
    pub total_rounds: u64,
}

impl JobRegistry {
    /// Creates an empty registry; the first id handed out is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next job id
    ///
    /// Ids are strictly increasing with no gaps for the lifetime of the
    /// registry.
    pub fn next_id(&self) -> JobId {
        let id = self.last_id.get() + 1;
        self.last_id.set(id);
        id
    }

    /// Stores a job under an id not seen before
    ///
    /// Returns `false` and leaves the registry untouched if `job.id` is
    /// already recorded. Later ids from [`JobRegistry::next_id`] always
    /// follow the highest recorded id.
    pub fn record(&self, job: Job) -> bool {
        let mut jobs = self.jobs.borrow_mut();
        if jobs.contains_key(&job.id) {
            log::warn!("Refusing to overwrite job #{}", job.id);
            return false;
        }
        self.last_id.set(self.last_id.get().max(job.id));
        jobs.insert(job.id, job);
        true
    }

    /// Returns a snapshot of job `id`
    pub fn lookup(&self, id: JobId) -> Option<Job> {
        self.jobs.borrow().get(&id).cloned()
    }

    /// Allocates an id for `line` and records it as a running job
    pub fn open(&self, line: &str) -> JobId {
        let id = self.next_id();
        let recorded = self.record(Job::new(id, line));
        debug_assert!(recorded, "fresh id #{} already taken", id);
        id
    }

    /// Snapshot of every job in id order
    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.borrow().values().cloned().collect()
    }

    /// Counts jobs by status
    pub fn summary(&self) -> Summary {
        self.jobs
            .borrow()
            .values()
            .fold(Summary::default(), |mut summary, job| {
                summary.jobs += 1;
                summary.total_rounds += job.rounds_completed;
                match job.status {
                    JobStatus::Running => summary.running += 1,
                    JobStatus::Completed => summary.completed += 1,
                    JobStatus::Failed => summary.failed += 1,
                }
                summary
            })
    }

    /// Records the rounds reached at a suspension point
    pub(crate) fn progress(&self, id: JobId, rounds: u64) {
        self.update(id, rounds, JobStatus::Running);
    }

    /// Retires a job that found its result
    pub(crate) fn complete(&self, id: JobId, rounds: u64) {
        self.update(id, rounds, JobStatus::Completed);
    }

    /// Retires a job that stopped on an error
    pub(crate) fn fail(&self, id: JobId, rounds: u64) {
        self.update(id, rounds, JobStatus::Failed);
    }

    fn update(&self, id: JobId, rounds: u64, status: JobStatus) {
        let mut jobs = self.jobs.borrow_mut();
        let Some(job) = jobs.get_mut(&id) else {
            log::warn!("Update for unknown job #{}", id);
            return;
        };
        if job.status.is_terminal() {
            log::warn!("Ignoring update for retired job #{} ({})", id, job.status);
            return;
        }
        job.rounds_completed = job.rounds_completed.max(rounds);
        job.status = status;
    }
}
