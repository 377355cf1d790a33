// src/test_utils.rs
//! Shared fixtures for unit tests

use crate::miner::nonce::NonceSource;
use crate::output::EventSink;
use crate::types::{MiningEvent, NONCE_LEN, Nonce};
use crate::utils::error::MinerError;
use std::cell::RefCell;

/// Keeps every event in memory
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: RefCell<Vec<MiningEvent>>,
    /// Fail with a sink error once this many events were accepted
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_after(accepted: usize) -> Self {
        RecordingSink {
            events: RefCell::default(),
            fail_after: Some(accepted),
        }
    }

    pub(crate) fn events(&self) -> Vec<MiningEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub(crate) fn events_for(&self, job_id: u64) -> Vec<MiningEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.job_id() == job_id)
            .cloned()
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MiningEvent) -> Result<(), MinerError> {
        let mut events = self.events.borrow_mut();
        if self.fail_after.is_some_and(|limit| events.len() >= limit) {
            return Err(MinerError::SinkError("recording sink closed".into()));
        }
        events.push(event.clone());
        Ok(())
    }
}

/// Produces `remaining` zero nonces, then fails
#[derive(Clone)]
pub(crate) struct FailingNonceSource {
    remaining: usize,
}

impl FailingNonceSource {
    pub(crate) fn after(draws: usize) -> Self {
        FailingNonceSource {
            remaining: draws,
        }
    }
}

impl NonceSource for FailingNonceSource {
    fn fill(&mut self, nonce: &mut Nonce) -> Result<(), MinerError> {
        if self.remaining == 0 {
            return Err(MinerError::NonceError("entropy source unavailable".into()));
        }
        self.remaining -= 1;
        *nonce = [0u8; NONCE_LEN];
        Ok(())
    }
}

/// Nonces `[i; 20]` for every byte value `i`
pub(crate) fn byte_fill_nonces() -> Vec<Nonce> {
    (0..=u8::MAX).map(|i| [i; NONCE_LEN]).collect()
}
