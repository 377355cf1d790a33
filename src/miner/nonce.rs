// src/miner/nonce.rs
//! Nonce sources
//!
//! The engine never touches a random number generator directly; it asks a
//! [`NonceSource`] to fill the next nonce. Production code uses the operating
//! system's CSPRNG, tests and replays can substitute a fixed sequence.

use crate::types::Nonce;
use crate::utils::error::MinerError;
use rand::RngCore;
use rand::rngs::OsRng;

/// Supplies one fresh nonce per mining round
pub trait NonceSource {
    /// Overwrites `nonce` with the next value
    ///
    /// # Errors
    /// Returns `MinerError::NonceError` if no nonce can be produced. The
    /// engine treats this as fatal for the current job only.
    fn fill(&mut self, nonce: &mut Nonce) -> Result<(), MinerError>;
}

/// Nonces drawn from the operating system's random source
///
/// Every draw is independent; nothing is cached between rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill(&mut self, nonce: &mut Nonce) -> Result<(), MinerError> {
        OsRng.try_fill_bytes(nonce)?;
        Ok(())
    }
}

/// Replays a fixed list of nonces, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceNonceSource {
    nonces: Vec<Nonce>,
    position: usize,
}

impl SequenceNonceSource {
    /// Creates a source that cycles through `nonces`
    ///
    /// # Errors
    /// Returns `MinerError::InputError` if `nonces` is empty.
    pub fn new(nonces: Vec<Nonce>) -> Result<Self, MinerError> {
        if nonces.is_empty() {
            return Err(MinerError::InputError(
                "Nonce sequence must not be empty".into(),
            ));
        }
        Ok(SequenceNonceSource {
            nonces,
            position: 0,
        })
    }
}

impl NonceSource for SequenceNonceSource {
    fn fill(&mut self, nonce: &mut Nonce) -> Result<(), MinerError> {
        *nonce = self.nonces[self.position];
        self.position = (self.position + 1) % self.nonces.len();
        Ok(())
    }
}
