// src/miner/hasher.rs
//! SHA-256 digest of a line and nonce
//!
//! The digest covers the line's bytes followed by the raw nonce bytes and is
//! rendered as lowercase hex, the form the difficulty check operates on.

use crate::miner::difficulty;
use crate::types::{NONCE_LEN, Nonce};
use crate::utils::error::MinerError;
use sha2::{Digest, Sha256};

/// Computes `hex(sha256(line || nonce))`
pub fn digest(line: &[u8], nonce: &Nonce) -> String {
    let mut hasher = Sha256::new();
    hasher.update(line);
    hasher.update(nonce);
    hex::encode(hasher.finalize())
}

/// Checks a reported solution
///
/// Decodes `nonce_hex`, recomputes the digest of `line` and accepts the
/// solution only if it matches `digest_hex` and has `leading_zeros` zero
/// hex digits.
///
/// # Errors
/// Returns `MinerError::InputError` if the nonce is not valid hex or is not
/// exactly 20 bytes long.
pub fn verify(
    line: &str,
    nonce_hex: &str,
    digest_hex: &str,
    leading_zeros: u32,
) -> Result<bool, MinerError> {
    let bytes = hex::decode(nonce_hex.trim())?;
    let nonce: Nonce = bytes.as_slice().try_into().map_err(|_| {
        MinerError::InputError(format!(
            "Nonce must be {} bytes, got {}",
            NONCE_LEN,
            bytes.len()
        ))
    })?;

    let computed = digest(line.as_bytes(), &nonce);
    Ok(computed.eq_ignore_ascii_case(digest_hex.trim())
        && difficulty::satisfies(&computed, leading_zeros))
}
