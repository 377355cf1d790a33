// src/miner/difficulty.rs
//! Leading-zero difficulty predicate

/// Returns `true` if the first `leading_zeros` characters of `digest_hex` are `'0'`
///
/// A difficulty of zero accepts every digest. A difficulty longer than the
/// digest can never be met.
pub fn satisfies(digest_hex: &str, leading_zeros: u32) -> bool {
    let k = leading_zeros as usize;
    digest_hex.len() >= k && digest_hex.bytes().take(k).all(|b| b == b'0')
}
