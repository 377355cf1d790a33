// src/input.rs
//! Line sources feeding the session

use crate::utils::error::MinerError;
use std::collections::VecDeque;
use std::future::Future;
use tokio::io::{AsyncBufRead, Lines};

/// Supplies lines to hash, one at a time
///
/// `Ok(None)` means the source is exhausted.
pub trait LineSource {
    /// Waits for the next line
    ///
    /// The returned future must be cancel safe: the session polls it inside
    /// `tokio::select!` and may drop it when another branch wins. Nothing may
    /// be consumed before the future is first polled.
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, MinerError>>;
}

/// Lines read from an async reader such as stdin
impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin,
{
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, MinerError>> {
        async move { Ok(Lines::next_line(self).await?) }
    }
}

/// A fixed batch of lines, e.g. from the command line
impl LineSource for VecDeque<String> {
    fn next_line(&mut self) -> impl Future<Output = Result<Option<String>, MinerError>> {
        async move { Ok(self.pop_front()) }
    }
}
