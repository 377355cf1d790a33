// src/output/console.rs
use crate::output::{EventSink, sink_error};
use crate::types::MiningEvent;
use crate::utils::error::MinerError;
use std::cell::RefCell;
use std::io::Write;

/// Writes events as human readable lines
///
/// Output is flushed after every event so progress shows up while a search
/// is still running. An interactive sink also shows a `> ` prompt whenever
/// the session waits for a line and prints `all done` once input closes.
pub struct ConsoleSink<W: Write> {
    out: RefCell<W>,
    interactive: bool,
}

impl<W: Write> ConsoleSink<W> {
    /// Creates a sink writing to `out`
    pub fn new(out: W) -> Self {
        ConsoleSink {
            out: RefCell::new(out),
            interactive: false,
        }
    }

    /// Creates a sink that also prompts for input
    pub fn interactive(out: W) -> Self {
        ConsoleSink {
            out: RefCell::new(out),
            interactive: true,
        }
    }

    fn write_raw(&self, text: &str) -> Result<(), MinerError> {
        if !self.interactive {
            return Ok(());
        }
        let mut out = self.out.borrow_mut();
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(sink_error)
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn emit(&self, event: &MiningEvent) -> Result<(), MinerError> {
        let mut out = self.out.borrow_mut();
        let written = match event {
            MiningEvent::Started { job_id, line } => {
                writeln!(out, "\nTesting job #{}, processing {}", job_id, line)
            }
            MiningEvent::Suspended { job_id, rounds } => {
                writeln!(out, "\tSuspending job #{} after {} rounds", job_id, rounds)
            }
            MiningEvent::Resumed { job_id, rounds } => {
                writeln!(out, "\tResuming job #{} after {} rounds", job_id, rounds)
            }
            MiningEvent::Completed(result) => writeln!(
                out,
                "\tDone with job #{} after {} rounds\nsha({}): {} nonce: {} rounds: {}",
                result.job_id,
                result.rounds,
                result.input_line,
                result.digest_hex,
                result.nonce_hex,
                result.rounds
            ),
            MiningEvent::Failed {
                job_id,
                rounds,
                reason,
            } => writeln!(
                out,
                "\tJob #{} failed after {} rounds: {}",
                job_id, rounds, reason
            ),
        };
        written.and_then(|_| out.flush()).map_err(sink_error)
    }

    fn flush(&self) -> Result<(), MinerError> {
        self.out.borrow_mut().flush().map_err(sink_error)
    }

    fn on_prompt(&self) -> Result<(), MinerError> {
        self.write_raw("> ")
    }

    fn on_input_closed(&self) -> Result<(), MinerError> {
        self.write_raw("all done\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MiningResult;

    fn render(events: &[MiningEvent]) -> String {
        let sink = ConsoleSink::new(Vec::new());
        for event in events {
            sink.emit(event).unwrap();
        }
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn renders_progress_lines() {
        let text = render(&[
            MiningEvent::Started {
                job_id: 2,
                line: "hello".into(),
            },
            MiningEvent::Suspended {
                job_id: 2,
                rounds: 100_000,
            },
            MiningEvent::Resumed {
                job_id: 2,
                rounds: 100_000,
            },
        ]);
        assert_eq!(
            text,
            "\nTesting job #2, processing hello\n\
             \tSuspending job #2 after 100000 rounds\n\
             \tResuming job #2 after 100000 rounds\n"
        );
    }

    #[test]
    fn renders_result_with_nonce() {
        let text = render(&[MiningEvent::Completed(MiningResult {
            job_id: 1,
            input_line: "abc".into(),
            digest_hex: "00000abc".into(),
            nonce_hex: "ff".into(),
            rounds: 42,
        })]);
        assert!(text.contains("Done with job #1 after 42 rounds"));
        assert!(text.contains("sha(abc): 00000abc nonce: ff rounds: 42"));
    }

    #[test]
    fn only_interactive_sinks_prompt() {
        let quiet = ConsoleSink::new(Vec::new());
        quiet.on_prompt().unwrap();
        quiet.on_input_closed().unwrap();
        assert!(quiet.into_inner().is_empty());

        let interactive = ConsoleSink::interactive(Vec::new());
        interactive.on_prompt().unwrap();
        interactive.on_input_closed().unwrap();
        assert_eq!(interactive.into_inner(), b"> all done\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_sink_errors() {
        let sink = ConsoleSink::new(BrokenPipe);
        let err = sink.on_suspend(1, 10).unwrap_err();
        assert!(err.is_fatal());
    }
}
