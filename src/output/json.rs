// src/output/json.rs
use crate::output::{EventSink, sink_error};
use crate::types::MiningEvent;
use crate::utils::error::MinerError;
use std::cell::RefCell;
use std::io::Write;

/// Writes every event as one JSON object per line
pub struct JsonSink<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> JsonSink<W> {
    /// Creates a sink writing to `out`
    pub fn new(out: W) -> Self {
        JsonSink {
            out: RefCell::new(out),
        }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> EventSink for JsonSink<W> {
    fn emit(&self, event: &MiningEvent) -> Result<(), MinerError> {
        let line = serde_json::to_string(event)?;
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", line)
            .and_then(|_| out.flush())
            .map_err(sink_error)
    }

    fn flush(&self) -> Result<(), MinerError> {
        self.out.borrow_mut().flush().map_err(sink_error)
    }
}
