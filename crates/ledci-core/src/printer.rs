//! Synchronized output sink shared by concurrent build workers.
//!
//! Every [`LockedPrinter::print`] call writes its whole message under a single
//! lock, so lines from parallel batches never interleave mid-line.

use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::debug;

enum Sink {
    Stdout,
    Buffer(Vec<u8>),
}

/// Cloneable handle to a line-coherent printer.
#[derive(Clone)]
pub struct LockedPrinter {
    sink: Arc<Mutex<Sink>>,
}

impl LockedPrinter {
    /// Printer writing to the process stdout.
    pub fn stdout() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Sink::Stdout)),
        }
    }

    /// Printer collecting output in memory (see [`LockedPrinter::captured`]).
    pub fn capture() -> Self {
        Self {
            sink: Arc::new(Mutex::new(Sink::Buffer(Vec::new()))),
        }
    }

    /// Print `msg` followed by a newline.
    pub fn print(&self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *sink {
            Sink::Stdout => write_line(&mut std::io::stdout().lock(), msg),
            Sink::Buffer(buf) => write_line(buf, msg),
        };
    }

    /// Everything printed so far, for capturing printers.
    pub fn captured(&self) -> Option<String> {
        let sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        match &*sink {
            Sink::Stdout => None,
            Sink::Buffer(buf) => Some(String::from_utf8_lossy(buf).to_string()),
        }
    }
}

/// Write `msg` and a newline, then flush. Failures are logged, not raised.
fn write_line(out: &mut impl Write, msg: &str) -> bool {
    match writeln!(out, "{msg}").and_then(|_| out.flush()) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Failed to write build output");
            false
        }
    }
}

impl Default for LockedPrinter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for LockedPrinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockedPrinter").finish_non_exhaustive()
    }
}
