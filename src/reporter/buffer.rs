//! Console buffering
//!
//! Lines are held back while everything passes. The first failure dumps the
//! held lines in order and switches to passthrough for the rest of the run;
//! there is no way back to buffering. A run that never fails never flushes,
//! so its buffered lines are dropped with the session.

use super::sink::Console;

#[derive(Debug)]
enum State {
    Buffering(Vec<String>),
    Passthrough,
}

/// Pending console lines for one session.
#[derive(Debug)]
pub struct LogBuffer {
    state: State,
}

impl LogBuffer {
    /// A buffer that holds lines until flushed
    pub fn new() -> Self {
        Self {
            state: State::Buffering(Vec::new()),
        }
    }

    /// A buffer that is already in passthrough
    pub fn passthrough() -> Self {
        Self {
            state: State::Passthrough,
        }
    }

    /// Whether lines are still being held back
    pub fn is_buffering(&self) -> bool {
        matches!(self.state, State::Buffering(_))
    }

    /// Number of lines currently held
    pub fn pending(&self) -> usize {
        match &self.state {
            State::Buffering(lines) => lines.len(),
            State::Passthrough => 0,
        }
    }

    /// Hold `line`, or write it straight through once flushed.
    pub fn push(&mut self, line: String, console: &mut dyn Console) {
        match &mut self.state {
            State::Buffering(lines) => lines.push(line),
            State::Passthrough => console.write_line(&line),
        }
    }

    /// Write out every held line in order and stop buffering.
    ///
    /// Returns the number of lines written. Flushing twice is a no-op.
    pub fn flush(&mut self, console: &mut dyn Console) -> usize {
        match std::mem::replace(&mut self.state, State::Passthrough) {
            State::Buffering(lines) => {
                for line in &lines {
                    console.write_line(line);
                }
                lines.len()
            }
            State::Passthrough => 0,
        }
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}
