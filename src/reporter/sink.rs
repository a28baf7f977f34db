//! Collaborators the reporter writes to
//!
//! The embedder decides where outcomes go: an optional [`ResultSink`] for the
//! surrounding test runner, a [`Console`] for log lines and an optional
//! [`Page`] for visible result lines.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Receives recorded outcomes on behalf of an embedding test runner.
pub trait ResultSink {
    /// Record one outcome. `skipped` marks results on the skip channel.
    fn report_result(&mut self, test_id: &str, success: bool, message: &str, skipped: bool);

    /// Signal that the run is complete.
    fn report_finished(&mut self, test_id: &str);
}

/// Line-oriented log output.
pub trait Console {
    fn write_line(&mut self, message: &str);
}

/// Visible, rendered result lines. Purely cosmetic.
pub trait Page {
    fn add_span(&mut self, html: &str);
}

/// Console writing to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Console writing each line to any [`Write`]. Write errors are dropped.
#[derive(Debug)]
pub struct WriterConsole<W: Write> {
    writer: W,
}

impl<W: Write> WriterConsole<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterConsole<io::Stderr> {
    /// Console on standard error, for when stdout carries a report
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> Console for WriterConsole<W> {
    fn write_line(&mut self, message: &str) {
        let _ = writeln!(self.writer, "{}", message);
    }
}

/// Console forwarding each line as a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn write_line(&mut self, message: &str) {
        tracing::info!(target: "conformance_harness::console", "{}", message);
    }
}

/// In-memory console; clones share the same line list.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Console for MemoryConsole {
    fn write_line(&mut self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}

/// One outcome as seen by a [`ResultSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedResult {
    pub test_id: String,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

#[derive(Debug, Default)]
struct Recording {
    results: Vec<ReportedResult>,
    finished: Vec<String>,
}

/// In-memory result sink; clones share the same recording.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    recording: Rc<RefCell<Recording>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every reported result
    pub fn results(&self) -> Vec<ReportedResult> {
        self.recording.borrow().results.clone()
    }

    /// Test ids for which completion was signalled, one entry per signal
    pub fn finished(&self) -> Vec<String> {
        self.recording.borrow().finished.clone()
    }
}

impl ResultSink for RecordingSink {
    fn report_result(&mut self, test_id: &str, success: bool, message: &str, skipped: bool) {
        self.recording.borrow_mut().results.push(ReportedResult {
            test_id: test_id.to_string(),
            success,
            message: message.to_string(),
            skipped,
        });
    }

    fn report_finished(&mut self, test_id: &str) {
        self.recording.borrow_mut().finished.push(test_id.to_string());
    }
}

/// In-memory page; clones share the same span list.
#[derive(Debug, Default, Clone)]
pub struct MemoryPage {
    spans: Rc<RefCell<Vec<String>>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> Vec<String> {
        self.spans.borrow().clone()
    }
}

impl Page for MemoryPage {
    fn add_span(&mut self, html: &str) {
        self.spans.borrow_mut().push(html.to_string());
    }
}

/// Escape text for inclusion in a page line.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

/// Run `f` under a trace-level subscriber and return everything it logged.
#[cfg(test)]
pub(crate) fn capture_tracing(f: impl FnOnce()) -> String {
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
