//! Outcome reporting
//!
//! A [`Reporter`] is one test run's session: it turns verdicts into recorded
//! outcomes, forwards them to the result sink, keeps running totals and owns
//! the console buffer and the current test name. Independent runs use
//! independent reporters.
//!
//! # Example
//!
//! ```no_run
//! use conformance_harness::reporter::{Reporter, RecordingSink};
//! use conformance_harness::HarnessConfig;
//!
//! let sink = RecordingSink::new();
//! let mut reporter = Reporter::new(HarnessConfig::default().with_test_id("/buffers.html"))
//!     .with_sink(sink.clone());
//! reporter.set_current_test_name("bufferData");
//! reporter.pass("size matches");
//! reporter.finish();
//! assert_eq!(sink.results().len(), 1);
//! ```

pub mod buffer;
pub mod sink;

pub use buffer::LogBuffer;
pub use sink::{
    escape_html, Console, MemoryConsole, MemoryPage, Page, RecordingSink, ReportedResult,
    ResultSink, StdoutConsole, TracingConsole, WriterConsole,
};

use crate::config::HarnessConfig;
use crate::error::{messages, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pass/fail/skip counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTotals {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunningTotals {
    /// Total number of recorded outcomes
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

impl fmt::Display for RunningTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}  Passed: {}  Failed: {}  Skipped: {}",
            self.total(),
            self.passed,
            self.failed,
            self.skipped
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum SpanClass {
    Pass,
    Fail,
    Warn,
}

impl SpanClass {
    fn class(&self) -> &'static str {
        match self {
            SpanClass::Pass => "pass",
            SpanClass::Fail => "fail",
            SpanClass::Warn => "warn",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SpanClass::Pass => "PASS",
            SpanClass::Fail => "FAIL",
            SpanClass::Warn => "SKIP",
        }
    }
}

/// One test run's reporting session.
pub struct Reporter {
    config: HarnessConfig,
    console: Box<dyn Console>,
    sink: Option<Box<dyn ResultSink>>,
    page: Option<Box<dyn Page>>,
    buffer: LogBuffer,
    totals: RunningTotals,
    current_test_name: Option<String>,
    finished: bool,
}

impl Reporter {
    /// Create a reporter logging to standard output with no result sink.
    pub fn new(config: HarnessConfig) -> Self {
        let buffer = if config.buffer_console {
            LogBuffer::new()
        } else {
            LogBuffer::passthrough()
        };
        Self {
            config,
            console: Box::new(StdoutConsole),
            sink: None,
            page: None,
            buffer,
            totals: RunningTotals::default(),
            current_test_name: None,
            finished: false,
        }
    }

    /// Replace the console
    pub fn with_console(mut self, console: impl Console + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    /// Attach a result sink
    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Attach a page for visible result lines
    pub fn with_page(mut self, page: impl Page + 'static) -> Self {
        self.page = Some(Box::new(page));
        self
    }

    /// Session configuration
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Counts recorded so far
    pub fn totals(&self) -> RunningTotals {
        self.totals
    }

    /// Whether console lines are still being held back
    pub fn is_buffering(&self) -> bool {
        self.buffer.is_buffering()
    }

    /// Whether completion has been signalled
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_current_test_name(&mut self, name: impl Into<String>) {
        self.current_test_name = Some(name.into());
    }

    pub fn clear_current_test_name(&mut self) {
        self.current_test_name = None;
    }

    pub fn current_test_name(&self) -> Option<&str> {
        self.current_test_name.as_deref()
    }

    pub fn enable_verbose_logging(&mut self) {
        self.config.verbose_logging = true;
    }

    /// Record a pass.
    pub fn pass(&mut self, message: &str) {
        let message = self.prefixed(or_default(message, messages::PASSED));
        self.totals.passed += 1;
        tracing::trace!(result = %message, "pass");
        self.report(true, &message, false);
        if !self.config.quiet {
            self.add_span(SpanClass::Pass, &message);
        }
        if self.config.verbose_logging {
            self.buffered_log(&format!("PASS {}", message));
        }
    }

    /// Record a failure and flush everything buffered so far.
    pub fn fail(&mut self, message: &str) {
        let message = self.prefixed(or_default(message, messages::FAILED));
        self.totals.failed += 1;
        tracing::trace!(result = %message, "fail");
        self.report(false, &message, false);
        self.add_span(SpanClass::Fail, &message);
        self.buffered_log(&format!("FAIL {}", message));
        self.flush();
    }

    /// Record a skipped check. Never counted as a pass.
    pub fn skip(&mut self, message: &str) {
        let message = self.prefixed(message);
        self.totals.skipped += 1;
        tracing::trace!(result = %message, "skip");
        self.report(true, &message, true);
        if !self.config.quiet {
            self.add_span(SpanClass::Warn, &message);
        }
        if self.config.verbose_logging {
            self.buffered_log(&format!("SKIP {}", message));
        }
    }

    /// Record a pass, showing a page line only when `show` is set.
    ///
    /// The test name prefixes the reported message; the console line does
    /// not carry it.
    pub fn pass_with_options(&mut self, message: &str, show: bool) {
        let reported = self.prefixed(message);
        self.totals.passed += 1;
        tracing::trace!(result = %reported, "pass");
        self.report(true, &reported, false);
        if show && !self.config.quiet {
            self.add_span(SpanClass::Pass, &reported);
        }
        if self.config.verbose_logging {
            self.buffered_log(&format!("PASS {}", message));
        }
    }

    /// Record a skip, showing a page line only when `show` is set.
    pub fn skip_with_options(&mut self, message: &str, show: bool) {
        let reported = self.prefixed(message);
        self.totals.skipped += 1;
        tracing::trace!(result = %reported, "skip");
        self.report(true, &reported, true);
        if show && !self.config.quiet {
            self.add_span(SpanClass::Warn, &reported);
        }
        if self.config.verbose_logging {
            self.buffered_log(&format!("SKIP {}", message));
        }
    }

    /// Record a failure; with `raise` set, also abort the current test.
    ///
    /// Raising clears the current test name and returns
    /// [`Error::TestFailed`] for the caller to propagate.
    pub fn fail_with_options(&mut self, message: &str, raise: bool) -> Result<()> {
        let reported = self.prefixed(message);
        self.totals.failed += 1;
        tracing::trace!(result = %reported, "fail");
        self.report(false, &reported, false);
        self.add_span(SpanClass::Fail, &reported);
        self.buffered_log(&format!("FAIL {}", message));
        self.flush();
        if raise {
            self.current_test_name = None;
            return Err(Error::TestFailed(message.to_string()));
        }
        Ok(())
    }

    /// Signal that the run is complete.
    ///
    /// A second call is recorded as a failure and does not reach the sink.
    pub fn finish(&mut self) {
        if self.finished {
            tracing::warn!(test_id = %self.config.test_id, "completion signalled twice");
            self.fail(messages::DUPLICATE_FINISH);
            return;
        }
        self.finished = true;
        tracing::debug!(test_id = %self.config.test_id, totals = %self.totals, "run finished");
        if let Some(sink) = self.sink.as_mut() {
            sink.report_finished(&self.config.test_id);
        }
    }

    /// Log the run's description; `None` falls back to the configured title.
    pub fn description(&mut self, message: Option<&str>) {
        let message = message.map(str::to_string).unwrap_or_else(|| self.config.title.clone());
        self.buffered_log(&format!("DESCRIPTION: {}", message));
    }

    /// Informational line.
    pub fn debug(&mut self, message: &str) {
        if !self.config.quiet {
            if let Some(page) = self.page.as_mut() {
                page.add_span(message);
            }
        }
        if self.config.verbose_logging {
            self.buffered_log(message);
        }
    }

    /// Page-only warning shown when `condition` is false.
    pub fn check_message(&mut self, condition: bool, message: &str) {
        if !condition {
            let name = self.current_test_name.clone().unwrap_or_default();
            if let Some(page) = self.page.as_mut() {
                page.add_span(&format!(
                    "<span><span class=\"warn\">WARNING</span> {}: {}</span>",
                    escape_html(&name),
                    escape_html(message)
                ));
            }
        }
    }

    /// Write a console line through the buffer.
    pub fn buffered_log(&mut self, message: &str) {
        self.buffer.push(message.to_string(), self.console.as_mut());
    }

    fn flush(&mut self) {
        let flushed = self.buffer.flush(self.console.as_mut());
        if flushed > 0 {
            tracing::debug!(lines = flushed, "flushed buffered console output");
        }
    }

    fn prefixed(&self, message: &str) -> String {
        match &self.current_test_name {
            Some(name) if !name.is_empty() => format!("{}: {}", name, message),
            _ => message.to_string(),
        }
    }

    fn report(&mut self, success: bool, message: &str, skipped: bool) {
        if let Some(sink) = self.sink.as_mut() {
            sink.report_result(&self.config.test_id, success, message, skipped);
        }
    }

    fn add_span(&mut self, class: SpanClass, message: &str) {
        if let Some(page) = self.page.as_mut() {
            page.add_span(&format!(
                "<span><span class=\"{}\">{}</span> {}</span>",
                class.class(),
                class.label(),
                escape_html(message)
            ));
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("config", &self.config)
            .field("buffer", &self.buffer)
            .field("totals", &self.totals)
            .field("current_test_name", &self.current_test_name)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

fn or_default<'a>(message: &'a str, default: &'a str) -> &'a str {
    if message.is_empty() {
        default
    } else {
        message
    }
}
