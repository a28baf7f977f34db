//! Shared test helpers for integration tests

use conformance_harness::reporter::{MemoryConsole, MemoryPage, RecordingSink};
use conformance_harness::{HarnessConfig, Reporter};

/// A reporter wired to in-memory collaborators.
pub struct Harness {
    pub reporter: Reporter,
    pub sink: RecordingSink,
    pub console: MemoryConsole,
    #[allow(dead_code)]
    pub page: MemoryPage,
}

/// Build a harness for `test_id` with default configuration
pub fn harness(test_id: &str) -> Harness {
    harness_with(HarnessConfig::default().with_test_id(test_id))
}

/// Build a harness from an explicit configuration
pub fn harness_with(config: HarnessConfig) -> Harness {
    let sink = RecordingSink::new();
    let console = MemoryConsole::new();
    let page = MemoryPage::new();
    let reporter = Reporter::new(config)
        .with_sink(sink.clone())
        .with_console(console.clone())
        .with_page(page.clone());
    Harness {
        reporter,
        sink,
        console,
        page,
    }
}

/// Messages of every recorded result, in order
#[allow(dead_code)]
pub fn messages(sink: &RecordingSink) -> Vec<String> {
    sink.results().into_iter().map(|r| r.message).collect()
}
