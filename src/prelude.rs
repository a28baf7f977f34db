//! Prelude module for convenient imports
//!
//! ```no_run
//! use conformance_harness::prelude::*;
//!
//! let sink = RecordingSink::new();
//! let mut reporter = Reporter::new(HarnessConfig::default()).with_sink(sink.clone());
//! reporter.should_throw("f()", || Err(Thrown::error(ErrorKind::TypeError, "bad")), None);
//! reporter.finish();
//! ```

// Values
pub use crate::value::{Evaluation, Object, ObjectKind, Thrown, TypedArrayKind, Value};

// Comparison
pub use crate::compare::{are_arrays_equal, is_result_correct, max_array_diff};

// Reporting
pub use crate::config::HarnessConfig;
pub use crate::reporter::{
    Console, MemoryConsole, MemoryPage, Page, RecordingSink, ReportedResult, Reporter,
    ResultSink, RunningTotals, StdoutConsole, TracingConsole, WriterConsole,
};

// Scripts
pub use crate::script::{Script, ScriptReport, Step};

// Error handling
pub use crate::error::{Error, ErrorKind, Result};
