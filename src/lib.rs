//! Conformance harness: assertion and reporting core for browser API conformance suites
//!
//! Test pages evaluate expressions and hand the outcomes to a [`Reporter`],
//! which compares them against expectations using script-language equality,
//! records pass/fail/skip results, forwards them to an embedding result sink
//! and keeps console output quiet until something fails.
//!
//! # Quick Start
//!
//! ```no_run
//! use conformance_harness::{HarnessConfig, Reporter, Value};
//!
//! let mut reporter = Reporter::new(HarnessConfig::from_query("/buffers.html?quiet=1"));
//! reporter.set_current_test_name("bufferData");
//! reporter.should_be("gl.getError()", || Ok(Value::from(0)), 0);
//! reporter.should_be_true("buffer instanceof WebGLBuffer", || Ok(true.into()));
//! reporter.finish();
//! println!("{}", reporter.totals());
//! ```
//!
//! # Module Overview
//!
//! | Category | Modules |
//! |----------|---------|
//! | **Values** | [`value`], [`compare`] |
//! | **Reporting** | [`reporter`], [`assertions`], [`config`], [`error`](Error) |
//! | **Tooling** | [`script`] |

pub mod assertions;
pub mod compare;
pub mod config;
pub mod prelude;
pub mod reporter;
pub mod script;
pub mod value;

mod error;

pub use config::HarnessConfig;
pub use error::{messages, Error, ErrorKind, Result};
pub use reporter::{Reporter, RunningTotals};
pub use value::{Evaluation, Thrown, Value};

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
