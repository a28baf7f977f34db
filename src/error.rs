//! Error types for the conformance harness

use std::fmt;
use thiserror::Error;

/// Main error type for the harness.
///
/// Assertion mismatches never surface here: they are recorded as failed
/// outcomes. Only programming mistakes in a test (bad input to an assertion,
/// an explicit request to abort) and the I/O of the script runner escape to
/// the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// An assertion was called with arguments it cannot compare
    #[error("InvalidInput: {0}")]
    InvalidInput(String),

    /// A failure reported with the raise option set, aborting the current test
    #[error("TestFailedException: {0}")]
    TestFailed(String),

    /// An assertion script is malformed
    #[error("ScriptError: {0}")]
    Script(String),

    /// IO error
    #[error("IOError: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSONError: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Create a script error
    pub fn script(message: impl Into<String>) -> Self {
        Error::Script(message.into())
    }
}

/// Result type alias for the harness
pub type Result<T> = std::result::Result<T, Error>;

/// Script error kinds, used to name raised errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum ErrorKind {
    /// TypeError - wrong type for operation
    TypeError,
    /// ReferenceError - undefined variable
    ReferenceError,
    /// RangeError - value out of range
    RangeError,
    /// SyntaxError - invalid syntax
    SyntaxError,
    /// Generic Error - user-thrown Error objects
    GenericError,
}

impl ErrorKind {
    /// Constructor name of this error kind
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::GenericError => "Error",
        }
    }

    /// Look up an error kind by constructor name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TypeError" => Some(ErrorKind::TypeError),
            "ReferenceError" => Some(ErrorKind::ReferenceError),
            "RangeError" => Some(ErrorKind::RangeError),
            "SyntaxError" => Some(ErrorKind::SyntaxError),
            "Error" => Some(ErrorKind::GenericError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Standardized message templates shared by the assertion helpers.
pub mod messages {
    pub const PASSED: &str = "Passed";
    pub const FAILED: &str = "Failed";
    pub const THREW_EXCEPTION: &str = "Threw exception";
    pub const DUPLICATE_FINISH: &str = "Duplicate finish(): the run already signalled completion";

    /// Format "X should be Y. Threw exception E"
    pub fn threw(subject: &str, verb: &str, expected: &str, exception: &str) -> String {
        format!("{} {} {}. {} {}", subject, verb, expected, THREW_EXCEPTION, exception)
    }

    /// Format "a and b have different lengths: N vs M"
    pub fn length_mismatch(a: usize, b: usize) -> String {
        format!("a and b have different lengths: {} vs {}", a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("bad");
        assert_eq!(err.to_string(), "InvalidInput: bad");
        let err = Error::TestFailed("boom".into());
        assert_eq!(err.to_string(), "TestFailedException: boom");
    }

    #[test]
    fn test_error_kind_names_round_trip() {
        for kind in [
            ErrorKind::TypeError,
            ErrorKind::ReferenceError,
            ErrorKind::RangeError,
            ErrorKind::SyntaxError,
            ErrorKind::GenericError,
        ] {
            assert_eq!(ErrorKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ErrorKind::from_name("WebGLError"), None);
    }

    #[test]
    fn test_threw_message() {
        assert_eq!(
            messages::threw("x", "should be", "1", "TypeError: nope"),
            "x should be 1. Threw exception TypeError: nope"
        );
    }
}
