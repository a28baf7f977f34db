//! Assertion scripts
//!
//! A script is a JSON document listing assertion steps with pre-evaluated
//! operands. Replaying it through a [`Reporter`] exercises exactly the same
//! paths a live test page would, which makes scripts handy for reproducing a
//! failing run and for checking a result sink integration offline.
//!
//! ```json
//! {
//!   "test_id": "/conformance/buffers/buffer-data.html",
//!   "steps": [
//!     { "op": "set_test_name", "name": "bufferData" },
//!     { "op": "should_be", "expr": "gl.getError()", "actual": 0, "expected": 0 },
//!     { "op": "should_throw", "expr": "gl.bufferData()", "actual": { "throw": { "error": "TypeError", "message": "not enough arguments" } } },
//!     { "op": "finish" }
//!   ]
//! }
//! ```
//!
//! Operands are plain JSON values plus a few tagged objects for what JSON
//! cannot express: `{"number": "NaN" | "-0" | "Infinity" | "-Infinity"}`,
//! `{"undefined": true}`, `{"error": name, "message": text}`,
//! `{"instance": [class, ...]}`, `{"typed_array": kind, "values": [...]}`,
//! `{"function": name, "source": text}` and `{"throw": operand}` for an
//! evaluation that raises.

use crate::config::HarnessConfig;
use crate::error::{Error, Result};
use crate::reporter::{Console, RecordingSink, ReportedResult, Reporter, RunningTotals};
use crate::value::{Evaluation, Thrown, TypedArrayKind, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One scripted call into the harness.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    SetTestName {
        name: String,
    },
    Description {
        #[serde(default)]
        message: Option<String>,
    },
    Debug {
        message: String,
    },
    Pass {
        #[serde(default)]
        message: String,
    },
    Fail {
        #[serde(default)]
        message: String,
    },
    Skip {
        #[serde(default)]
        message: String,
    },
    ShouldBe {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        #[serde(default)]
        expected: serde_json::Value,
        #[serde(default)]
        quiet: bool,
    },
    ShouldNotBe {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        #[serde(default)]
        expected: serde_json::Value,
    },
    ShouldBeTrue {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeFalse {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeNull {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeNan {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeUndefined {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeDefined {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeNonZero {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeNonNull {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
    },
    ShouldBeType {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        type_name: String,
    },
    ShouldBeLessThanOrEqual {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        bound: serde_json::Value,
    },
    ShouldBeGreaterThanOrEqual {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        bound: serde_json::Value,
    },
    ShouldThrow {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        #[serde(default)]
        expected: Option<serde_json::Value>,
    },
    ShouldNotThrow {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        #[serde(default)]
        description: Option<String>,
    },
    ShouldEvaluateTo {
        expr: String,
        #[serde(default)]
        actual: serde_json::Value,
        #[serde(default)]
        expected: serde_json::Value,
    },
    ExpectArray {
        was: Vec<f64>,
        expected: Vec<f64>,
        #[serde(default)]
        max_diff: f64,
    },
    Finish,
}

/// A parsed assertion script.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Identifier reported with every result; overrides the configured one.
    #[serde(default)]
    pub test_id: Option<String>,
    /// Default text for `description` steps without a message.
    #[serde(default)]
    pub title: Option<String>,
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from JSON text.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read and parse a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&source)
    }

    /// Check every operand can be converted, without running anything.
    pub fn validate(&self) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            for operand in step.operands() {
                operand_to_evaluation(operand)
                    .map(drop)
                    .map_err(|e| Error::script(format!("step {}: {}", index + 1, e)))?;
            }
        }
        Ok(())
    }

    /// Apply the script's identifiers to a base configuration.
    pub fn configure(&self, config: HarnessConfig) -> HarnessConfig {
        let mut config = config;
        if let Some(test_id) = &self.test_id {
            config.test_id = test_id.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        config
    }

    /// Replay every step through `reporter`.
    ///
    /// The script is validated first, so a bad operand aborts before any
    /// outcome is recorded. A mismatched `expect_array` aborts the replay
    /// with [`Error::InvalidInput`].
    pub fn run(&self, reporter: &mut Reporter) -> Result<()> {
        self.validate()?;
        for step in &self.steps {
            tracing::trace!(?step, "replaying step");
            run_step(step, reporter)?;
        }
        Ok(())
    }

    /// Replay against a fresh reporter recording every result.
    pub fn replay(&self, config: HarnessConfig, console: impl Console + 'static) -> Result<ScriptReport> {
        let config = self.configure(config);
        let test_id = config.test_id.clone();
        let sink = RecordingSink::new();
        let mut reporter = Reporter::new(config)
            .with_console(console)
            .with_sink(sink.clone());
        self.run(&mut reporter)?;
        Ok(ScriptReport {
            test_id,
            totals: reporter.totals(),
            finished: reporter.is_finished(),
            results: sink.results(),
        })
    }
}

impl Step {
    fn operands(&self) -> Vec<&serde_json::Value> {
        match self {
            Step::ShouldBe { actual, expected, .. }
            | Step::ShouldNotBe { actual, expected, .. }
            | Step::ShouldEvaluateTo { actual, expected, .. } => vec![actual, expected],
            Step::ShouldBeTrue { actual, .. }
            | Step::ShouldBeFalse { actual, .. }
            | Step::ShouldBeNull { actual, .. }
            | Step::ShouldBeNan { actual, .. }
            | Step::ShouldBeUndefined { actual, .. }
            | Step::ShouldBeDefined { actual, .. }
            | Step::ShouldBeNonZero { actual, .. }
            | Step::ShouldBeNonNull { actual, .. }
            | Step::ShouldBeType { actual, .. }
            | Step::ShouldNotThrow { actual, .. } => vec![actual],
            Step::ShouldBeLessThanOrEqual { actual, bound, .. }
            | Step::ShouldBeGreaterThanOrEqual { actual, bound, .. } => vec![actual, bound],
            Step::ShouldThrow { actual, expected, .. } => {
                let mut operands = vec![actual];
                operands.extend(expected.as_ref());
                operands
            }
            Step::SetTestName { .. }
            | Step::Description { .. }
            | Step::Debug { .. }
            | Step::Pass { .. }
            | Step::Fail { .. }
            | Step::Skip { .. }
            | Step::ExpectArray { .. }
            | Step::Finish => Vec::new(),
        }
    }
}

fn run_step(step: &Step, r: &mut Reporter) -> Result<()> {
    match step {
        Step::SetTestName { name } => r.set_current_test_name(name.clone()),
        Step::Description { message } => r.description(message.as_deref()),
        Step::Debug { message } => r.debug(message),
        Step::Pass { message } => r.pass(message),
        Step::Fail { message } => r.fail(message),
        Step::Skip { message } => r.skip(message),
        Step::ShouldBe { expr, actual, expected, quiet } => {
            let (actual, expected) = (operand_to_evaluation(actual)?, operand_to_value(expected)?);
            if *quiet {
                r.should_be_quietly(expr, || actual, expected);
            } else {
                r.should_be(expr, || actual, expected);
            }
        }
        Step::ShouldNotBe { expr, actual, expected } => {
            let (actual, expected) = (operand_to_evaluation(actual)?, operand_to_value(expected)?);
            r.should_not_be(expr, || actual, expected);
        }
        Step::ShouldBeTrue { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_true(expr, || actual);
        }
        Step::ShouldBeFalse { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_false(expr, || actual);
        }
        Step::ShouldBeNull { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_null(expr, || actual);
        }
        Step::ShouldBeNan { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_nan(expr, || actual);
        }
        Step::ShouldBeUndefined { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_undefined(expr, || actual);
        }
        Step::ShouldBeDefined { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_defined(expr, || actual);
        }
        Step::ShouldBeNonZero { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_non_zero(expr, || actual);
        }
        Step::ShouldBeNonNull { expr, actual } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_non_null(expr, || actual);
        }
        Step::ShouldBeType { expr, actual, type_name } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_be_type(expr, || actual, type_name);
        }
        Step::ShouldBeLessThanOrEqual { expr, actual, bound } => {
            let (actual, bound) = (operand_to_evaluation(actual)?, operand_to_value(bound)?);
            r.should_be_less_than_or_equal(expr, || actual, bound);
        }
        Step::ShouldBeGreaterThanOrEqual { expr, actual, bound } => {
            let (actual, bound) = (operand_to_evaluation(actual)?, operand_to_value(bound)?);
            r.should_be_greater_than_or_equal(expr, || actual, bound);
        }
        Step::ShouldThrow { expr, actual, expected } => {
            let actual = operand_to_evaluation(actual)?;
            let expected = expected.as_ref().map(operand_to_value).transpose()?;
            r.should_throw(expr, || actual, expected);
        }
        Step::ShouldNotThrow { expr, actual, description } => {
            let actual = operand_to_evaluation(actual)?;
            r.should_not_throw(expr, || actual, description.as_deref());
        }
        Step::ShouldEvaluateTo { expr, actual, expected } => {
            let (actual, expected) = (operand_to_evaluation(actual)?, operand_to_value(expected)?);
            r.should_evaluate_to(expr, || actual, expected);
        }
        Step::ExpectArray { was, expected, max_diff } => r.expect_array(was, expected, *max_diff)?,
        Step::Finish => r.finish(),
    }
    Ok(())
}

/// Convert a JSON operand into an evaluation result.
pub fn operand_to_evaluation(json: &serde_json::Value) -> Result<Evaluation> {
    if let Some(raised) = json.as_object().and_then(|map| map.get("throw")) {
        return Ok(Err(Thrown(operand_to_value(raised)?)));
    }
    operand_to_value(json).map(Ok)
}

/// Convert a JSON operand into a value. Raising operands are rejected.
pub fn operand_to_value(json: &serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    let value = match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(elements) => Value::new_array(
            elements
                .iter()
                .map(operand_to_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        Json::Object(map) => {
            let text = |key: &str| map.get(key).and_then(Json::as_str);
            if let Some(number) = text("number") {
                Value::Number(match number {
                    "NaN" => f64::NAN,
                    "-0" => -0.0,
                    "Infinity" => f64::INFINITY,
                    "-Infinity" => f64::NEG_INFINITY,
                    other => return Err(Error::script(format!("unknown number literal '{}'", other))),
                })
            } else if map.get("undefined").and_then(Json::as_bool) == Some(true) {
                Value::Undefined
            } else if let Some(name) = text("error") {
                Value::new_named_error(name, text("message").unwrap_or_default())
            } else if let Some(Json::Array(classes)) = map.get("instance") {
                let classes = classes
                    .iter()
                    .map(|c| c.as_str().ok_or_else(|| Error::script("instance classes must be strings")))
                    .collect::<Result<Vec<_>>>()?;
                Value::new_instance(&classes)
            } else if let Some(kind) = text("typed_array") {
                let kind = TypedArrayKind::from_name(kind)
                    .ok_or_else(|| Error::script(format!("unknown typed array '{}'", kind)))?;
                let values: Vec<f64> = match map.get("values") {
                    Some(values) => serde_json::from_value(values.clone())?,
                    None => Vec::new(),
                };
                Value::new_typed_array(kind, values)
            } else if let Some(name) = text("function") {
                Value::new_function(name, text("source").unwrap_or_default())
            } else if map.contains_key("throw") {
                return Err(Error::script("a raising operand is only allowed as an actual value"));
            } else {
                return Err(Error::script(format!("unrecognised operand {}", json)));
            }
        }
    };
    Ok(value)
}

/// Outcome of replaying a script.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub test_id: String,
    pub totals: RunningTotals,
    pub finished: bool,
    pub results: Vec<ReportedResult>,
}

impl ScriptReport {
    /// Whether every recorded result passed (skips included)
    pub fn succeeded(&self) -> bool {
        self.totals.failed == 0
    }
}

impl fmt::Display for ScriptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  {}", if self.test_id.is_empty() { "Results" } else { &self.test_id })?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;

        for result in &self.results {
            let icon = match (result.success, result.skipped) {
                (_, true) => "○",
                (true, false) => "✓",
                (false, false) => "✗",
            };
            writeln!(f, "  {} {}", icon, result.message)?;
        }

        writeln!(f, "\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  {}", self.totals)?;
        if !self.finished {
            writeln!(f, "  (run did not signal completion)")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        Ok(())
    }
}
