//! Assertion vocabulary
//!
//! Every helper takes the operand's source text (used in messages) and a
//! closure producing its value. A value raised by the closure becomes a
//! descriptive failure and never escapes the helper; only
//! [`should_throw`](Reporter::should_throw) treats it as success. Each call
//! records exactly one outcome, except the quiet `should_be` variants which
//! record nothing on success.
//!
//! # Example
//!
//! ```no_run
//! use conformance_harness::prelude::*;
//!
//! let mut harness = Reporter::new(HarnessConfig::default());
//! harness.should_be("gl.getError()", || Ok(Value::from(0)), 0);
//! harness.should_be_nan("0 / 0", || Ok(Value::Number(f64::NAN)));
//! harness.should_throw("undefinedFunction()", || Err(Thrown::error(ErrorKind::ReferenceError, "undefinedFunction is not defined")), None);
//! ```

use crate::compare::{is_result_correct, max_array_diff, stringify};
use crate::error::{messages, Result};
use crate::reporter::Reporter;
use crate::value::{number_to_js_string, Evaluation, Value};
use std::cmp::Ordering;

impl Reporter {
    /// Pass when `actual` compares equal to `expected`.
    pub fn should_be<F>(&mut self, expr: &str, actual: F, expected: impl Into<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        self.check_should_be(expr, actual(), &expected.into(), false);
    }

    /// Like [`should_be`](Self::should_be) but records nothing on success.
    pub fn should_be_quietly<F>(&mut self, expr: &str, actual: F, expected: impl Into<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        self.check_should_be(expr, actual(), &expected.into(), true);
    }

    fn check_should_be(&mut self, expr: &str, actual: Evaluation, expected: &Value, quiet: bool) {
        match actual {
            Err(e) => self.fail(&messages::threw(
                expr,
                "should be",
                &expected.to_js_string(),
                &e.to_string(),
            )),
            Ok(av) if is_result_correct(&av, expected) => {
                if !quiet {
                    self.pass(&format!("{} is {}", expr, expected.to_literal()));
                }
            }
            Ok(av) if av.type_of() == expected.type_of() => self.fail(&format!(
                "{} should be {}. Was {}.",
                expr,
                expected,
                stringify(&av)
            )),
            Ok(av) => self.fail(&format!(
                "{} should be {} (of type {}). Was {} (of type {}).",
                expr,
                expected,
                expected.type_of(),
                av,
                av.type_of()
            )),
        }
    }

    /// Pass when `actual` does not compare equal to `expected`.
    pub fn should_not_be<F>(&mut self, expr: &str, actual: F, expected: impl Into<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        let expected = expected.into();
        match actual() {
            Err(e) => self.fail(&messages::threw(
                expr,
                "should not be",
                &expected.to_js_string(),
                &e.to_string(),
            )),
            Ok(av) if !is_result_correct(&av, &expected) => {
                self.pass(&format!("{} is not {}", expr, expected.to_literal()))
            }
            Ok(_) => self.fail(&format!("{} should not be {}.", expr, expected)),
        }
    }

    pub fn should_be_true<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        self.should_be(expr, actual, true);
    }

    pub fn should_be_false<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        self.should_be(expr, actual, false);
    }

    pub fn should_be_nan<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        self.should_be(expr, actual, f64::NAN);
    }

    pub fn should_be_null<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        self.should_be(expr, actual, Value::Null);
    }

    /// `should_be` against a string literal.
    pub fn should_be_equal_to_string<F>(&mut self, expr: &str, actual: F, expected: &str)
    where
        F: FnOnce() -> Evaluation,
    {
        self.should_be(expr, actual, expected);
    }

    /// Loose (`==`) comparison against a string.
    pub fn should_be_string<F>(&mut self, expr: &str, actual: F, expected: &str)
    where
        F: FnOnce() -> Evaluation,
    {
        let text = format!("{} should be {}.", expr, expected);
        match actual() {
            Err(e) => self.fail(&format!("{} {} {}", text, messages::THREW_EXCEPTION, e)),
            Ok(val) if val.equals(&Value::from(expected)) => self.pass(&text),
            Ok(val) => self.fail(&format!("{} (was {})", text, val)),
        }
    }

    pub fn should_be_non_zero<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        match actual() {
            Err(e) => self.fail(&messages::threw(expr, "should be", "non-zero", &e.to_string())),
            Ok(av) if !av.equals(&Value::Number(0.0)) => {
                self.pass(&format!("{} is non-zero.", expr))
            }
            Ok(av) => self.fail(&format!("{} should be non-zero. Was {}", expr, av)),
        }
    }

    pub fn should_be_non_null<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        match actual() {
            Err(e) => self.fail(&messages::threw(expr, "should be", "non-null", &e.to_string())),
            Ok(av) if !av.is_nullish() => self.pass(&format!("{} is non-null.", expr)),
            Ok(av) => self.fail(&format!("{} should be non-null. Was {}", expr, av)),
        }
    }

    pub fn should_be_undefined<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        match actual() {
            Err(e) => self.fail(&messages::threw(expr, "should be", "undefined", &e.to_string())),
            Ok(Value::Undefined) => self.pass(&format!("{} is undefined.", expr)),
            Ok(av) => self.fail(&format!("{} should be undefined. Was {}", expr, av)),
        }
    }

    pub fn should_be_defined<F>(&mut self, expr: &str, actual: F)
    where
        F: FnOnce() -> Evaluation,
    {
        match actual() {
            Err(e) => self.fail(&messages::threw(expr, "should be", "defined", &e.to_string())),
            Ok(Value::Undefined) => self.fail(&format!("{} should be defined. Was undefined", expr)),
            Ok(_) => self.pass(&format!("{} is defined.", expr)),
        }
    }

    /// `instanceof` check against a constructor name.
    ///
    /// `Number` also accepts number primitives, which are not instances of
    /// the boxed type.
    pub fn should_be_type<F>(&mut self, expr: &str, actual: F, type_name: &str)
    where
        F: FnOnce() -> Evaluation,
    {
        let av = match actual() {
            Ok(av) => av,
            Err(e) => {
                let expected = format!("an instance of {}", type_name);
                return self.fail(&messages::threw(expr, "should be", &expected, &e.to_string()));
            }
        };
        let is_instance = if type_name == "Number" {
            matches!(av, Value::Number(_)) || av.instance_of("Number")
        } else {
            av.instance_of(type_name)
        };
        if is_instance {
            self.pass(&format!("{} is an instance of {}", expr, type_name));
        } else {
            self.fail(&format!("{} is not an instance of {}", expr, type_name));
        }
    }

    pub fn should_be_less_than_or_equal<F>(&mut self, expr: &str, actual: F, bound: impl Into<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        self.check_bound(expr, actual(), &bound.into(), "<=", Ordering::Greater);
    }

    pub fn should_be_greater_than_or_equal<F>(&mut self, expr: &str, actual: F, bound: impl Into<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        self.check_bound(expr, actual(), &bound.into(), ">=", Ordering::Less);
    }

    fn check_bound(
        &mut self,
        expr: &str,
        actual: Evaluation,
        bound: &Value,
        op: &str,
        violation: Ordering,
    ) {
        let bound_text = bound.to_literal();
        let expected = format!("{} {}", op, bound_text);
        match actual {
            Err(e) => self.fail(&messages::threw(expr, "should be", &expected, &e.to_string())),
            Ok(av) if av.is_undefined() || av.compare(bound) == Some(violation) => {
                self.fail(&format!(
                    "{} should be {}. Was {} (of type {}).",
                    expr,
                    expected,
                    av,
                    av.type_of()
                ))
            }
            Ok(_) => self.pass(&format!("{} is {}", expr, expected)),
        }
    }

    /// Pass when evaluation raises; with `expected`, the raised value must
    /// also loosely equal it.
    pub fn should_throw<F>(&mut self, expr: &str, actual: F, expected: Option<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        let what = expected
            .as_ref()
            .map(Value::to_js_string)
            .unwrap_or_else(|| "an exception".to_string());
        match actual() {
            Err(e) => {
                let matches = expected.as_ref().map_or(true, |ev| e.value().equals(ev));
                if matches {
                    self.pass(&format!("{} threw exception {}.", expr, e));
                } else {
                    self.fail(&format!("{} should throw {}. Threw exception {}.", expr, what, e));
                }
            }
            Ok(av) => self.fail(&format!("{} should throw {}. Was {}.", expr, what, av)),
        }
    }

    /// Pass when evaluation completes. `description` defaults to the
    /// back-quoted expression.
    pub fn should_not_throw<F>(&mut self, expr: &str, actual: F, description: Option<&str>)
    where
        F: FnOnce() -> Evaluation,
    {
        let desc = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("`{}`", expr));
        match actual() {
            Ok(_) => self.pass(&format!("{} should not throw.", desc)),
            Err(e) => self.fail(&format!("{} should not throw, but threw exception {}.", desc, e)),
        }
    }

    /// General-purpose comparison choosing the check from the expected
    /// value's type.
    ///
    /// Nullish expectations check for `null`; functions compare by source
    /// text; other objects compare loosely against their string form;
    /// booleans check the type and then the value.
    pub fn should_evaluate_to<F>(&mut self, expr: &str, actual: F, expected: impl Into<Value>)
    where
        F: FnOnce() -> Evaluation,
    {
        let expected = expected.into();
        match &expected {
            Value::Undefined | Value::Null => self.should_be_null(expr, actual),
            Value::Object(_) if expected.is_function() => {
                let av = match actual() {
                    Ok(av) => av,
                    Err(e) => {
                        return self.fail(&format!(
                            "Evaluating {}: {} {}",
                            expr,
                            messages::THREW_EXCEPTION,
                            e
                        ))
                    }
                };
                let actual_text = av.to_js_string().replace('\n', "");
                let expected_text = expected.to_js_string().replace('\n', "");
                let quoted = format!("'{}'", actual_text);
                self.should_be(&quoted, || Ok(Value::from(actual_text)), expected_text);
            }
            Value::Object(_) => {
                let text = expected.to_js_string();
                let comparison = format!("{} == '{}'", expr, text);
                let target = Value::from(text);
                self.should_be_true(&comparison, || actual().map(|av| Value::from(av.equals(&target))));
            }
            Value::Boolean(b) => {
                let evaluated = actual();
                let type_expr = format!("typeof {}", expr);
                let type_of = evaluated.clone().map(|av| Value::from(av.type_of()));
                self.should_be(&type_expr, || type_of, "boolean");
                self.should_be(expr, || evaluated, *b);
            }
            Value::String(_) | Value::Number(_) => self.should_be(expr, actual, expected.clone()),
        }
    }

    /// Compare two numeric sequences within a tolerance.
    ///
    /// Fails only when the largest difference exceeds `max_diff`; a NaN
    /// difference or tolerance never exceeds anything and passes. Sequences
    /// of different lengths are a mistake in the test and are returned as
    /// [`Error::InvalidInput`](crate::Error::InvalidInput) without recording
    /// an outcome.
    pub fn expect_array(&mut self, was: &[f64], expected: &[f64], max_diff: f64) -> Result<()> {
        let diff = max_array_diff(expected, was)?;
        let mut text = format!("Expected [{}]", join_numbers(expected));
        if max_diff != 0.0 {
            text.push_str(&format!(" +/- {}", number_to_js_string(max_diff)));
        }
        if diff > max_diff {
            text.push_str(&format!(", was [{}]", join_numbers(was)));
            self.fail(&text);
        } else {
            self.pass(&text);
        }
        Ok(())
    }

    pub fn expect_true(&mut self, condition: bool, message: &str) {
        if condition {
            self.pass(message);
        } else {
            self.fail(message);
        }
    }

    pub fn assert_msg(&mut self, condition: bool, message: &str) {
        self.expect_true(condition, message);
    }

    /// [`assert_msg`](Self::assert_msg) with page visibility for passes and
    /// the option to abort the test on failure.
    pub fn assert_msg_options(
        &mut self,
        condition: bool,
        message: &str,
        verbose: bool,
        raise: bool,
    ) -> Result<()> {
        if condition {
            self.pass_with_options(message, verbose);
            Ok(())
        } else {
            self.fail_with_options(message, raise)
        }
    }

    /// Log the expression, then evaluate it. A raised value is recorded as a
    /// failure and yields `undefined`.
    pub fn eval_and_log<F>(&mut self, expr: &str, actual: F) -> Value
    where
        F: FnOnce() -> Evaluation,
    {
        self.debug(expr);
        match actual() {
            Ok(value) => value,
            Err(e) => {
                self.fail(&format!("{} threw exception {}", expr, e));
                Value::Undefined
            }
        }
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|n| number_to_js_string(*n))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::error::{Error, ErrorKind};
    use crate::reporter::{MemoryConsole, RecordingSink, ReportedResult};
    use crate::value::Thrown;

    fn harness() -> (Reporter, RecordingSink) {
        let sink = RecordingSink::new();
        let reporter = Reporter::new(HarnessConfig::default())
            .with_console(MemoryConsole::new())
            .with_sink(sink.clone());
        (reporter, sink)
    }

    fn last(sink: &RecordingSink) -> ReportedResult {
        sink.results().pop().expect("no result recorded")
    }

    #[test]
    fn test_should_be_pass_message() {
        let (mut h, sink) = harness();
        h.should_be("x", || Ok(Value::from(3)), 3);
        let r = last(&sink);
        assert!(r.success);
        assert_eq!(r.message, "x is 3");
    }

    #[test]
    fn test_should_be_same_type_mismatch() {
        let (mut h, sink) = harness();
        h.should_be("-0", || Ok(Value::Number(-0.0)), 0);
        let r = last(&sink);
        assert!(!r.success);
        assert_eq!(r.message, "-0 should be 0. Was -0.");
    }

    #[test]
    fn test_should_be_type_mismatch() {
        let (mut h, sink) = harness();
        h.should_be("x", || Ok(Value::from("1")), 1);
        assert_eq!(
            last(&sink).message,
            "x should be 1 (of type number). Was 1 (of type string)."
        );
    }

    #[test]
    fn test_should_be_signed_zero_pass() {
        let (mut h, sink) = harness();
        h.should_be("-0", || Ok(Value::Number(-0.0)), Value::Number(-0.0));
        let r = last(&sink);
        assert!(r.success);
        assert_eq!(r.message, "-0 is -0");
    }

    #[test]
    fn test_should_be_threw() {
        let (mut h, sink) = harness();
        h.should_be("f()", || Err(Thrown::error(ErrorKind::TypeError, "nope")), 1);
        assert_eq!(last(&sink).message, "f() should be 1. Threw exception TypeError: nope");
    }

    #[test]
    fn test_should_be_quietly_records_only_failures() {
        let (mut h, sink) = harness();
        h.should_be_quietly("x", || Ok(Value::from(1)), 1);
        assert!(sink.results().is_empty());
        h.should_be_quietly("x", || Ok(Value::from(2)), 1);
        assert_eq!(sink.results().len(), 1);
    }

    #[test]
    fn test_should_not_be() {
        let (mut h, sink) = harness();
        h.should_not_be("x", || Ok(Value::from(2)), 1);
        assert_eq!(last(&sink).message, "x is not 1");
        h.should_not_be("x", || Ok(Value::from(1)), 1);
        assert_eq!(last(&sink).message, "x should not be 1.");
        h.should_not_be("x", || Err(Thrown::new("boom")), 1);
        assert_eq!(last(&sink).message, "x should not be 1. Threw exception boom");
    }

    #[test]
    fn test_should_be_type_number_special_case() {
        let (mut h, sink) = harness();
        h.should_be_type("n", || Ok(Value::from(1.5)), "Number");
        assert!(last(&sink).success);
        h.should_be_type("boxed", || Ok(Value::new_number_object(2.0)), "Number");
        assert!(last(&sink).success);
        h.should_be_type("s", || Ok(Value::from("1")), "Number");
        assert_eq!(last(&sink).message, "s is not an instance of Number");
        h.should_be_type("b", || Ok(Value::new_instance(&["WebGLBuffer"])), "WebGLBuffer");
        assert_eq!(last(&sink).message, "b is an instance of WebGLBuffer");
        h.should_be_type("str", || Ok(Value::from("abc")), "String");
        assert!(!last(&sink).success);
    }

    #[test]
    fn test_should_throw_with_expected_value() {
        let (mut h, sink) = harness();
        let raise = || Err(Thrown::error(ErrorKind::SyntaxError, "bad"));
        h.should_throw("p()", raise, Some(Value::from("SyntaxError: bad")));
        assert_eq!(last(&sink).message, "p() threw exception SyntaxError: bad.");
        h.should_throw("p()", raise, Some(Value::from("TypeError: bad")));
        assert_eq!(
            last(&sink).message,
            "p() should throw TypeError: bad. Threw exception SyntaxError: bad."
        );
    }

    #[test]
    fn test_should_throw_without_raise() {
        let (mut h, sink) = harness();
        h.should_throw("f()", || Ok(Value::Undefined), None);
        assert_eq!(last(&sink).message, "f() should throw an exception. Was undefined.");
        h.should_throw("g()", || Ok(Value::from(4)), None);
        assert_eq!(last(&sink).message, "g() should throw an exception. Was 4.");
    }

    #[test]
    fn test_should_not_throw() {
        let (mut h, sink) = harness();
        h.should_not_throw("ok()", || Ok(Value::Undefined), None);
        assert_eq!(last(&sink).message, "`ok()` should not throw.");
        h.should_not_throw("bad()", || Err(Thrown::new("x")), Some("calling bad"));
        assert_eq!(
            last(&sink).message,
            "calling bad should not throw, but threw exception x."
        );
    }

    #[test]
    fn test_bounds() {
        let (mut h, sink) = harness();
        h.should_be_less_than_or_equal("a", || Ok(Value::from(1)), 2);
        assert_eq!(last(&sink).message, "a is <= 2");
        h.should_be_less_than_or_equal("a", || Ok(Value::from(3)), 2);
        assert_eq!(last(&sink).message, "a should be <= 2. Was 3 (of type number).");
        h.should_be_greater_than_or_equal("b", || Ok(Value::Undefined), 0);
        assert_eq!(last(&sink).message, "b should be >= 0. Was undefined (of type undefined).");
        h.should_be_greater_than_or_equal("b", || Ok(Value::from(0)), 0);
        assert!(last(&sink).success);
    }

    #[test]
    fn test_non_zero_non_null_defined() {
        let (mut h, sink) = harness();
        h.should_be_non_zero("z", || Ok(Value::from("0")));
        assert_eq!(last(&sink).message, "z should be non-zero. Was 0");
        h.should_be_non_null("n", || Ok(Value::Undefined));
        assert_eq!(last(&sink).message, "n should be non-null. Was undefined");
        h.should_be_defined("d", || Ok(Value::Null));
        assert_eq!(last(&sink).message, "d is defined.");
        h.should_be_undefined("u", || Ok(Value::Undefined));
        assert_eq!(last(&sink).message, "u is undefined.");
    }

    #[test]
    fn test_should_be_string_is_loose() {
        let (mut h, sink) = harness();
        h.should_be_string("v", || Ok(Value::from(5)), "5");
        assert_eq!(last(&sink).message, "v should be 5.");
        h.should_be_string("v", || Ok(Value::from(6)), "5");
        assert_eq!(last(&sink).message, "v should be 5. (was 6)");
    }

    #[test]
    fn test_should_evaluate_to_boolean_records_two_outcomes() {
        let (mut h, sink) = harness();
        h.should_evaluate_to("flag", || Ok(Value::from(true)), true);
        let results = sink.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].message, "typeof flag is \"boolean\"");
        assert_eq!(results[1].message, "flag is true");
    }

    #[test]
    fn test_should_evaluate_to_object_and_function() {
        let (mut h, sink) = harness();
        let expected = Value::new_array(vec![Value::from(1), Value::from(2)]);
        h.should_evaluate_to("arr", || Ok(Value::from("1,2")), expected);
        assert_eq!(last(&sink).message, "arr == '1,2' is true");

        let f = Value::new_function("f", "function f() {\n}");
        let g = f.clone();
        h.should_evaluate_to("fn", move || Ok(g), f);
        assert_eq!(last(&sink).message, "'function f() {}' is \"function f() {}\"");

        h.should_evaluate_to("fn", || Err(Thrown::new("x")), Value::new_function("f", "f"));
        assert_eq!(last(&sink).message, "Evaluating fn: Threw exception x");
    }

    #[test]
    fn test_should_evaluate_to_nullish_checks_null() {
        let (mut h, sink) = harness();
        h.should_evaluate_to("n", || Ok(Value::Null), Value::Undefined);
        assert_eq!(last(&sink).message, "n is null");
    }

    #[test]
    fn test_expect_array() {
        let (mut h, sink) = harness();
        h.expect_array(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], 0.0).unwrap();
        assert_eq!(last(&sink).message, "Expected [1,2,3]");
        h.expect_array(&[1.0, 2.0, 4.0], &[1.0, 2.0, 3.0], 0.0).unwrap();
        let r = last(&sink);
        assert!(!r.success);
        assert_eq!(r.message, "Expected [1,2,3], was [1,2,4]");
        h.expect_array(&[1.0, 2.0, 4.0], &[1.0, 2.0, 3.0], 1.0).unwrap();
        let r = last(&sink);
        assert!(r.success);
        assert_eq!(r.message, "Expected [1,2,3] +/- 1");
    }

    #[test]
    fn test_loose_equality_reads_radix_strings() {
        let (mut h, sink) = harness();
        h.should_be_string("n", || Ok(Value::from(16)), "0x10");
        assert!(last(&sink).success);
        h.should_be_non_zero("s", || Ok(Value::from("0x0")));
        let r = last(&sink);
        assert!(!r.success);
        assert_eq!(r.message, "s should be non-zero. Was 0x0");
        h.should_be_string("inf", || Ok(Value::from(f64::INFINITY)), "-inf");
        assert!(!last(&sink).success);
    }

    #[test]
    fn test_expect_array_nan_difference_passes() {
        let (mut h, sink) = harness();
        h.expect_array(&[f64::NAN, 2.0], &[1.0, 2.0], 0.0).unwrap();
        let r = last(&sink);
        assert!(r.success);
        assert_eq!(r.message, "Expected [1,2]");
        h.expect_array(&[1.0, 5.0], &[1.0, 2.0], f64::NAN).unwrap();
        let r = last(&sink);
        assert!(r.success);
        assert_eq!(r.message, "Expected [1,2] +/- NaN");
    }

    #[test]
    fn test_expect_array_length_mismatch_records_nothing() {
        let (mut h, sink) = harness();
        let err = h.expect_array(&[1.0], &[1.0, 2.0], 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(sink.results().is_empty());
    }

    #[test]
    fn test_eval_and_log() {
        let (mut h, sink) = harness();
        assert_eq!(h.eval_and_log("one", || Ok(Value::from(1))), Value::from(1));
        assert!(sink.results().is_empty());
        assert!(h.eval_and_log("bad", || Err(Thrown::new("e"))).is_undefined());
        assert_eq!(last(&sink).message, "bad threw exception e");
    }

    #[test]
    fn test_assert_msg_options() {
        let (mut h, sink) = harness();
        h.assert_msg_options(true, "fine", false, true).unwrap();
        assert!(h.assert_msg_options(false, "broken", true, false).is_ok());
        assert!(h.assert_msg_options(false, "fatal", true, true).is_err());
        assert_eq!(sink.results().len(), 3);
        h.assert_msg(true, "plain");
        assert!(last(&sink).success);
    }
}
