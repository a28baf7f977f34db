//! Assertion vocabulary as seen from a result sink

mod common;

use common::{harness, messages};
use conformance_harness::value::TypedArrayKind;
use conformance_harness::{Error, ErrorKind, Thrown, Value};
use pretty_assertions::assert_eq;

fn type_error(message: &str) -> Thrown {
    Thrown::error(ErrorKind::TypeError, message)
}

mod should_be {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pass_and_failure_messages() {
        let mut h = harness("/t.html");
        h.reporter.should_be("gl.getError()", || Ok(0.into()), 0);
        h.reporter.should_be("count", || Ok(2.into()), 3);
        h.reporter.should_be("count", || Ok("3".into()), 3);
        h.reporter.should_be("name", || Ok("webgl".into()), "webgl");
        assert_eq!(
            messages(&h.sink),
            vec![
                "gl.getError() is 0",
                "count should be 3. Was 2.",
                "count should be 3 (of type number). Was 3 (of type string).",
                "name is \"webgl\"",
            ]
        );
    }

    #[test]
    fn test_negative_zero_is_visible_in_failure() {
        let mut h = harness("/t.html");
        h.reporter.should_be("x", || Ok(Value::Number(-0.0)), 0);
        assert_eq!(messages(&h.sink), vec!["x should be 0. Was -0."]);
    }

    #[test]
    fn test_thrown_value_becomes_failure() {
        let mut h = harness("/t.html");
        h.reporter.should_be("f()", || Err(type_error("bad")), 1);
        assert_eq!(
            messages(&h.sink),
            vec!["f() should be 1. Threw exception TypeError: bad"]
        );
    }

    #[test]
    fn test_quiet_records_only_failures() {
        let mut h = harness("/t.html");
        h.reporter.should_be_quietly("a", || Ok(1.into()), 1);
        h.reporter.should_be_quietly("b", || Ok(1.into()), 2);
        assert_eq!(messages(&h.sink), vec!["b should be 2. Was 1."]);
    }

    #[test]
    fn test_typed_array_against_array_literal() {
        let mut h = harness("/t.html");
        let pixels = Value::new_typed_array(TypedArrayKind::Uint8, vec![255.0, 0.0, 0.0, 255.0]);
        let expected: Vec<Value> = [255, 0, 0, 255].iter().map(|&n| Value::from(n)).collect();
        h.reporter.should_be("pixel", || Ok(pixels), expected);
        assert_eq!(h.reporter.totals().passed, 1);
    }
}

mod helpers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shorthand_helpers() {
        let mut h = harness("/t.html");
        h.reporter.should_be_true("ok", || Ok(true.into()));
        h.reporter.should_be_false("ok", || Ok(true.into()));
        h.reporter.should_be_nan("0/0", || Ok(f64::NAN.into()));
        h.reporter.should_be_null("v", || Ok(Value::Null));
        h.reporter.should_be_undefined("u", || Ok(Value::Undefined));
        h.reporter.should_be_defined("d", || Ok(Value::Undefined));
        h.reporter.should_be_non_zero("n", || Ok(4.into()));
        h.reporter.should_be_non_null("o", || Ok(Value::Null));
        assert_eq!(
            messages(&h.sink),
            vec![
                "ok is true",
                "ok should be false. Was true.",
                "0/0 is NaN",
                "v is null",
                "u is undefined.",
                "d should be defined. Was undefined",
                "n is non-zero.",
                "o should be non-null. Was null",
            ]
        );
    }

    #[test]
    fn test_should_be_type() {
        let mut h = harness("/t.html");
        let buffer = Value::new_instance(&["WebGLBuffer", "WebGLObject"]);
        h.reporter.should_be_type("buffer", || Ok(buffer.clone()), "WebGLObject");
        h.reporter.should_be_type("n", || Ok(3.into()), "Number");
        h.reporter.should_be_type("buffer", || Ok(buffer), "WebGLTexture");
        assert_eq!(
            messages(&h.sink),
            vec![
                "buffer is an instance of WebGLObject",
                "n is an instance of Number",
                "buffer is not an instance of WebGLTexture",
            ]
        );
    }

    #[test]
    fn test_bounds() {
        let mut h = harness("/t.html");
        h.reporter.should_be_less_than_or_equal("size", || Ok(4.into()), 4);
        h.reporter.should_be_less_than_or_equal("size", || Ok(5.into()), 4);
        h.reporter.should_be_greater_than_or_equal("size", || Ok(Value::Undefined), 1);
        assert_eq!(
            messages(&h.sink),
            vec![
                "size is <= 4",
                "size should be <= 4. Was 5 (of type number).",
                "size should be >= 1. Was undefined (of type undefined).",
            ]
        );
    }
}

mod exceptions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_should_throw() {
        let mut h = harness("/t.html");
        h.reporter.should_throw("f()", || Err(type_error("bad")), None);
        h.reporter.should_throw("g()", || Ok(1.into()), None);
        h.reporter.should_throw(
            "h()",
            || Err(type_error("bad")),
            Some(Value::from("RangeError: bad")),
        );
        assert_eq!(
            messages(&h.sink),
            vec![
                "f() threw exception TypeError: bad.",
                "g() should throw an exception. Was 1.",
                "h() should throw RangeError: bad. Threw exception TypeError: bad.",
            ]
        );
    }

    #[test]
    fn test_should_not_throw() {
        let mut h = harness("/t.html");
        h.reporter.should_not_throw("f()", || Ok(Value::Undefined), None);
        h.reporter
            .should_not_throw("g()", || Err(type_error("bad")), Some("calling g"));
        assert_eq!(
            messages(&h.sink),
            vec![
                "`f()` should not throw.",
                "calling g should not throw, but threw exception TypeError: bad.",
            ]
        );
    }
}

mod sequences {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expect_array_within_tolerance() {
        let mut h = harness("/t.html");
        h.reporter.expect_array(&[0.5, 1.0], &[0.5, 1.01], 0.1).unwrap();
        h.reporter.expect_array(&[0.5, 2.0], &[0.5, 1.0], 0.0).unwrap();
        assert_eq!(
            messages(&h.sink),
            vec!["Expected [0.5,1.01] +/- 0.1", "Expected [0.5,1], was [0.5,2]"]
        );
    }

    #[test]
    fn test_expect_array_length_mismatch_records_nothing() {
        let mut h = harness("/t.html");
        let err = h.reporter.expect_array(&[1.0], &[1.0, 2.0], 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(h.sink.results().is_empty());
    }
}

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raising_failure_aborts_test() {
        let mut h = harness("/t.html");
        h.reporter.set_current_test_name("drawArrays");
        let err = h
            .reporter
            .assert_msg_options(false, "draws", true, true)
            .unwrap_err();
        assert!(matches!(err, Error::TestFailed(_)));
        assert_eq!(h.reporter.current_test_name(), None);
        assert_eq!(messages(&h.sink), vec!["drawArrays: draws"]);
    }

    #[test]
    fn test_eval_and_log() {
        let mut h = harness("/t.html");
        let v = h.reporter.eval_and_log("gl.createBuffer()", || Ok(7.into()));
        assert_eq!(v, Value::Number(7.0));
        let v = h.reporter.eval_and_log("broken()", || Err(type_error("bad")));
        assert!(v.is_undefined());
        assert_eq!(
            messages(&h.sink),
            vec!["broken() threw exception TypeError: bad"]
        );
    }
}
