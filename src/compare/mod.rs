//! Value comparison for assertions
//!
//! The equality used by `should_be` is deliberately narrower than deep
//! structural equality: numbers distinguish `0` from `-0` and treat NaN as
//! equal to NaN, plain arrays compare one level deep with `===` on their
//! elements, and any other object only matches itself.

use crate::error::{messages, Error, Result};
use crate::value::Value;

/// Decide whether `actual` satisfies `expected`.
pub fn is_result_correct(actual: &Value, expected: &Value) -> bool {
    if let Value::Number(e) = expected {
        if *e == 0.0 {
            // 1/x is the only observable difference between the two zeros
            return matches!(actual, Value::Number(a)
                if *a == 0.0 && a.is_sign_negative() == e.is_sign_negative());
        }
    }
    if actual.strict_equals(expected) {
        return true;
    }
    if expected.is_nan() {
        return actual.is_nan();
    }
    if expected.is_array() {
        return are_arrays_equal(actual, expected);
    }
    false
}

/// Shallow, element-wise `===` comparison of two array-likes.
///
/// `actual` may be anything indexable; a value with no sequence view
/// compares unequal rather than erroring.
pub fn are_arrays_equal(actual: &Value, expected: &Value) -> bool {
    let (Some(a), Some(b)) = (actual.as_sequence(), expected.as_sequence()) else {
        return false;
    };
    a.len() == b.len() && a.iter().zip(&b).all(|(x, y)| x.strict_equals(y))
}

/// `true` only for the number `-0`.
pub fn is_minus_zero(value: &Value) -> bool {
    value.is_minus_zero()
}

/// Render a value for a failure message, keeping the sign of zero visible.
pub fn stringify(value: &Value) -> String {
    if value.is_minus_zero() {
        "-0".to_string()
    } else {
        value.to_js_string()
    }
}

/// Largest absolute element-wise difference between two equal-length sequences.
///
/// A NaN difference poisons the result.
pub fn max_array_diff(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::invalid_input(messages::length_mismatch(a.len(), b.len())));
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0_f64, |acc, d| {
        if acc.is_nan() || d.is_nan() {
            f64::NAN
        } else {
            acc.max(d)
        }
    }))
}
