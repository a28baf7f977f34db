//! Script value types
//!
//! Assertions receive already-evaluated operands, so the harness carries a
//! small dynamic value model mirroring what a test script can observe:
//! primitives, arrays, typed arrays, functions, errors and opaque instances
//! of host classes (buffers, textures, contexts).

use crate::error::ErrorKind;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Result of evaluating an operand: its value, or the value it raised.
pub type Evaluation = std::result::Result<Value, Thrown>;

/// A script value
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Object (arrays, functions, errors, host instances)
    Object(Rc<Object>),
}

impl Value {
    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is nullish (null or undefined)
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is a number that is NaN
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    /// Check if value is the number `-0`
    pub fn is_minus_zero(&self) -> bool {
        matches!(self, Value::Number(n) if *n == 0.0 && n.is_sign_negative())
    }

    /// Borrow the object behind this value, if any
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Whether this is a plain `Array` (not a typed array or other array-like)
    pub fn is_array(&self) -> bool {
        matches!(self.as_object().map(|o| &o.kind), Some(ObjectKind::Array(_)))
    }

    /// Whether this is callable
    pub fn is_function(&self) -> bool {
        matches!(self.as_object().map(|o| &o.kind), Some(ObjectKind::Function { .. }))
    }

    /// Convert to boolean (truthiness)
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Convert to number
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Object(obj) => match &obj.kind {
                ObjectKind::NumberWrapper(n) => *n,
                _ => string_to_number(&self.to_js_string()),
            },
        }
    }

    /// Reduce an object to the primitive used by loose comparisons
    pub fn to_primitive(&self) -> Value {
        match self {
            Value::Object(obj) => match &obj.kind {
                ObjectKind::NumberWrapper(n) => Value::Number(*n),
                _ => Value::String(self.to_js_string()),
            },
            other => other.clone(),
        }
    }

    /// Convert to the script's default string representation
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(true) => "true".to_string(),
            Value::Boolean(false) => "false".to_string(),
            Value::Number(n) => number_to_js_string(*n),
            Value::String(s) => s.clone(),
            Value::Object(obj) => obj.to_js_string(),
        }
    }

    /// Render an expected operand the way it would be written in a test
    pub fn to_literal(&self) -> String {
        match self {
            Value::String(s) => format!("\"{}\"", s),
            other => crate::compare::stringify(other),
        }
    }

    /// Get the typeof string
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object", // Historical quirk
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(obj) => match obj.kind {
                ObjectKind::Function { .. } => "function",
                _ => "object",
            },
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            // IEEE comparison: NaN is unequal to itself, +0 equals -0
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Abstract equality (==)
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),

            // null == undefined, and nothing else is loosely equal to either
            (Value::Null, Value::Undefined) | (Value::Undefined, Value::Null) => true,
            (Value::Null | Value::Undefined, _) | (_, Value::Null | Value::Undefined) => false,

            (Value::Number(_), Value::String(_)) => {
                self.strict_equals(&Value::Number(other.to_number()))
            }
            (Value::String(_), Value::Number(_)) => {
                Value::Number(self.to_number()).strict_equals(other)
            }

            (Value::Boolean(b), _) => Value::Number(if *b { 1.0 } else { 0.0 }).equals(other),
            (_, Value::Boolean(b)) => self.equals(&Value::Number(if *b { 1.0 } else { 0.0 })),

            (Value::Object(_), _) => self.to_primitive().equals(other),
            (_, Value::Object(_)) => self.equals(&other.to_primitive()),
        }
    }

    /// Relational comparison (`<`, `>`).
    ///
    /// Returns `None` where the script comparison is undefined (a NaN operand),
    /// which makes both `a < b` and `a > b` false.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        let a = self.to_primitive();
        let b = other.to_primitive();
        if let (Value::String(a), Value::String(b)) = (&a, &b) {
            return Some(a.cmp(b));
        }
        a.to_number().partial_cmp(&b.to_number())
    }

    /// `instanceof` against a constructor name
    pub fn instance_of(&self, type_name: &str) -> bool {
        match self {
            Value::Object(obj) => obj.instance_of(type_name),
            _ => false,
        }
    }

    /// Array-like view used by sequence comparisons.
    ///
    /// Anything with a length and integer indexing qualifies: arrays, typed
    /// arrays, and strings (one single-character string per element).
    pub fn as_sequence(&self) -> Option<Vec<Value>> {
        match self {
            Value::String(s) => Some(s.chars().map(|c| Value::String(c.to_string())).collect()),
            Value::Object(obj) => match &obj.kind {
                ObjectKind::Array(elements) => Some(elements.clone()),
                ObjectKind::TypedArray { elements, .. } => {
                    Some(elements.iter().map(|n| Value::Number(*n)).collect())
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Create a new array value
    pub fn new_array(elements: Vec<Value>) -> Value {
        Value::Object(Rc::new(Object::new(ObjectKind::Array(elements), vec!["Array".to_string()])))
    }

    /// Create a new typed array holding the given elements
    pub fn new_typed_array(kind: TypedArrayKind, elements: Vec<f64>) -> Value {
        let elements = elements.into_iter().map(|n| kind.coerce(n)).collect();
        Value::Object(Rc::new(Object::new(
            ObjectKind::TypedArray { kind, elements },
            vec![kind.name().to_string()],
        )))
    }

    /// Create a new error value
    pub fn new_error(kind: ErrorKind, message: &str) -> Value {
        Self::new_named_error(kind.name(), message)
    }

    /// Create a new error value with an arbitrary constructor name
    pub fn new_named_error(name: &str, message: &str) -> Value {
        let mut constructors = vec![name.to_string()];
        if name != "Error" {
            constructors.push("Error".to_string());
        }
        Value::Object(Rc::new(Object::new(
            ObjectKind::Error {
                name: name.to_string(),
                message: message.to_string(),
            },
            constructors,
        )))
    }

    /// Create a new function value with its source text
    pub fn new_function(name: &str, source: &str) -> Value {
        Value::Object(Rc::new(Object::new(
            ObjectKind::Function {
                name: name.to_string(),
                source: source.to_string(),
            },
            vec!["Function".to_string()],
        )))
    }

    /// Create an instance of a host class.
    ///
    /// `constructors` lists the prototype chain from the most derived class
    /// outward; `Object` is implied.
    pub fn new_instance(constructors: &[&str]) -> Value {
        Value::Object(Rc::new(Object::new(
            ObjectKind::Ordinary,
            constructors.iter().map(|c| c.to_string()).collect(),
        )))
    }

    /// Create a boxed `Number` object
    pub fn new_number_object(n: f64) -> Value {
        Value::Object(Rc::new(Object::new(
            ObjectKind::NumberWrapper(n),
            vec!["Number".to_string()],
        )))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(_) => write!(f, "{}", crate::compare::stringify(self)),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Object(obj) => match &obj.kind {
                ObjectKind::Array(elements) => f.debug_list().entries(elements).finish(),
                ObjectKind::TypedArray { kind, elements } => {
                    write!(f, "{} ", kind.name())?;
                    f.debug_list().entries(elements).finish()
                }
                ObjectKind::Function { name, .. } => write!(f, "[Function: {}]", name),
                ObjectKind::Error { name, message } => write!(f, "{}: {}", name, message),
                ObjectKind::NumberWrapper(n) => write!(f, "[Number: {}]", number_to_js_string(*n)),
                ObjectKind::Ordinary => write!(f, "{}", obj.to_js_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::new_array(elements)
    }
}

/// A heap object
#[derive(Clone, Debug)]
pub struct Object {
    /// Object kind
    pub kind: ObjectKind,
    /// Constructor names on the prototype chain, most derived first
    pub constructors: Vec<String>,
}

impl Object {
    /// Create a new object
    pub fn new(kind: ObjectKind, constructors: Vec<String>) -> Self {
        Self { kind, constructors }
    }

    /// `instanceof` against a constructor name; everything is an `Object`
    pub fn instance_of(&self, type_name: &str) -> bool {
        type_name == "Object" || self.constructors.iter().any(|c| c == type_name)
    }

    /// Name of the most derived constructor
    pub fn class_name(&self) -> &str {
        self.constructors.first().map(String::as_str).unwrap_or("Object")
    }

    fn to_js_string(&self) -> String {
        match &self.kind {
            ObjectKind::Array(elements) => join_elements(elements.iter().map(|v| {
                if v.is_nullish() {
                    String::new()
                } else {
                    v.to_js_string()
                }
            })),
            ObjectKind::TypedArray { elements, .. } => {
                join_elements(elements.iter().map(|n| number_to_js_string(*n)))
            }
            ObjectKind::Function { source, .. } => source.clone(),
            ObjectKind::Error { name, message } => {
                if message.is_empty() {
                    name.clone()
                } else {
                    format!("{}: {}", name, message)
                }
            }
            ObjectKind::NumberWrapper(n) => number_to_js_string(*n),
            ObjectKind::Ordinary => format!("[object {}]", self.class_name()),
        }
    }
}

fn join_elements(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(",")
}

/// Object kinds
#[derive(Clone, Debug)]
pub enum ObjectKind {
    /// Plain object or host class instance
    Ordinary,
    /// Array
    Array(Vec<Value>),
    /// Typed array view; elements are stored already coerced to the element type
    TypedArray {
        kind: TypedArrayKind,
        elements: Vec<f64>,
    },
    /// Function, with the source text its string conversion yields
    Function { name: String, source: String },
    /// Error instance
    Error { name: String, message: String },
    /// Boxed number (`new Number(n)`)
    NumberWrapper(f64),
}

/// Typed array element types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypedArrayKind {
    /// Get the constructor name
    pub fn name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }

    /// Look up a kind by constructor name
    pub fn from_name(name: &str) -> Option<Self> {
        [
            TypedArrayKind::Int8,
            TypedArrayKind::Uint8,
            TypedArrayKind::Uint8Clamped,
            TypedArrayKind::Int16,
            TypedArrayKind::Uint16,
            TypedArrayKind::Int32,
            TypedArrayKind::Uint32,
            TypedArrayKind::Float32,
            TypedArrayKind::Float64,
        ]
        .into_iter()
        .find(|k| k.name() == name)
    }

    /// Coerce a number the way a store into this element type would
    pub fn coerce(&self, n: f64) -> f64 {
        fn wrap(n: f64, modulus: f64) -> f64 {
            if !n.is_finite() {
                return 0.0;
            }
            n.trunc().rem_euclid(modulus)
        }
        match self {
            TypedArrayKind::Int8 => wrap(n, 256.0) as u8 as i8 as f64,
            TypedArrayKind::Uint8 => wrap(n, 256.0),
            TypedArrayKind::Uint8Clamped => {
                if n.is_nan() {
                    0.0
                } else {
                    n.clamp(0.0, 255.0).round_ties_even()
                }
            }
            TypedArrayKind::Int16 => wrap(n, 65536.0) as u16 as i16 as f64,
            TypedArrayKind::Uint16 => wrap(n, 65536.0),
            TypedArrayKind::Int32 => wrap(n, 4294967296.0) as u32 as i32 as f64,
            TypedArrayKind::Uint32 => wrap(n, 4294967296.0),
            TypedArrayKind::Float32 => n as f32 as f64,
            TypedArrayKind::Float64 => n,
        }
    }
}

/// A value raised while evaluating an operand
#[derive(Clone, Debug, PartialEq)]
pub struct Thrown(pub Value);

impl Thrown {
    /// Wrap an arbitrary raised value
    pub fn new(value: impl Into<Value>) -> Self {
        Thrown(value.into())
    }

    /// Raise an error object of the given kind
    pub fn error(kind: ErrorKind, message: &str) -> Self {
        Thrown(Value::new_error(kind, message))
    }

    /// The raised value
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_js_string())
    }
}

/// Format a number the way the script's `String(n)` does
pub fn number_to_js_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form: 1e+21, 1.5e-7
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        }
    } else {
        format!("{}", n)
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(n) = radix_literal_to_number(s) {
        return n;
    }
    let unsigned = s.strip_prefix(|c| c == '+' || c == '-').unwrap_or(s);
    if unsigned == "Infinity" {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    // Rust also accepts inf/infinity/nan in any case and with a sign
    if !matches!(unsigned.bytes().next(), Some(b) if b.is_ascii_digit() || b == b'.') {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// `0x`, `0o` and `0b` literals. These take no sign.
fn radix_literal_to_number(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    )
}
