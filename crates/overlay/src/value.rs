//! Reporting-call argument values.
//!
//! Arguments are kept as values so the native fallback receives exactly what
//! the caller passed. The panel only ever sees their text coercion.

use std::fmt;

/// An argument passed to a reporting call.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// A plain object. Only its presence matters for text coercion.
    Object,
    Error { name: String, message: String },
}

impl Value {
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Value::Error {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Join arguments the way a reporting call displays them: each coerced to
/// text, separated by a single space.
pub fn join_args(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number-to-string conversion of the scripting language: shortest
/// round-trip digits, plain notation for exponents in `-6..21`, otherwise
/// `d.ddde±x`.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n == 0.0 {
        return f.write_str("0");
    }
    if n < 0.0 {
        f.write_str("-")?;
    }
    let n = n.abs();
    if n.is_infinite() {
        return f.write_str("Infinity");
    }

    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= point && point <= 21 {
        write!(f, "{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        write!(f, "{int}.{frac}")
    } else if -6 < point && point <= 0 {
        write!(f, "0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let sign = if point > 0 { '+' } else { '-' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            write!(f, "{lead}e{sign}{}", (point - 1).abs())
        } else {
            write!(f, "{lead}.{rest}e{sign}{}", (point - 1).abs())
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    // Nested null and undefined print as empty.
                    match item {
                        Value::Undefined | Value::Null => {}
                        other => write!(f, "{other}")?,
                    }
                }
                Ok(())
            }
            Value::Object => f.write_str("[object Object]"),
            Value::Error { name, message } => {
                if message.is_empty() {
                    f.write_str(name)
                } else if name.is_empty() {
                    f.write_str(message)
                } else {
                    write!(f, "{name}: {message}")
                }
            }
        }
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coercion() {
        assert_eq!(Value::from(130).to_string(), "130");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_number_coercion_switches_notation_like_script_strings() {
        let cases = [
            (1e21, "1e+21"),
            (1e-7, "1e-7"),
            (123456789012345680000.0, "123456789012345680000"),
            (0.000001, "0.000001"),
            (1.5e-10, "1.5e-10"),
            (-2.5e25, "-2.5e+25"),
            (0.1 + 0.2, "0.30000000000000004"),
            (123.456, "123.456"),
        ];
        for (n, expected) in cases {
            assert_eq!(Value::from(n).to_string(), expected, "{n:e}");
        }
    }

    #[test]
    fn test_compound_coercion() {
        let array = Value::Array(vec![1.into(), Value::Null, "x".into()]);
        assert_eq!(array.to_string(), "1,,x");
        assert_eq!(Value::Object.to_string(), "[object Object]");
        assert_eq!(Value::error("TypeError", "nope").to_string(), "TypeError: nope");
        assert_eq!(Value::error("Error", "").to_string(), "Error");
    }

    #[test]
    fn test_join_args() {
        let args = vec![Value::from("a"), Value::from(1), Value::Undefined, Value::from(true)];
        assert_eq!(join_args(&args), "a 1 undefined true");
        assert_eq!(join_args(&[]), "");
    }
}
