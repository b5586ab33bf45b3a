//! Scalar value converters.
//!
//! A converter turns one raw text token from a config file into a typed
//! [`toml::Value`]. Converters are stateless; [`ParamType`] bundles the
//! built-in ones and wraps user-supplied ones behind [`ValueConverter`].

use std::fmt;
use std::sync::Arc;

use toml::Value;

use crate::error::ConversionError;

/// Converts raw config text into a typed value.
pub trait ValueConverter: Send + Sync {
    /// Human-readable type name used in error messages.
    fn name(&self) -> &str;

    fn convert(&self, raw: &str) -> Result<Value, ConversionError>;
}

/// The type of a config parameter.
#[derive(Clone, Default)]
pub enum ParamType {
    /// Text, taken as-is.
    #[default]
    String,
    /// `true/t/yes/y/on/1` or `false/f/no/n/off/0`, case-insensitive.
    Boolean,
    /// Decimal 64-bit integer.
    Integer,
    Float,
    /// A filesystem path. Kept as text; existence is not checked.
    Path,
    /// One of a fixed set of strings (case-sensitive).
    Choice(Vec<String>),
    Custom(Arc<dyn ValueConverter>),
}

impl ParamType {
    pub fn custom<C: ValueConverter + 'static>(converter: C) -> Self {
        ParamType::Custom(Arc::new(converter))
    }
}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Choice(choices) => f.debug_tuple("Choice").field(choices).finish(),
            ParamType::Custom(c) => write!(f, "Custom({})", c.name()),
            other => f.write_str(other.name()),
        }
    }
}

impl ValueConverter for ParamType {
    fn name(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Path => "path",
            ParamType::Choice(_) => "choice",
            ParamType::Custom(c) => c.name(),
        }
    }

    fn convert(&self, raw: &str) -> Result<Value, ConversionError> {
        match self {
            ParamType::String | ParamType::Path => Ok(Value::String(raw.to_string())),
            ParamType::Boolean => parse_bool(raw)
                .map(Value::Boolean)
                .ok_or_else(|| ConversionError::new(raw, "boolean")),
            ParamType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| ConversionError::new(raw, "integer")),
            ParamType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ConversionError::new(raw, "float")),
            ParamType::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(ConversionError::new(
                        raw,
                        format!("choice (one of: {})", choices.join(", ")),
                    ))
                }
            }
            ParamType::Custom(c) => c.convert(raw),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_is_identity() {
        let v = ParamType::String.convert("Alice and Bob").unwrap();
        assert_eq!(v.as_str().unwrap(), "Alice and Bob");
    }

    #[test]
    fn default_type_is_string() {
        assert_eq!(ParamType::default().name(), "string");
    }

    #[test]
    fn boolean_accepts_yes_no_case_insensitive() {
        for token in ["yes", "YES", "True", "on", "1", "y"] {
            assert_eq!(ParamType::Boolean.convert(token).unwrap(), Value::Boolean(true));
        }
        for token in ["no", "False", "OFF", "0", "n"] {
            assert_eq!(ParamType::Boolean.convert(token).unwrap(), Value::Boolean(false));
        }
    }

    #[test]
    fn boolean_rejects_other_tokens() {
        let err = ParamType::Boolean.convert("maybe").unwrap_err();
        assert_eq!(err.value, "maybe");
        assert_eq!(err.expected, "boolean");
    }

    #[test]
    fn integer_parses_decimal() {
        assert_eq!(ParamType::Integer.convert("42").unwrap(), Value::Integer(42));
        assert_eq!(ParamType::Integer.convert("-7").unwrap(), Value::Integer(-7));
    }

    #[test]
    fn integer_rejects_non_numeric() {
        assert!(ParamType::Integer.convert("abc").is_err());
        assert!(ParamType::Integer.convert("1.5").is_err());
    }

    #[test]
    fn float_parses() {
        assert_eq!(ParamType::Float.convert("1.618").unwrap(), Value::Float(1.618));
    }

    #[test]
    fn path_passes_through() {
        let v = ParamType::Path.convert("foo/xxx.txt").unwrap();
        assert_eq!(v.as_str().unwrap(), "foo/xxx.txt");
    }

    #[test]
    fn choice_is_case_sensitive() {
        let ty = ParamType::Choice(vec!["fast".into(), "slow".into()]);
        assert!(ty.convert("fast").is_ok());
        let err = ty.convert("FAST").unwrap_err();
        assert!(err.to_string().contains("fast, slow"));
    }

    struct Upper;

    impl ValueConverter for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn convert(&self, raw: &str) -> Result<Value, ConversionError> {
            Ok(Value::String(raw.to_uppercase()))
        }
    }

    #[test]
    fn custom_converter_is_pluggable() {
        let ty = ParamType::custom(Upper);
        assert_eq!(ty.name(), "upper");
        assert_eq!(ty.convert("red").unwrap().as_str().unwrap(), "RED");
        assert_eq!(format!("{ty:?}"), "Custom(upper)");
    }
}
