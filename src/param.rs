//! Typed parameter descriptions for config file sections.

use toml::Value;

use crate::convert::{ParamType, ValueConverter};
use crate::error::{ConfigFileError, ConversionError};

/// One typed value inside a config section.
///
/// ```ignore
/// let numbers = Param::integer().multiple();
/// let flag = Param::boolean().default(true);
/// ```
///
/// ```ini
/// [foo]
/// numbers = 1 4 9 16 25
/// flag = yes
/// ```
#[derive(Debug, Clone, Default)]
pub struct Param {
    name: Option<String>,
    ty: ParamType,
    multiple: bool,
    default: Option<Value>,
    help: Option<String>,
}

impl Param {
    /// A string param with no name, default, or multiplicity.
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    pub fn of(ty: ParamType) -> Self {
        Self { ty, ..Self::new() }
    }

    pub fn string() -> Self {
        Self::of(ParamType::String)
    }

    pub fn integer() -> Self {
        Self::of(ParamType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(ParamType::Boolean)
    }

    pub fn float() -> Self {
        Self::of(ParamType::Float)
    }

    pub fn path() -> Self {
        Self::of(ParamType::Path)
    }

    /// Give the param an explicit name. Binding into a schema never
    /// overwrites it.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Accept a whitespace-separated sequence of values.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Value used when the key is absent from the section.
    pub fn default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn param_type(&self) -> &ParamType {
        &self.ty
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Bind the param to the key it is declared under. Only fills in a
    /// missing name, so binding twice is a no-op.
    pub fn bind_name(&mut self, name: &str) {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
    }

    /// Check that the default fits the multiplicity.
    pub(crate) fn check_default(&self, key: &str) -> Result<(), ConfigFileError> {
        match &self.default {
            Some(v) if self.multiple && !v.is_array() => Err(ConfigFileError::BadDefault {
                param: key.to_string(),
                reason: format!("multiple param needs an array default, got {}", v.type_str()),
            }),
            _ => Ok(()),
        }
    }

    /// Convert raw section text into a typed value.
    ///
    /// Multiple params split on whitespace and convert every token; one bad
    /// token fails the whole value.
    pub fn parse(&self, text: &str) -> Result<Value, ConversionError> {
        if self.multiple {
            let values = text
                .split_whitespace()
                .map(|token| self.ty.convert(token))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(values))
        } else {
            self.ty.convert(text.trim())
        }
    }
}
