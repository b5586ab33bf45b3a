use std::path::PathBuf;
use thiserror::Error;

#[cfg(feature = "rich-errors")]
use miette::Diagnostic;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(Diagnostic))]
pub enum ConfigFileError {
    #[error("Invalid value for '{param}' in section [{section}]: {reason}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(clapini::bad_parameter), help("raw value was: {value}"))
    )]
    BadParameter {
        section: String,
        param: String,
        value: String,
        reason: String,
    },

    #[error("No schema found for: section={section}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(clapini::unmapped_section),
            help("add a schema matching this section or drop it from config_sections()")
        )
    )]
    UnmappedSection { section: String },

    #[error("Bad section pattern {pattern:?}: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::bad_pattern)))]
    BadPattern { pattern: String, reason: String },

    #[error("Bad default for '{param}': {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::bad_default)))]
    BadDefault { param: String, reason: String },

    #[error("No storage name for section [{section}]")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::unnamed_storage)))]
    UnnamedStorage { section: String },

    #[error("Storage key '{key}' already holds a value that is not a table")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::storage_conflict)))]
    StorageConflict { key: String },

    #[error("Failed to parse {path} (line {line}): {message}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::parse)))]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Config does not fit the requested type: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::deserialize)))]
    Deserialize(#[from] toml::de::Error),

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(clapini::io)))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A raw text value that a converter could not interpret.
///
/// Carries no section context; the reader wraps it into
/// [`ConfigFileError::BadParameter`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{value:?} is not a valid {expected}")]
pub struct ConversionError {
    pub value: String,
    pub expected: String,
}

impl ConversionError {
    pub fn new(value: &str, expected: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_section_formats_correctly() {
        let err = ConfigFileError::UnmappedSection {
            section: "unbound.section".into(),
        };
        assert_eq!(err.to_string(), "No schema found for: section=unbound.section");
    }

    #[test]
    fn bad_parameter_formats() {
        let err = ConfigFileError::BadParameter {
            section: "hello".into(),
            param: "number".into(),
            value: "abc".into(),
            reason: ConversionError::new("abc", "integer").to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("number"));
        assert!(msg.contains("[hello]"));
        assert!(msg.contains("\"abc\" is not a valid integer"));
    }

    #[test]
    fn parse_error_formats() {
        let err = ConfigFileError::Parse {
            path: "/tmp/hello.ini".into(),
            line: 7,
            message: "missing section header".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hello.ini"));
        assert!(msg.contains("line 7"));
    }
}
