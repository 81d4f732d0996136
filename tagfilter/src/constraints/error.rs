use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Keyword that produced a [`ConstraintError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    MaxLength,
    MinLength,
    Pattern,
    Minimum,
    ExclusiveMinimum,
    MissingMinimum,
    Maximum,
    ExclusiveMaximum,
    MissingMaximum,
    DivisibleBy,
    MultipleOf,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MaxLength => "maxLength",
            ErrorCode::MinLength => "minLength",
            ErrorCode::Pattern => "pattern",
            ErrorCode::Minimum => "minimum",
            ErrorCode::ExclusiveMinimum => "exclusiveMinimum",
            ErrorCode::MissingMinimum => "missingMinimum",
            ErrorCode::Maximum => "maximum",
            ErrorCode::ExclusiveMaximum => "exclusiveMaximum",
            ErrorCode::MissingMaximum => "missingMaximum",
            ErrorCode::DivisibleBy => "divisibleBy",
            ErrorCode::MultipleOf => "multipleOf",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation failure reported against one value.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{path}: {message}")]
pub struct ConstraintError {
    /// JSON pointer of the value, `""` for the document root.
    pub path: String,
    pub message: String,
    pub error_code: ErrorCode,
    pub context: Map<String, Value>,
}

impl ConstraintError {
    pub fn new(path: &str, message: impl Into<String>, error_code: ErrorCode) -> Self {
        ConstraintError {
            path: path.to_string(),
            message: message.into(),
            error_code,
            context: Map::new(),
        }
    }

    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

/// A schema that cannot be compiled into a constraint.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid pregReplace pattern '{pattern}': {source}")]
    InvalidReplacePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown regex flag '{flag}' in '{pattern}'")]
    UnknownRegexFlag { pattern: String, flag: char },

    #[error("schema type '{0}' has no constraint")]
    UnsupportedType(String),

    #[error("invalid schema: {0}")]
    Deserialize(#[from] serde_json::Error),
}
