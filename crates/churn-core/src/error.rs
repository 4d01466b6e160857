//! Error types for the prediction core
//!
//! Two families exist: [`ValidationError`] for client input that fails the
//! record schema, and [`ModelError`] for the model artifact and the
//! inference call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Machine-readable code of a single violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    /// The body (or batch element) is not a JSON object
    NotAnObject,
    /// A schema field is absent
    RequiredFieldMissing,
    /// A field the schema does not define is present
    UnknownField,
    /// The JSON type does not match the field kind
    TypeMismatch,
    /// A categorical value outside its domain
    ValueNotAllowed,
    /// A numeric value under its lower bound
    BelowMinimum,
    /// A numeric value over its upper bound
    AboveMaximum,
    /// Passed every rule but could not be decoded into a typed record
    Undecodable,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::NotAnObject => "NOT_AN_OBJECT",
            ViolationCode::RequiredFieldMissing => "REQUIRED_FIELD_MISSING",
            ViolationCode::UnknownField => "UNKNOWN_FIELD",
            ViolationCode::TypeMismatch => "TYPE_MISMATCH",
            ViolationCode::ValueNotAllowed => "VALUE_NOT_ALLOWED",
            ViolationCode::BelowMinimum => "BELOW_MINIMUM",
            ViolationCode::AboveMaximum => "ABOVE_MAXIMUM",
            ViolationCode::Undecodable => "UNDECODABLE",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated constraint of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Field name (`$` for the record itself, `[i].field` inside a batch)
    pub field: String,
    /// Violation code
    pub code: ViolationCode,
    /// Human-readable message
    pub message: String,
    /// Expected domain, type or bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<serde_json::Value>,
}

impl Violation {
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: serde_json::Value) -> Self {
        self.actual = Some(actual);
        self
    }

    /// Prefix the field with a batch index
    pub fn at_index(mut self, index: usize) -> Self {
        self.field = if self.field == "$" {
            format!("[{}]", index)
        } else {
            format!("[{}].{}", index, self.field)
        };
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}': {}", self.code, self.field, self.message)
    }
}

/// A record failed validation
///
/// Carries every violation found, never only the first one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("record failed validation with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Check whether any violation targets the given field
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Codes of every violation, in report order
    pub fn codes(&self) -> Vec<ViolationCode> {
        self.violations.iter().map(|v| v.code).collect()
    }
}

/// Model artifact and inference errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// The artifact could not be loaded; fatal at startup
    #[error("model unavailable at {}: {reason}", .path.display())]
    Unavailable { path: PathBuf, reason: String },

    /// The model produced an unusable output for a validated record
    #[error("inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ModelError::Unavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        ModelError::Inference(msg.into())
    }

    /// Check if the process must refuse to serve
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, ModelError::Unavailable { .. })
    }
}
