//! Rule framework for record validation
//!
//! Each rule inspects the raw JSON object against the profile schema and
//! reports violations. A rule reports at most one violation per field, and
//! rules past the type check skip values of the wrong JSON type, so every
//! field surfaces its single most relevant problem.

pub mod bounds;
pub mod enum_check;
pub mod required;
pub mod type_check;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::Violation;
use crate::schema::RecordSchema;

/// Categories of validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Every schema field is present
    Required,
    /// No field outside the schema is present
    Unknown,
    /// JSON types match the field kinds
    Type,
    /// Categorical values belong to their domains
    Enum,
    /// Numeric values satisfy their bounds
    Bounds,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Required => write!(f, "required"),
            RuleCategory::Unknown => write!(f, "unknown"),
            RuleCategory::Type => write!(f, "type"),
            RuleCategory::Enum => write!(f, "enum"),
            RuleCategory::Bounds => write!(f, "bounds"),
        }
    }
}

/// Trait for implementing validation rules
///
/// Rules are pure: the same object and schema always yield the same
/// violations, and the object is never modified.
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &str;

    /// Category this rule belongs to
    fn category(&self) -> RuleCategory;

    /// Description of what this rule validates
    fn description(&self) -> &str;

    /// Evaluate the rule against a JSON object
    fn evaluate(&self, record: &Map<String, Value>, schema: &RecordSchema) -> Vec<Violation>;
}

/// JSON type name of a value, with integers told apart from other numbers
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
