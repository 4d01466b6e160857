//! Field-set rules
//!
//! The record must carry exactly the schema's fields: none missing, none
//! extra.

use serde_json::{Map, Value};

use super::{Rule, RuleCategory};
use crate::error::{Violation, ViolationCode};
use crate::schema::RecordSchema;

/// Rule reporting schema fields absent from the record
#[derive(Debug, Default)]
pub struct RequiredFieldsRule;

impl RequiredFieldsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RequiredFieldsRule {
    fn id(&self) -> &str {
        "required-fields"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Required
    }

    fn description(&self) -> &str {
        "Validates that every schema field is present"
    }

    fn evaluate(&self, record: &Map<String, Value>, schema: &RecordSchema) -> Vec<Violation> {
        schema
            .fields
            .iter()
            .filter(|field| !record.contains_key(field.name))
            .map(|field| {
                Violation::new(
                    field.name,
                    ViolationCode::RequiredFieldMissing,
                    format!("Required field '{}' is missing", field.name),
                )
                .with_expected(field.kind.expected_type())
            })
            .collect()
    }
}

/// Rule reporting record fields the schema does not define
#[derive(Debug, Default)]
pub struct UnknownFieldsRule;

impl UnknownFieldsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UnknownFieldsRule {
    fn id(&self) -> &str {
        "unknown-fields"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Unknown
    }

    fn description(&self) -> &str {
        "Rejects fields that are not part of the schema"
    }

    fn evaluate(&self, record: &Map<String, Value>, schema: &RecordSchema) -> Vec<Violation> {
        record
            .iter()
            .filter(|(key, _)| schema.field(key).is_none())
            .map(|(key, value)| {
                Violation::new(
                    key.as_str(),
                    ViolationCode::UnknownField,
                    format!("Field '{}' is not defined in the {} schema", key, schema.profile),
                )
                .with_actual(value.clone())
            })
            .collect()
    }
}
