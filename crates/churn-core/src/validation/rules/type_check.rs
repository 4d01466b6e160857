//! JSON type rule

use serde_json::{Map, Value};

use super::{json_type_name, Rule, RuleCategory};
use crate::error::{Violation, ViolationCode};
use crate::schema::RecordSchema;

/// Rule checking each present field's JSON type against its kind
///
/// Integer fields accept integral JSON numbers only; `1.0` is a number,
/// not an integer.
#[derive(Debug, Default)]
pub struct TypeCheckRule;

impl TypeCheckRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TypeCheckRule {
    fn id(&self) -> &str {
        "type-check"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Type
    }

    fn description(&self) -> &str {
        "Validates that field values have the expected JSON type"
    }

    fn evaluate(&self, record: &Map<String, Value>, schema: &RecordSchema) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in &schema.fields {
            let Some(value) = record.get(field.name) else {
                continue;
            };

            if !field.kind.type_matches(value) {
                violations.push(
                    Violation::new(
                        field.name,
                        ViolationCode::TypeMismatch,
                        format!(
                            "Field '{}' must be of type {}, got {}",
                            field.name,
                            field.kind.expected_type(),
                            json_type_name(value)
                        ),
                    )
                    .with_expected(field.kind.expected_type())
                    .with_actual(value.clone()),
                );
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Profile;
    use serde_json::json;

    #[test]
    fn test_type_mismatches() {
        let schema = Profile::Churn.schema();
        let record = json!({
            "gender": 1,
            "seniorcitizen": "0",
            "tenure": 1.5,
            "monthlycharges": "29.85",
            "totalcharges": 29
        });

        let violations = TypeCheckRule::new().evaluate(record.as_object().unwrap(), &schema);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();

        assert_eq!(fields, vec!["gender", "seniorcitizen", "tenure", "monthlycharges"]);
        assert!(violations[2].message.contains("got number"));
    }

    #[test]
    fn test_null_is_a_type_mismatch() {
        let schema = Profile::Lead.schema();
        let record = json!({ "lead_source": null });

        let violations = TypeCheckRule::new().evaluate(record.as_object().unwrap(), &schema);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].expected.as_deref(), Some("string"));
    }
}
