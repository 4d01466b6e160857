//! Categorical domain rule
//!
//! Checks that categorical values come from their closed domains. String
//! domains suggest the closest allowed value when one is near.

use serde_json::{Map, Value};

use super::{Rule, RuleCategory};
use crate::error::{Violation, ViolationCode};
use crate::schema::{FieldKind, RecordSchema};

/// Rule for validating categorical domains
#[derive(Debug, Default)]
pub struct EnumRule;

impl EnumRule {
    pub fn new() -> Self {
        Self
    }

    fn suggestion<'a>(value: &str, allowed: &[&'a str]) -> Option<&'a str> {
        let lower = value.to_lowercase();
        allowed
            .iter()
            .map(|candidate| (candidate, levenshtein_distance(&lower, &candidate.to_lowercase())))
            .filter(|(_, distance)| *distance <= 2)
            .min_by_key(|(_, distance)| *distance)
            .map(|(candidate, _)| *candidate)
    }
}

/// Simple Levenshtein distance for suggestion matching
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

impl Rule for EnumRule {
    fn id(&self) -> &str {
        "enum-check"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Enum
    }

    fn description(&self) -> &str {
        "Validates that categorical values are from their allowed sets"
    }

    fn evaluate(&self, record: &Map<String, Value>, schema: &RecordSchema) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in &schema.fields {
            let Some(value) = record.get(field.name) else {
                continue;
            };

            match &field.kind {
                FieldKind::Categorical { values } => {
                    let Some(s) = value.as_str() else {
                        continue;
                    };
                    if values.iter().any(|allowed| *allowed == s) {
                        continue;
                    }

                    let mut message =
                        format!("Value '{}' is not allowed for '{}'", s, field.name);
                    if let Some(suggestion) = Self::suggestion(s, values) {
                        message.push_str(&format!("; did you mean '{}'?", suggestion));
                    }

                    violations.push(
                        Violation::new(field.name, ViolationCode::ValueNotAllowed, message)
                            .with_expected(format!("one of: {}", values.join(", ")))
                            .with_actual(value.clone()),
                    );
                }
                FieldKind::IntegerCategorical { values } => {
                    let Some(n) = value.as_i64() else {
                        // Integers beyond i64 can never be in the domain
                        if value.is_u64() {
                            violations.push(Self::integer_violation(field.name, values, value));
                        }
                        continue;
                    };
                    if !values.contains(&n) {
                        violations.push(Self::integer_violation(field.name, values, value));
                    }
                }
                FieldKind::Integer { .. } | FieldKind::Number { .. } => {}
            }
        }

        violations
    }
}

impl EnumRule {
    fn integer_violation(name: &str, values: &[i64], value: &Value) -> Violation {
        let allowed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        Violation::new(
            name,
            ViolationCode::ValueNotAllowed,
            format!("Value {} is not allowed for '{}'", value, name),
        )
        .with_expected(format!("one of: {}", allowed.join(", ")))
        .with_actual(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Profile;
    use serde_json::json;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("hello", "hello"), 0);
        assert_eq!(levenshtein_distance("hello", "hallo"), 1);
        assert_eq!(levenshtein_distance("hello", "world"), 4);
        assert_eq!(levenshtein_distance("", "hello"), 5);
    }

    #[test]
    fn test_enum_rule_valid() {
        let schema = Profile::Lead.schema();
        let record = json!({ "lead_source": "referral" });
        assert!(EnumRule::new()
            .evaluate(record.as_object().unwrap(), &schema)
            .is_empty());
    }

    #[test]
    fn test_enum_rule_invalid_with_suggestion() {
        let schema = Profile::Churn.schema();
        let record = json!({ "contract": "two-year" });

        let violations = EnumRule::new().evaluate(record.as_object().unwrap(), &schema);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::ValueNotAllowed);
        assert!(violations[0].message.contains("did you mean 'two_year'"));
        assert_eq!(
            violations[0].expected.as_deref(),
            Some("one of: month-to-month, one_year, two_year")
        );
    }

    #[test]
    fn test_enum_rule_is_case_sensitive() {
        let schema = Profile::Churn.schema();
        let record = json!({ "gender": "Female" });

        let violations = EnumRule::new().evaluate(record.as_object().unwrap(), &schema);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("did you mean 'female'"));
    }

    #[test]
    fn test_integer_domain() {
        let schema = Profile::Churn.schema();

        let record = json!({ "seniorcitizen": 2 });
        let violations = EnumRule::new().evaluate(record.as_object().unwrap(), &schema);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].expected.as_deref(), Some("one of: 0, 1"));

        let record = json!({ "seniorcitizen": 1 });
        assert!(EnumRule::new()
            .evaluate(record.as_object().unwrap(), &schema)
            .is_empty());
    }

    #[test]
    fn test_wrong_type_is_left_to_type_check() {
        let schema = Profile::Churn.schema();
        let record = json!({ "gender": 3, "seniorcitizen": "yes" });
        assert!(EnumRule::new()
            .evaluate(record.as_object().unwrap(), &schema)
            .is_empty());
    }
}
