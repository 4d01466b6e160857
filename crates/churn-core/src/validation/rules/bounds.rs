//! Value bounds validation rules
//!
//! Numeric fields carry a lower bound, and some also an upper bound. Either
//! end may be inclusive or exclusive.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Rule, RuleCategory};
use crate::error::{Violation, ViolationCode};
use crate::schema::RecordSchema;

/// Lower and upper limits of a numeric field
///
/// Lower limits are inclusive or exclusive; the only upper limit in use is
/// the exclusive monthly charge ceiling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub min_exclusive: bool,
    pub max_exclusive: bool,
}

impl NumericBounds {
    /// No limit on either side
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// `value >= min`
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }

    /// `value > min`
    pub fn greater_than(min: f64) -> Self {
        Self {
            min: Some(min),
            min_exclusive: true,
            ..Self::default()
        }
    }

    /// Add an exclusive upper limit, `value < max`
    pub fn below(self, max: f64) -> Self {
        Self {
            max: Some(max),
            max_exclusive: true,
            ..self
        }
    }

    /// Place a value relative to the limits
    pub fn check(&self, value: f64) -> BoundsCheckResult {
        let under = |min: f64| value < min || (self.min_exclusive && value == min);
        let over = |max: f64| value > max || (self.max_exclusive && value == max);

        match (self.min, self.max) {
            (Some(min), _) if under(min) => BoundsCheckResult::BelowMinimum { value, min },
            (_, Some(max)) if over(max) => BoundsCheckResult::AboveMaximum { value, max },
            _ => BoundsCheckResult::WithinBounds,
        }
    }

    /// Human-readable form, e.g. `> 0 and < 1000`
    pub fn describe(&self) -> String {
        let lower = self
            .min
            .map(|min| format!("{} {}", if self.min_exclusive { ">" } else { ">=" }, min));
        let upper = self
            .max
            .map(|max| format!("{} {}", if self.max_exclusive { "<" } else { "<=" }, max));

        match (lower, upper) {
            (Some(lower), Some(upper)) => format!("{} and {}", lower, upper),
            (Some(bound), None) | (None, Some(bound)) => bound,
            (None, None) => "unbounded".to_string(),
        }
    }
}

/// Where a value falls relative to its bounds
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsCheckResult {
    WithinBounds,
    BelowMinimum { value: f64, min: f64 },
    AboveMaximum { value: f64, max: f64 },
}

/// Rule for validating numeric bounds of integer and number fields
#[derive(Debug, Default)]
pub struct BoundsRule;

impl BoundsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BoundsRule {
    fn id(&self) -> &str {
        "numeric-bounds"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Bounds
    }

    fn description(&self) -> &str {
        "Validates that numeric values fall within their bounds"
    }

    fn evaluate(&self, record: &Map<String, Value>, schema: &RecordSchema) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in &schema.fields {
            let Some(bounds) = field.kind.bounds() else {
                continue;
            };
            let Some(value) = record.get(field.name) else {
                continue;
            };
            if !field.kind.type_matches(value) {
                continue;
            }
            let Some(number) = value.as_f64() else {
                continue;
            };

            let (code, message) = match bounds.check(number) {
                BoundsCheckResult::WithinBounds => continue,
                BoundsCheckResult::BelowMinimum { .. } => (
                    ViolationCode::BelowMinimum,
                    format!(
                        "Value {} of '{}' is below the allowed range {}",
                        value,
                        field.name,
                        bounds.describe()
                    ),
                ),
                BoundsCheckResult::AboveMaximum { .. } => (
                    ViolationCode::AboveMaximum,
                    format!(
                        "Value {} of '{}' is above the allowed range {}",
                        value,
                        field.name,
                        bounds.describe()
                    ),
                ),
            };

            violations.push(
                Violation::new(field.name, code, message)
                    .with_expected(bounds.describe())
                    .with_actual(value.clone()),
            );
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
    fn test_bounds_check() {
        let bounds = NumericBounds::greater_than(0.0).below(1000.0);
        assert_eq!(bounds.check(0.01), BoundsCheckResult::WithinBounds);
        assert_eq!(
            bounds.check(0.0),
            BoundsCheckResult::BelowMinimum { value: 0.0, min: 0.0 }
        );
        assert_eq!(
            bounds.check(1000.0),
            BoundsCheckResult::AboveMaximum { value: 1000.0, max: 1000.0 }
        );

        let inclusive = NumericBounds::at_least(0.0);
        assert_eq!(inclusive.check(0.0), BoundsCheckResult::WithinBounds);
    }

    #[test]
    fn test_bounds_describe() {
        assert_eq!(NumericBounds::at_least(0.0).describe(), ">= 0");
        assert_eq!(
            NumericBounds::greater_than(0.0).below(1000.0).describe(),
            "> 0 and < 1000"
        );
        assert_eq!(NumericBounds::unbounded().below(5.0).describe(), "< 5");
        assert_eq!(NumericBounds::unbounded().describe(), "unbounded");
    }

    #[test]
    fn test_negative_tenure_below_minimum() {
        let schema = Profile::Churn.schema();
        let record = json!({ "tenure": -1, "totalcharges": 0.0 });

        let violations = BoundsRule::new().evaluate(record.as_object().unwrap(), &schema);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "tenure");
        assert_eq!(violations[0].code, ViolationCode::BelowMinimum);
        assert_eq!(violations[0].expected.as_deref(), Some(">= 0"));
        assert_eq!(violations[0].actual, Some(json!(-1)));
    }

    #[test]
    fn test_monthly_charge_ceiling() {
        let schema = Profile::Churn.schema();
        let record = json!({ "monthlycharges": 1000.0 });

        let violations = BoundsRule::new().evaluate(record.as_object().unwrap(), &schema);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::AboveMaximum);
    }

    #[test]
    fn test_integer_field_with_fraction_is_skipped() {
        let schema = Profile::Churn.schema();
        let record = json!({ "tenure": -1.5 });
        assert!(BoundsRule::new()
            .evaluate(record.as_object().unwrap(), &schema)
            .is_empty());
    }
}
