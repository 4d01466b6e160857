//! Record schemas
//!
//! A [`RecordSchema`] lists the exact field set of a profile's record with
//! each field's kind and domain. The validator evaluates raw JSON against
//! it, and `GET /schema` serves it as-is.

use serde::Serialize;

use crate::record::Profile;
use crate::validation::rules::bounds::NumericBounds;

/// Kind and domain of a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// String from a closed set
    Categorical { values: &'static [&'static str] },
    /// Integer from a closed set
    IntegerCategorical { values: &'static [i64] },
    /// Integer within bounds
    Integer { bounds: NumericBounds },
    /// Any JSON number within bounds
    Number { bounds: NumericBounds },
}

impl FieldKind {
    /// JSON type name this kind expects
    pub fn expected_type(&self) -> &'static str {
        match self {
            FieldKind::Categorical { .. } => "string",
            FieldKind::IntegerCategorical { .. } | FieldKind::Integer { .. } => "integer",
            FieldKind::Number { .. } => "number",
        }
    }

    /// Check the JSON type of a value against this kind
    pub fn type_matches(&self, value: &serde_json::Value) -> bool {
        match self {
            FieldKind::Categorical { .. } => value.is_string(),
            FieldKind::IntegerCategorical { .. } | FieldKind::Integer { .. } => {
                value.is_i64() || value.is_u64()
            }
            FieldKind::Number { .. } => value.is_number(),
        }
    }

    /// Bounds of a numeric kind
    pub fn bounds(&self) -> Option<&NumericBounds> {
        match self {
            FieldKind::Integer { bounds } | FieldKind::Number { bounds } => Some(bounds),
            _ => None,
        }
    }
}

/// One field of a record schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn categorical(
        name: &'static str,
        description: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::Categorical { values },
        }
    }

    pub fn integer_categorical(
        name: &'static str,
        description: &'static str,
        values: &'static [i64],
    ) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::IntegerCategorical { values },
        }
    }

    pub fn integer(name: &'static str, description: &'static str, bounds: NumericBounds) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::Integer { bounds },
        }
    }

    pub fn number(name: &'static str, description: &'static str, bounds: NumericBounds) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::Number { bounds },
        }
    }
}

/// The exact field set of a profile's record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSchema {
    pub profile: Profile,
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn new(profile: Profile, fields: Vec<FieldSpec>) -> Self {
        Self { profile, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declaration index of a field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_matches() {
        let cat = FieldKind::Categorical { values: &["a"] };
        assert!(cat.type_matches(&json!("a")));
        assert!(!cat.type_matches(&json!(1)));

        let int = FieldKind::Integer {
            bounds: NumericBounds::unbounded(),
        };
        assert!(int.type_matches(&json!(3)));
        assert!(int.type_matches(&json!(-3)));
        assert!(!int.type_matches(&json!(3.5)));
        assert!(!int.type_matches(&json!("3")));

        let num = FieldKind::Number {
            bounds: NumericBounds::unbounded(),
        };
        assert!(num.type_matches(&json!(3)));
        assert!(num.type_matches(&json!(3.5)));
        assert!(!num.type_matches(&json!(null)));
    }

    #[test]
    fn test_churn_schema_field_set() {
        let schema = Profile::Churn.schema();
        assert_eq!(schema.len(), 19);
        assert_eq!(schema.position("gender"), Some(0));
        assert!(schema.field("contract").is_some());
        assert!(schema.field("customerid").is_none());
    }

    #[test]
    fn test_schema_serializes_kind_tag() {
        let schema = Profile::Lead.schema();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["profile"], "lead");
        assert_eq!(json["fields"][0]["name"], "lead_source");
        assert_eq!(json["fields"][0]["kind"], "categorical");
        assert_eq!(json["fields"][1]["kind"], "integer");
        assert_eq!(json["fields"][1]["bounds"]["min"], 0.0);
    }
}
