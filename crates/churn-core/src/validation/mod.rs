//! Schema validation engine
//!
//! Raw JSON goes through every registered rule before any typed record is
//! built, so the caller receives the full list of violations in one pass.
//! Only a body with no violations is decoded into a [`Record`].

pub mod rules;

use serde_json::Value;
use std::sync::Arc;

use crate::error::{ValidationError, Violation, ViolationCode};
use crate::record::{Profile, Record};
use crate::schema::RecordSchema;
use rules::{json_type_name, Rule, RuleCategory};

/// Validates raw request bodies against one profile's schema
pub struct Validator {
    profile: Profile,
    schema: RecordSchema,
    rules: Vec<Arc<dyn Rule>>,
}

impl Validator {
    /// Create a validator with the default rule set
    pub fn new(profile: Profile) -> Self {
        let mut validator = Self::empty(profile);
        validator.register_default_rules();
        validator
    }

    /// Create a validator without rules
    pub fn empty(profile: Profile) -> Self {
        Self {
            profile,
            schema: profile.schema(),
            rules: Vec::new(),
        }
    }

    fn register_default_rules(&mut self) {
        self.register(Arc::new(rules::required::RequiredFieldsRule::new()));
        self.register(Arc::new(rules::required::UnknownFieldsRule::new()));
        self.register(Arc::new(rules::type_check::TypeCheckRule::new()));
        self.register(Arc::new(rules::enum_check::EnumRule::new()));
        self.register(Arc::new(rules::bounds::BoundsRule::new()));
    }

    /// Register a validation rule
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Get rules by category
    pub fn rules_by_category(&self, category: RuleCategory) -> Vec<Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| r.category() == category)
            .cloned()
            .collect()
    }

    /// Collect every violation of a body
    ///
    /// Violations follow schema field order, then unknown fields by name.
    pub fn check(&self, body: &Value) -> Vec<Violation> {
        let Some(record) = body.as_object() else {
            return vec![Violation::new(
                "$",
                ViolationCode::NotAnObject,
                format!("Record must be a JSON object, got {}", json_type_name(body)),
            )
            .with_expected("object")
            .with_actual(body.clone())];
        };

        let mut violations: Vec<Violation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.evaluate(record, &self.schema))
            .collect();

        violations.sort_by(|a, b| {
            let pos_a = self.schema.position(&a.field).unwrap_or(usize::MAX);
            let pos_b = self.schema.position(&b.field).unwrap_or(usize::MAX);
            pos_a.cmp(&pos_b).then_with(|| a.field.cmp(&b.field))
        });

        violations
    }

    /// Validate a body and decode it into a typed record
    pub fn validate(&self, body: &Value) -> Result<Record, ValidationError> {
        let violations = self.check(body);
        if !violations.is_empty() {
            tracing::debug!(
                profile = %self.profile,
                violations = violations.len(),
                "Record rejected by validation"
            );
            return Err(ValidationError::new(violations));
        }

        self.profile.decode(body).map_err(|e| {
            ValidationError::new(vec![Violation::new(
                "$",
                ViolationCode::Undecodable,
                format!("Record could not be decoded: {}", e),
            )])
        })
    }

    /// Validate every body of a batch
    ///
    /// Either all records are valid and returned in input order, or the
    /// error carries every violation of every record, prefixed with its
    /// index.
    pub fn validate_batch(&self, bodies: &[Value]) -> Result<Vec<Record>, ValidationError> {
        let mut records = Vec::with_capacity(bodies.len());
        let mut violations = Vec::new();

        for (index, body) in bodies.iter().enumerate() {
            match self.validate(body) {
                Ok(record) => records.push(record),
                Err(err) => violations.extend(err.violations.into_iter().map(|v| v.at_index(index))),
            }
        }

        if violations.is_empty() {
            Ok(records)
        } else {
            Err(ValidationError::new(violations))
        }
    }
}
