//! Prediction records
//!
//! A record describes one customer or lead. Each profile has its own typed
//! record whose categorical fields are closed enums, so a value outside its
//! domain cannot be represented once decoding succeeds.

pub mod domain;
pub mod customer;
pub mod lead;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::schema::RecordSchema;
use customer::Customer;
use lead::Lead;

/// Which record type, artifact target and response fields are served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Telco customer churn
    Churn,
    /// Course lead conversion
    Lead,
}

impl Profile {
    /// Name of the predicted positive class
    pub fn target(&self) -> &'static str {
        match self {
            Profile::Churn => "churn",
            Profile::Lead => "lead",
        }
    }

    /// Response field carrying the probability
    pub fn probability_field(&self) -> &'static str {
        match self {
            Profile::Churn => "churn_probability",
            Profile::Lead => "lead_probability",
        }
    }

    /// Response field carrying the decision
    pub fn decision_field(&self) -> &'static str {
        self.target()
    }

    /// Schema of this profile's record
    pub fn schema(&self) -> RecordSchema {
        match self {
            Profile::Churn => Customer::schema(),
            Profile::Lead => Lead::schema(),
        }
    }

    /// Decode a JSON object into this profile's typed record
    pub fn decode(&self, body: &serde_json::Value) -> Result<Record, serde_json::Error> {
        match self {
            Profile::Churn => Customer::deserialize(body).map(Record::Customer),
            Profile::Lead => Lead::deserialize(body).map(Record::Lead),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "churn" => Ok(Profile::Churn),
            "lead" => Ok(Profile::Lead),
            other => Err(format!("unknown profile '{}', expected churn or lead", other)),
        }
    }
}

/// A validated record of either profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Customer(Customer),
    Lead(Lead),
}

impl Record {
    pub fn profile(&self) -> Profile {
        match self {
            Record::Customer(_) => Profile::Churn,
            Record::Lead(_) => Profile::Lead,
        }
    }

    /// One-hot feature encoding consumed by the model
    pub fn features(&self) -> FeatureVector {
        match self {
            Record::Customer(c) => c.features(),
            Record::Lead(l) => l.features(),
        }
    }
}

impl From<Customer> for Record {
    fn from(customer: Customer) -> Self {
        Record::Customer(customer)
    }
}

impl From<Lead> for Record {
    fn from(lead: Lead) -> Self {
        Record::Lead(lead)
    }
}

/// Named feature values in a fixed key order
///
/// Categorical fields become `field=value` with weight 1.0, numeric fields
/// keep their name and value. Iteration order is the sorted key order, so
/// any sum over the vector is reproducible bit for bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a one-hot categorical feature
    pub fn categorical(&mut self, field: &str, value: &str) {
        self.values.insert(format!("{}={}", field, value), 1.0);
    }

    /// Add a numeric feature
    pub fn numeric(&mut self, field: &str, value: f64) {
        self.values.insert(field.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
