//! Course lead record for the lead-conversion profile

use serde::{Deserialize, Serialize};

use super::domain::LeadSource;
use super::{FeatureVector, Profile};
use crate::schema::{FieldSpec, RecordSchema};
use crate::validation::rules::bounds::NumericBounds;

/// One prospective student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lead {
    pub lead_source: LeadSource,
    pub number_of_courses_viewed: u64,
    pub annual_income: u64,
}

impl Lead {
    pub fn schema() -> RecordSchema {
        RecordSchema::new(
            Profile::Lead,
            vec![
                FieldSpec::categorical(
                    "lead_source",
                    "Channel the lead arrived through",
                    LeadSource::VALUES,
                ),
                FieldSpec::integer(
                    "number_of_courses_viewed",
                    "Courses viewed before signing up",
                    NumericBounds::at_least(0.0),
                ),
                FieldSpec::integer(
                    "annual_income",
                    "Declared annual income",
                    NumericBounds::at_least(0.0),
                ),
            ],
        )
    }

    pub fn features(&self) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.categorical("lead_source", self.lead_source.as_str());
        features.numeric("number_of_courses_viewed", self.number_of_courses_viewed as f64);
        features.numeric("annual_income", self.annual_income as f64);
        features
    }
}
