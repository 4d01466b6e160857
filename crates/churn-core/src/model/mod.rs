//! Model capability and inference
//!
//! The trained classifier is opaque: anything implementing [`Model`] can be
//! served. [`InferenceService`] owns the loaded model for the lifetime of
//! the process, checks every output and applies the decision threshold.

pub mod logistic;

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::error::ModelError;
use crate::record::{Profile, Record};
use logistic::LogisticModel;

/// Probability at or above which the positive class is decided
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Probability of the positive class, in [0, 1]
    pub probability: f64,
    /// Whether the probability reaches the threshold
    pub decision: bool,
}

impl PredictionResult {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            decision: probability >= DECISION_THRESHOLD,
        }
    }

    /// Decision as a class label
    pub fn class(&self) -> u8 {
        u8::from(self.decision)
    }
}

/// A pre-trained binary classifier
pub trait Model: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Probability of the positive class
    fn predict_probability(&self, record: &Record) -> Result<f64, ModelError>;

    /// Predicted class, 1 for the positive class
    fn predict_class(&self, record: &Record) -> Result<u8, ModelError> {
        let probability = self.predict_probability(record)?;
        Ok(u8::from(probability >= DECISION_THRESHOLD))
    }
}

/// Calls the loaded model for validated records
#[derive(Clone)]
pub struct InferenceService {
    model: Arc<dyn Model>,
}

impl InferenceService {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self { model }
    }

    /// Load the logistic artifact at `path` for the given profile
    pub fn from_artifact(path: impl AsRef<Path>, profile: Profile) -> Result<Self, ModelError> {
        let model = LogisticModel::load(path, profile)?;
        Ok(Self::new(Arc::new(model)))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Predict one record
    pub fn predict(&self, record: &Record) -> Result<PredictionResult, ModelError> {
        let probability = self.model.predict_probability(record)?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::inference(format!(
                "model '{}' returned probability {} outside [0, 1]",
                self.model.name(),
                probability
            )));
        }

        Ok(PredictionResult::from_probability(probability))
    }

    /// Predict each record, preserving input order
    pub fn predict_batch(&self, records: &[Record]) -> Result<Vec<PredictionResult>, ModelError> {
        records.iter().map(|record| self.predict(record)).collect()
    }
}

impl std::fmt::Debug for InferenceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceService")
            .field("model", &self.model.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::domain::LeadSource;
    use crate::record::lead::Lead;

    struct FixedModel(f64);

    impl Model for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict_probability(&self, _record: &Record) -> Result<f64, ModelError> {
            Ok(self.0)
        }
    }

    /// Probability grows with the number of courses viewed
    struct CoursesModel;

    impl Model for CoursesModel {
        fn name(&self) -> &str {
            "courses"
        }

        fn predict_probability(&self, record: &Record) -> Result<f64, ModelError> {
            match record {
                Record::Lead(lead) => Ok(lead.number_of_courses_viewed as f64 / 10.0),
                Record::Customer(_) => Err(ModelError::inference("wrong profile")),
            }
        }
    }

    fn lead(courses: u64) -> Record {
        Record::Lead(Lead {
            lead_source: LeadSource::Events,
            number_of_courses_viewed: courses,
            annual_income: 50_000,
        })
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(PredictionResult::from_probability(0.5).decision);
        assert!(!PredictionResult::from_probability(0.4999).decision);
        assert_eq!(PredictionResult::from_probability(0.9).class(), 1);
    }

    #[test]
    fn test_predict_class_default() {
        assert_eq!(FixedModel(0.7).predict_class(&lead(1)).unwrap(), 1);
        assert_eq!(FixedModel(0.2).predict_class(&lead(1)).unwrap(), 0);
    }

    #[test]
    fn test_nan_output_is_rejected() {
        let service = InferenceService::new(Arc::new(FixedModel(f64::NAN)));
        let err = service.predict(&lead(1)).unwrap_err();
        assert!(matches!(err, ModelError::Inference(_)));
        assert!(!err.is_startup_fatal());
    }

    #[test]
    fn test_out_of_range_output_is_rejected() {
        let service = InferenceService::new(Arc::new(FixedModel(1.2)));
        assert!(service.predict(&lead(1)).is_err());

        let service = InferenceService::new(Arc::new(FixedModel(-0.1)));
        assert!(service.predict(&lead(1)).is_err());
    }

    #[test]
    fn test_bounds_are_accepted() {
        for p in [0.0, 1.0] {
            let service = InferenceService::new(Arc::new(FixedModel(p)));
            assert_eq!(service.predict(&lead(1)).unwrap().probability, p);
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let service = InferenceService::new(Arc::new(CoursesModel));
        let results = service
            .predict_batch(&[lead(8), lead(1), lead(5)])
            .unwrap();

        let probabilities: Vec<f64> = results.iter().map(|r| r.probability).collect();
        assert_eq!(probabilities, vec![0.8, 0.1, 0.5]);
        let decisions: Vec<bool> = results.iter().map(|r| r.decision).collect();
        assert_eq!(decisions, vec![true, false, true]);
    }

    #[test]
    fn test_batch_fails_on_any_error() {
        let service = InferenceService::new(Arc::new(CoursesModel));
        assert!(service.predict_batch(&[lead(1), lead(20)]).is_err());
        assert!(service.predict_batch(&[]).unwrap().is_empty());
    }
}
