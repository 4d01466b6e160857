//! Logistic regression artifact
//!
//! The artifact is a JSON document holding an intercept and one coefficient
//! per feature key. Keys follow [`FeatureVector`]: `field=value` for
//! categorical fields, the bare field name for numeric ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Model;
use crate::error::ModelError;
use crate::record::{FeatureVector, Profile, Record};

/// Artifact format understood by this loader
pub const FORMAT_VERSION: u32 = 1;

/// On-disk form of a trained logistic model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Profile the model was trained for
    pub target: Profile,
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

/// A loaded logistic regression model
#[derive(Debug, Clone)]
pub struct LogisticModel {
    name: String,
    artifact: ModelArtifact,
}

impl LogisticModel {
    /// Load and check the artifact at `path`
    pub fn load(path: impl AsRef<Path>, expected: Profile) -> Result<Self, ModelError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|e| ModelError::unavailable(path, format!("cannot read artifact: {}", e)))?;

        let artifact: ModelArtifact = serde_json::from_str(&contents)
            .map_err(|e| ModelError::unavailable(path, format!("malformed artifact: {}", e)))?;

        let model = Self::from_artifact(artifact, expected).map_err(|e| match e {
            ModelError::Unavailable { reason, .. } => ModelError::unavailable(path, reason),
            other => other,
        })?;

        tracing::info!(
            path = %path.display(),
            target = %model.artifact.target,
            coefficients = model.artifact.coefficients.len(),
            "Model artifact loaded"
        );

        Ok(model)
    }

    /// Build a model from an in-memory artifact
    pub fn from_artifact(artifact: ModelArtifact, expected: Profile) -> Result<Self, ModelError> {
        let origin = PathBuf::from("<memory>");

        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::unavailable(
                origin,
                format!(
                    "unsupported format version {}, expected {}",
                    artifact.format_version, FORMAT_VERSION
                ),
            ));
        }

        if artifact.target != expected {
            return Err(ModelError::unavailable(
                origin,
                format!(
                    "artifact targets '{}' but the service profile is '{}'",
                    artifact.target, expected
                ),
            ));
        }

        if !artifact.intercept.is_finite() {
            return Err(ModelError::unavailable(origin, "intercept is not finite"));
        }

        if let Some((key, _)) = artifact.coefficients.iter().find(|(_, c)| !c.is_finite()) {
            return Err(ModelError::unavailable(
                origin,
                format!("coefficient '{}' is not finite", key),
            ));
        }

        Ok(Self {
            name: format!("logistic-{}", artifact.target),
            artifact,
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Linear score before the sigmoid
    ///
    /// Unknown feature keys contribute nothing. The sum runs in sorted key
    /// order.
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .filter_map(|(key, value)| self.artifact.coefficients.get(key).map(|c| c * value))
            .fold(self.artifact.intercept, |acc, term| acc + term)
    }
}

/// Logistic function without overflow for large magnitudes
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Model for LogisticModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_probability(&self, record: &Record) -> Result<f64, ModelError> {
        if record.profile() != self.artifact.target {
            return Err(ModelError::inference(format!(
                "{} record given to a {} model",
                record.profile(),
                self.artifact.target
            )));
        }

        Ok(sigmoid(self.decision_function(&record.features())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::domain::LeadSource;
    use crate::record::lead::Lead;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lead_artifact() -> ModelArtifact {
        ModelArtifact {
            format_version: 1,
            target: Profile::Lead,
            intercept: -1.0,
            coefficients: BTreeMap::from([
                ("lead_source=referral".to_string(), 0.5),
                ("number_of_courses_viewed".to_string(), 0.25),
            ]),
        }
    }

    fn lead(source: LeadSource, courses: u64) -> Record {
        Record::Lead(Lead {
            lead_source: source,
            number_of_courses_viewed: courses,
            annual_income: 10_000,
        })
    }

    fn write_artifact(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(-800.0).is_finite());
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decision_function_ignores_unknown_features() {
        let model = LogisticModel::from_artifact(lead_artifact(), Profile::Lead).unwrap();

        // annual_income and lead_source=events have no coefficient
        let z = model.decision_function(&lead(LeadSource::Events, 4).features());
        assert_eq!(z, 0.0);

        let z = model.decision_function(&lead(LeadSource::Referral, 4).features());
        assert_eq!(z, 0.5);
    }

    #[test]
    fn test_predict_probability() {
        let model = LogisticModel::from_artifact(lead_artifact(), Profile::Lead).unwrap();
        let p = model
            .predict_probability(&lead(LeadSource::Events, 4))
            .unwrap();
        assert_eq!(p, 0.5);
        assert_eq!(model.name(), "logistic-lead");
    }

    #[test]
    fn test_load_from_file() {
        let json = serde_json::to_string(&lead_artifact()).unwrap();
        let file = write_artifact(&json);

        let model = LogisticModel::load(file.path(), Profile::Lead).unwrap();
        assert_eq!(model.artifact(), &lead_artifact());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = LogisticModel::load(&path, Profile::Churn).unwrap_err();
        assert!(err.is_startup_fatal());
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_corrupt_file_is_unavailable() {
        let file = write_artifact("{ not json");
        let err = LogisticModel::load(file.path(), Profile::Lead).unwrap_err();
        assert!(err.is_startup_fatal());
        assert!(err.to_string().contains("malformed artifact"));
    }

    #[test]
    fn test_target_mismatch_is_unavailable() {
        let json = serde_json::to_string(&lead_artifact()).unwrap();
        let file = write_artifact(&json);

        let err = LogisticModel::load(file.path(), Profile::Churn).unwrap_err();
        assert!(err.is_startup_fatal());
        assert!(err.to_string().contains("targets 'lead'"));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_unsupported_version() {
        let mut artifact = lead_artifact();
        artifact.format_version = 2;
        let err = LogisticModel::from_artifact(artifact, Profile::Lead).unwrap_err();
        assert!(err.to_string().contains("format version 2"));
    }

    #[test]
    fn test_non_finite_values() {
        let mut artifact = lead_artifact();
        artifact.intercept = f64::INFINITY;
        assert!(LogisticModel::from_artifact(artifact, Profile::Lead).is_err());

        let mut artifact = lead_artifact();
        artifact
            .coefficients
            .insert("annual_income".to_string(), f64::NAN);
        let err = LogisticModel::from_artifact(artifact, Profile::Lead).unwrap_err();
        assert!(err.to_string().contains("annual_income"));
    }
}
