//! Churn Core
//!
//! Record schema, validation and inference for the churn prediction service.
//!
//! ## Architecture
//!
//! 1. **Records** (`record/`): typed customer and lead records whose
//!    categorical fields are closed enums, plus the feature encoding the
//!    model consumes.
//!
//! 2. **Schema** (`schema`): the field list, domains and bounds of each
//!    prediction profile, derived from the record enums.
//!
//! 3. **Validation** (`validation/`): a rule engine that checks a raw JSON
//!    body against the schema and collects every violation before any
//!    typed record is built.
//!
//! 4. **Model** (`model/`): the opaque model capability, the logistic
//!    artifact loader and the inference service that applies the fixed
//!    decision threshold.
//!
//! ## Example
//!
//! ```rust,no_run
//! use churn_core::{InferenceService, Profile, Validator};
//!
//! let validator = Validator::new(Profile::Churn);
//! let service = InferenceService::from_artifact("models/churn_model.json", Profile::Churn)
//!     .expect("model artifact");
//!
//! let body = serde_json::json!({ "gender": "female" });
//! match validator.validate(&body) {
//!     Ok(record) => println!("{:?}", service.predict(&record)),
//!     Err(err) => println!("{} violations", err.violations.len()),
//! }
//! ```

pub mod error;
pub mod model;
pub mod record;
pub mod schema;
pub mod validation;

pub use error::{ModelError, ValidationError, Violation, ViolationCode};
pub use model::{
    logistic::{LogisticModel, ModelArtifact},
    InferenceService, Model, PredictionResult, DECISION_THRESHOLD,
};
pub use record::{
    customer::Customer, lead::Lead, FeatureVector, Profile, Record,
};
pub use schema::{FieldKind, FieldSpec, RecordSchema};
pub use validation::Validator;
