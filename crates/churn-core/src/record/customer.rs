//! Telco customer record for the churn profile

use serde::{Deserialize, Serialize};

use super::domain::{
    Contract, Gender, InternetAddon, InternetService, MultipleLines, PaymentMethod,
    SeniorCitizen, YesNo,
};
use super::{FeatureVector, Profile};
use crate::schema::{FieldSpec, RecordSchema};
use crate::validation::rules::bounds::NumericBounds;

/// Upper ceiling for a monthly charge
pub const MONTHLY_CHARGE_CEILING: f64 = 1000.0;

/// One telco customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Customer {
    pub gender: Gender,
    pub seniorcitizen: SeniorCitizen,
    pub partner: YesNo,
    pub dependents: YesNo,
    pub phoneservice: YesNo,
    pub multiplelines: MultipleLines,
    pub internetservice: InternetService,
    pub onlinesecurity: InternetAddon,
    pub onlinebackup: InternetAddon,
    pub deviceprotection: InternetAddon,
    pub techsupport: InternetAddon,
    pub streamingtv: InternetAddon,
    pub streamingmovies: InternetAddon,
    pub contract: Contract,
    pub paperlessbilling: YesNo,
    pub paymentmethod: PaymentMethod,
    /// Months with the company
    pub tenure: u64,
    pub monthlycharges: f64,
    pub totalcharges: f64,
}

impl Customer {
    pub fn schema() -> RecordSchema {
        RecordSchema::new(
            Profile::Churn,
            vec![
                FieldSpec::categorical("gender", "Customer gender", Gender::VALUES),
                FieldSpec::integer_categorical(
                    "seniorcitizen",
                    "1 if the customer is a senior citizen",
                    SeniorCitizen::VALUES,
                ),
                FieldSpec::categorical("partner", "Has a partner", YesNo::VALUES),
                FieldSpec::categorical("dependents", "Has dependents", YesNo::VALUES),
                FieldSpec::categorical("phoneservice", "Has phone service", YesNo::VALUES),
                FieldSpec::categorical(
                    "multiplelines",
                    "Has multiple phone lines",
                    MultipleLines::VALUES,
                ),
                FieldSpec::categorical(
                    "internetservice",
                    "Internet service type",
                    InternetService::VALUES,
                ),
                FieldSpec::categorical("onlinesecurity", "Online security add-on", InternetAddon::VALUES),
                FieldSpec::categorical("onlinebackup", "Online backup add-on", InternetAddon::VALUES),
                FieldSpec::categorical(
                    "deviceprotection",
                    "Device protection add-on",
                    InternetAddon::VALUES,
                ),
                FieldSpec::categorical("techsupport", "Tech support add-on", InternetAddon::VALUES),
                FieldSpec::categorical("streamingtv", "Streaming TV add-on", InternetAddon::VALUES),
                FieldSpec::categorical(
                    "streamingmovies",
                    "Streaming movies add-on",
                    InternetAddon::VALUES,
                ),
                FieldSpec::categorical("contract", "Contract term", Contract::VALUES),
                FieldSpec::categorical("paperlessbilling", "Paperless billing", YesNo::VALUES),
                FieldSpec::categorical("paymentmethod", "Payment method", PaymentMethod::VALUES),
                FieldSpec::integer(
                    "tenure",
                    "Months with the company",
                    NumericBounds::at_least(0.0),
                ),
                FieldSpec::number(
                    "monthlycharges",
                    "Current monthly charge",
                    NumericBounds::greater_than(0.0).below(MONTHLY_CHARGE_CEILING),
                ),
                FieldSpec::number(
                    "totalcharges",
                    "Total amount charged to date",
                    NumericBounds::at_least(0.0),
                ),
            ],
        )
    }

    pub fn features(&self) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.categorical("gender", self.gender.as_str());
        features.numeric("seniorcitizen", self.seniorcitizen.as_i64() as f64);
        features.categorical("partner", self.partner.as_str());
        features.categorical("dependents", self.dependents.as_str());
        features.categorical("phoneservice", self.phoneservice.as_str());
        features.categorical("multiplelines", self.multiplelines.as_str());
        features.categorical("internetservice", self.internetservice.as_str());
        features.categorical("onlinesecurity", self.onlinesecurity.as_str());
        features.categorical("onlinebackup", self.onlinebackup.as_str());
        features.categorical("deviceprotection", self.deviceprotection.as_str());
        features.categorical("techsupport", self.techsupport.as_str());
        features.categorical("streamingtv", self.streamingtv.as_str());
        features.categorical("streamingmovies", self.streamingmovies.as_str());
        features.categorical("contract", self.contract.as_str());
        features.categorical("paperlessbilling", self.paperlessbilling.as_str());
        features.categorical("paymentmethod", self.paymentmethod.as_str());
        features.numeric("tenure", self.tenure as f64);
        features.numeric("monthlycharges", self.monthlycharges);
        features.numeric("totalcharges", self.totalcharges);
        features
    }
}
