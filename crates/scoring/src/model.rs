use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use shared::domain::{ApplicationInput, LoanPurpose, LoanType, ResidenceType, RiskResult};
use tracing::debug;

use crate::{credit_score_for_probability, rating_for_score, Scorer, ScoringError};

const BUILTIN_ARTIFACT: &str = include_str!("../model/default_model.json");

/// Min-max scaled inputs.
pub const NUMERIC_FEATURES: [&str; 7] = [
    "age",
    "loan_tenure_months",
    "number_of_open_accounts",
    "credit_utilization_ratio",
    "loan_to_income",
    "delinquency_ratio",
    "avg_dpd_per_delinquency",
];

/// Every model input in vector order: the numeric block followed by one-hot
/// columns. Mortgage, Auto and Secured are the dropped baselines.
pub const FEATURE_NAMES: [&str; 13] = [
    "age",
    "loan_tenure_months",
    "number_of_open_accounts",
    "credit_utilization_ratio",
    "loan_to_income",
    "delinquency_ratio",
    "avg_dpd_per_delinquency",
    "residence_type_Owned",
    "residence_type_Rented",
    "loan_purpose_Education",
    "loan_purpose_Home",
    "loan_purpose_Personal",
    "loan_type_Unsecured",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub min: f64,
    pub max: f64,
}

impl Scaling {
    fn apply(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            0.0
        } else {
            (value - self.min) / range
        }
    }
}

/// On-disk model description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub intercept: f64,
    pub weights: BTreeMap<String, f64>,
    pub scaling: BTreeMap<String, Scaling>,
}

impl ModelArtifact {
    pub fn builtin() -> Result<Self, ScoringError> {
        serde_json::from_str(BUILTIN_ARTIFACT)
            .map_err(|e| ScoringError::InvalidModel(format!("built-in artifact: {e}")))
    }

    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ScoringError::ModelUnavailable(format!("failed to read '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ScoringError::InvalidModel(format!("failed to parse '{}': {e}", path.display()))
        })
    }
}

/// Raw (unscaled) features for one application.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_NAMES.len()],
}

impl FeatureVector {
    pub fn from_input(input: &ApplicationInput) -> Self {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        Self {
            values: [
                input.age as f64,
                input.loan_tenure_months as f64,
                input.num_open_accounts as f64,
                input.credit_utilization_ratio as f64,
                input.loan_to_income_ratio(),
                input.delinquency_ratio as f64,
                input.avg_dpd_per_delinquency,
                flag(input.residence_type == ResidenceType::Owned),
                flag(input.residence_type == ResidenceType::Rented),
                flag(input.loan_purpose == LoanPurpose::Education),
                flag(input.loan_purpose == LoanPurpose::Home),
                flag(input.loan_purpose == LoanPurpose::Personal),
                flag(input.loan_type == LoanType::Unsecured),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|feature| *feature == name)
            .map(|index| self.values[index])
    }
}

/// Logistic regression over min-max scaled features.
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    intercept: f64,
    weights: [f64; FEATURE_NAMES.len()],
    scaling: [Scaling; NUMERIC_FEATURES.len()],
}

impl LogisticScorer {
    pub fn builtin() -> Result<Self, ScoringError> {
        Self::from_artifact(ModelArtifact::builtin()?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        Self::from_artifact(ModelArtifact::from_path(path)?)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ScoringError> {
        if !artifact.intercept.is_finite() {
            return Err(ScoringError::InvalidModel("intercept is not finite".into()));
        }
        if let Some(unknown) = artifact
            .weights
            .keys()
            .find(|name| !FEATURE_NAMES.contains(&name.as_str()))
        {
            return Err(ScoringError::InvalidModel(format!(
                "unknown feature weight '{unknown}'"
            )));
        }
        if let Some(unknown) = artifact
            .scaling
            .keys()
            .find(|name| !NUMERIC_FEATURES.contains(&name.as_str()))
        {
            return Err(ScoringError::InvalidModel(format!(
                "unknown scaled feature '{unknown}'"
            )));
        }

        let mut weights = [0.0; FEATURE_NAMES.len()];
        for (slot, name) in weights.iter_mut().zip(FEATURE_NAMES) {
            let weight = artifact
                .weights
                .get(name)
                .copied()
                .ok_or_else(|| ScoringError::InvalidModel(format!("missing weight for '{name}'")))?;
            if !weight.is_finite() {
                return Err(ScoringError::InvalidModel(format!(
                    "weight for '{name}' is not finite"
                )));
            }
            *slot = weight;
        }

        let mut scaling = [Scaling { min: 0.0, max: 1.0 }; NUMERIC_FEATURES.len()];
        for (slot, name) in scaling.iter_mut().zip(NUMERIC_FEATURES) {
            let bounds = artifact
                .scaling
                .get(name)
                .copied()
                .ok_or_else(|| ScoringError::InvalidModel(format!("missing scaling for '{name}'")))?;
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.max < bounds.min {
                return Err(ScoringError::InvalidModel(format!(
                    "scaling for '{name}' must be finite with min <= max"
                )));
            }
            *slot = bounds;
        }

        Ok(Self {
            intercept: artifact.intercept,
            weights,
            scaling,
        })
    }

    pub fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact {
            intercept: self.intercept,
            weights: FEATURE_NAMES
                .iter()
                .zip(self.weights)
                .map(|(name, weight)| (name.to_string(), weight))
                .collect(),
            scaling: NUMERIC_FEATURES
                .iter()
                .zip(self.scaling)
                .map(|(name, bounds)| (name.to_string(), bounds))
                .collect(),
        }
    }

    pub fn default_probability(&self, features: &FeatureVector) -> f64 {
        let logit = features
            .values
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let scaled = match self.scaling.get(index) {
                    Some(bounds) => bounds.apply(*raw),
                    None => *raw,
                };
                scaled * self.weights[index]
            })
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-logit).exp())
    }
}

fn ensure_finite(input: &ApplicationInput) -> Result<(), ScoringError> {
    let numbers = [
        ("income", input.income),
        ("loan_amount", input.loan_amount),
        ("avg_dpd_per_delinquency", input.avg_dpd_per_delinquency),
    ];
    match numbers.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, _)) => Err(ScoringError::InvalidInput(format!("{name} is not a finite number"))),
        None => Ok(()),
    }
}

impl Scorer for LogisticScorer {
    fn predict(&self, input: &ApplicationInput) -> Result<RiskResult, ScoringError> {
        ensure_finite(input)?;
        let features = FeatureVector::from_input(input);
        let probability = self.default_probability(&features);
        if !probability.is_finite() {
            return Err(ScoringError::Inference(
                "model produced a non-finite probability".into(),
            ));
        }
        let credit_score = credit_score_for_probability(probability);
        let rating = rating_for_score(credit_score);
        debug!(probability, credit_score, %rating, "scored application");
        Ok(RiskResult {
            probability,
            credit_score,
            rating,
        })
    }
}
