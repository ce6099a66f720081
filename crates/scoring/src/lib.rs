//! Credit-risk scoring behind a small trait so callers never depend on a
//! concrete model.

use shared::domain::{ApplicationInput, CreditRating, RiskResult};
use thiserror::Error;

mod model;

pub use model::{
    FeatureVector, LogisticScorer, ModelArtifact, Scaling, FEATURE_NAMES, NUMERIC_FEATURES,
};

pub const MIN_CREDIT_SCORE: i64 = 300;
pub const MAX_CREDIT_SCORE: i64 = 900;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

pub trait Scorer: Send + Sync {
    fn predict(&self, input: &ApplicationInput) -> Result<RiskResult, ScoringError>;
}

/// Stands in when the configured model could not be loaded, so every
/// prediction reports why instead of the service refusing to start.
#[derive(Debug, Clone)]
pub struct UnavailableScorer {
    reason: String,
}

impl UnavailableScorer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Scorer for UnavailableScorer {
    fn predict(&self, _input: &ApplicationInput) -> Result<RiskResult, ScoringError> {
        Err(ScoringError::ModelUnavailable(self.reason.clone()))
    }
}

/// Maps a default probability onto the 300..=900 score range; lower risk scores higher.
pub fn credit_score_for_probability(probability: f64) -> i64 {
    let span = (MAX_CREDIT_SCORE - MIN_CREDIT_SCORE) as f64;
    (MIN_CREDIT_SCORE as f64 + (1.0 - probability) * span).round() as i64
}

pub fn rating_for_score(credit_score: i64) -> CreditRating {
    match credit_score {
        300..=499 => CreditRating::Poor,
        500..=649 => CreditRating::Average,
        650..=749 => CreditRating::Good,
        750..=900 => CreditRating::Excellent,
        _ => CreditRating::Unrecognized("Undefined".to_string()),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
