use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    ScoringFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Input rejected before scoring. The display text is shown to the applicant as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Age must be at least 18 years.")]
    AgeBelowMinimum,
    #[error("Income must be greater than 0.")]
    IncomeNotPositive,
    #[error("Loan amount must be greater than 0.")]
    LoanAmountNotPositive,
    #[error("{field} must be {bounds}.")]
    OutOfRange { field: &'static str, bounds: Bounds },
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorCode::Validation, value.to_string())
    }
}
