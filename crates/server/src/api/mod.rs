//! JSON scoring surface sharing the form's validation and scoring path.

use axum::http::StatusCode;
use scoring::Scorer;
use shared::{
    domain::ApplicationInput,
    error::{ApiError, ErrorCode},
    protocol::ScoreResponse,
};

use crate::controller::{submit, Submission};

pub fn score_route() -> &'static str {
    "/api/v1/score"
}

pub fn ratio_route() -> &'static str {
    "/api/v1/ratio"
}

pub fn score_application(
    scorer: &dyn Scorer,
    input: &ApplicationInput,
) -> Result<ScoreResponse, ApiError> {
    match submit(scorer, input) {
        Submission::Scored(result) => Ok(ScoreResponse::new(input, result)),
        Submission::Rejected(err) => Err(err.into()),
        Submission::Failed(err) => Err(ApiError::new(ErrorCode::ScoringFailed, err.to_string())),
    }
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ScoringFailed => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
