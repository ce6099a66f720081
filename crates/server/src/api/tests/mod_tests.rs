use super::*;
use scoring::{LogisticScorer, ScoringError, UnavailableScorer};
use shared::domain::{CreditRating, RiskResult};

struct FixedScorer(&'static str);

impl Scorer for FixedScorer {
    fn predict(&self, _input: &ApplicationInput) -> Result<RiskResult, ScoringError> {
        Ok(RiskResult {
            probability: 0.42,
            credit_score: 650,
            rating: CreditRating::parse(self.0),
        })
    }
}

#[test]
fn scored_response_carries_color_and_ratio() {
    let input = ApplicationInput {
        income: 1000.0,
        loan_amount: 2500.0,
        ..ApplicationInput::default()
    };
    let response = score_application(&FixedScorer("Good"), &input).expect("score");
    assert_eq!(response.credit_score, 650);
    assert_eq!(response.rating, CreditRating::Good);
    assert_eq!(response.rating_color, "#44aa44");
    assert_eq!(response.loan_to_income_ratio, 2.5);
}

#[test]
fn validation_failure_maps_to_unprocessable() {
    let input = ApplicationInput {
        age: 16,
        ..ApplicationInput::default()
    };
    let err = score_application(&FixedScorer("Good"), &input).expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "Age must be at least 18 years.");
    assert_eq!(status_for(err.code), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn scorer_failure_maps_to_bad_gateway() {
    let err = score_application(
        &UnavailableScorer::new("no artifact"),
        &ApplicationInput::default(),
    )
    .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::ScoringFailed);
    assert!(err.message.contains("no artifact"));
    assert_eq!(status_for(err.code), StatusCode::BAD_GATEWAY);
}

#[test]
fn builtin_model_scores_through_api() {
    let scorer = LogisticScorer::builtin().expect("builtin");
    let response =
        score_application(&scorer, &ApplicationInput::default()).expect("score");
    assert!((0.0..=1.0).contains(&response.probability));
    assert_ne!(response.rating_color, "#666666");
}

#[test]
fn out_of_range_input_is_rejected_before_scoring() {
    let input = ApplicationInput {
        age: 250,
        num_open_accounts: 40,
        delinquency_ratio: 900,
        ..ApplicationInput::default()
    };
    let err = score_application(&FixedScorer("Good"), &input).expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Validation);
    assert_eq!(err.message, "Age must be between 18 and 100.");
    assert_eq!(status_for(err.code), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn error_codes_serialize_in_snake_case() {
    let codes = [ErrorCode::Validation, ErrorCode::ScoringFailed];
    let wire: Vec<String> = codes
        .iter()
        .map(|code| serde_json::to_string(code).expect("json"))
        .collect();
    assert_eq!(wire, ["\"validation\"", "\"scoring_failed\""]);
    assert_ne!(status_for(codes[0]), status_for(codes[1]));
}
