use super::*;
use shared::domain::ApplicationInput;
use std::io::Write;

#[test]
fn score_bands_follow_rating_boundaries() {
    assert_eq!(rating_for_score(300), CreditRating::Poor);
    assert_eq!(rating_for_score(499), CreditRating::Poor);
    assert_eq!(rating_for_score(500), CreditRating::Average);
    assert_eq!(rating_for_score(649), CreditRating::Average);
    assert_eq!(rating_for_score(650), CreditRating::Good);
    assert_eq!(rating_for_score(749), CreditRating::Good);
    assert_eq!(rating_for_score(750), CreditRating::Excellent);
    assert_eq!(rating_for_score(900), CreditRating::Excellent);
    assert_eq!(
        rating_for_score(901),
        CreditRating::Unrecognized("Undefined".into())
    );
}

#[test]
fn probability_maps_onto_score_range() {
    assert_eq!(credit_score_for_probability(0.0), 900);
    assert_eq!(credit_score_for_probability(1.0), 300);
    assert_eq!(credit_score_for_probability(0.5), 600);
    assert_eq!(credit_score_for_probability(0.42), 648);
}

#[test]
fn builtin_model_scores_default_application() {
    let scorer = LogisticScorer::builtin().expect("builtin model");
    let result = scorer
        .predict(&ApplicationInput::default())
        .expect("prediction");
    assert!((0.0..=1.0).contains(&result.probability));
    assert!((MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&result.credit_score));
    assert_eq!(result.rating, rating_for_score(result.credit_score));
}

#[test]
fn higher_delinquency_raises_default_probability() {
    let scorer = LogisticScorer::builtin().expect("builtin model");
    let low = scorer
        .predict(&ApplicationInput {
            delinquency_ratio: 5,
            ..ApplicationInput::default()
        })
        .expect("low");
    let high = scorer
        .predict(&ApplicationInput {
            delinquency_ratio: 95,
            ..ApplicationInput::default()
        })
        .expect("high");
    assert!(high.probability > low.probability);
    assert!(high.credit_score <= low.credit_score);
}

#[test]
fn feature_vector_encodes_categoricals_against_baselines() {
    let input = ApplicationInput {
        residence_type: shared::domain::ResidenceType::Mortgage,
        loan_purpose: shared::domain::LoanPurpose::Auto,
        loan_type: shared::domain::LoanType::Secured,
        ..ApplicationInput::default()
    };
    let features = FeatureVector::from_input(&input);
    for name in &FEATURE_NAMES[NUMERIC_FEATURES.len()..] {
        assert_eq!(features.get(name), Some(0.0), "{name}");
    }
    assert_eq!(
        features.get("loan_to_income"),
        Some(input.loan_to_income_ratio())
    );
    assert_eq!(features.get("missing"), None);
}

#[test]
fn artifact_round_trips_through_scorer() {
    let artifact = ModelArtifact::builtin().expect("artifact");
    let scorer = LogisticScorer::from_artifact(artifact.clone()).expect("scorer");
    assert_eq!(scorer.to_artifact(), artifact);
}

#[test]
fn artifact_missing_weight_is_rejected() {
    let mut artifact = ModelArtifact::builtin().expect("artifact");
    artifact.weights.remove("age");
    let err = LogisticScorer::from_artifact(artifact).expect_err("should fail");
    assert!(matches!(err, ScoringError::InvalidModel(ref msg) if msg.contains("age")));
}

#[test]
fn artifact_unknown_feature_is_rejected() {
    let mut artifact = ModelArtifact::builtin().expect("artifact");
    artifact.weights.insert("shoe_size".into(), 1.0);
    let err = LogisticScorer::from_artifact(artifact).expect_err("should fail");
    assert!(matches!(err, ScoringError::InvalidModel(_)));
}

#[test]
fn artifact_inverted_scaling_is_rejected() {
    let mut artifact = ModelArtifact::builtin().expect("artifact");
    artifact
        .scaling
        .insert("age".into(), Scaling { min: 70.0, max: 18.0 });
    let err = LogisticScorer::from_artifact(artifact).expect_err("should fail");
    assert!(matches!(err, ScoringError::InvalidModel(_)));
}

#[test]
fn missing_artifact_file_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = LogisticScorer::from_path(&dir.path().join("absent.json")).expect_err("should fail");
    assert!(matches!(err, ScoringError::ModelUnavailable(_)));
}

#[test]
fn artifact_loads_from_disk() {
    let artifact = ModelArtifact::builtin().expect("artifact");
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(serde_json::to_string(&artifact).expect("json").as_bytes())
        .expect("write");
    let scorer = LogisticScorer::from_path(file.path()).expect("scorer");
    assert_eq!(scorer.to_artifact(), artifact);
}

#[test]
fn malformed_artifact_file_is_invalid() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"{ not json").expect("write");
    let err = LogisticScorer::from_path(file.path()).expect_err("should fail");
    assert!(matches!(err, ScoringError::InvalidModel(_)));
}

#[test]
fn non_finite_input_is_rejected() {
    let scorer = LogisticScorer::builtin().expect("builtin model");
    let err = scorer
        .predict(&ApplicationInput {
            income: f64::NAN,
            ..ApplicationInput::default()
        })
        .expect_err("should fail");
    assert!(matches!(err, ScoringError::InvalidInput(ref msg) if msg.contains("income")));
}

#[test]
fn unavailable_scorer_reports_reason() {
    let scorer = UnavailableScorer::new("model.json not found");
    let err = scorer
        .predict(&ApplicationInput::default())
        .expect_err("should fail");
    assert_eq!(err.to_string(), "model unavailable: model.json not found");
}
