//! Form commands and the submission path from session state to a scored
//! result.

use std::{collections::HashMap, str::FromStr};

use scoring::{Scorer, ScoringError};
use shared::{
    domain::{ApplicationInput, RiskResult},
    error::ValidationError,
};
use tracing::{info, warn};

use crate::session::SessionState;

pub const RESET_CONFIRMATION: &str = "All fields have been reset to default values!";
pub const SCORED_CONFIRMATION: &str = "Credit risk analysis completed successfully!";
pub const SCORING_HINT: &str =
    "Please check the scoring model configuration and ensure its artifacts are available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Calculate,
    Reset,
    Update,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "calculate" => Ok(Command::Calculate),
            "reset" => Ok(Command::Reset),
            "update" | "" => Ok(Command::Update),
            other => Err(format!("unknown form action '{other}'")),
        }
    }
}

#[derive(Debug)]
pub enum Submission {
    Rejected(ValidationError),
    Scored(RiskResult),
    Failed(ScoringError),
}

/// What the last command did, consumed by the view.
#[derive(Debug)]
pub enum Outcome {
    Idle,
    Edited,
    Reset,
    Submitted(Submission),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Info(String),
}

impl Outcome {
    pub fn result(&self) -> Option<&RiskResult> {
        match self {
            Outcome::Submitted(Submission::Scored(result)) => Some(result),
            _ => None,
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        match self {
            Outcome::Idle | Outcome::Edited => Vec::new(),
            Outcome::Reset => vec![Notice::Success(RESET_CONFIRMATION.to_string())],
            Outcome::Submitted(Submission::Rejected(err)) => vec![Notice::Error(err.to_string())],
            Outcome::Submitted(Submission::Scored(_)) => {
                vec![Notice::Success(SCORED_CONFIRMATION.to_string())]
            }
            Outcome::Submitted(Submission::Failed(err)) => vec![
                Notice::Error(scoring_failure_message(err)),
                Notice::Info(SCORING_HINT.to_string()),
            ],
        }
    }
}

/// Every scoring failure currently shares one user-facing message shape.
pub fn scoring_failure_message(err: &ScoringError) -> String {
    format!("Error during prediction: {err}")
}

/// Validates and scores one application. The scorer is not called when
/// validation fails.
pub fn submit(scorer: &dyn Scorer, input: &ApplicationInput) -> Submission {
    if let Err(err) = input.validate() {
        info!(reason = %err, "application rejected");
        return Submission::Rejected(err);
    }
    match scorer.predict(input) {
        Ok(result) => {
            info!(
                probability = result.probability,
                credit_score = result.credit_score,
                rating = %result.rating,
                "application scored"
            );
            Submission::Scored(result)
        }
        Err(err) => {
            warn!(error = %err, "scoring failed");
            Submission::Failed(err)
        }
    }
}

pub fn apply(
    session: &mut SessionState,
    command: Command,
    form: &HashMap<String, String>,
    scorer: &dyn Scorer,
) -> Outcome {
    match command {
        Command::Update => {
            session.apply_form(form);
            Outcome::Edited
        }
        Command::Reset => {
            session.reset();
            info!(reset_epoch = session.reset_epoch(), "form reset");
            Outcome::Reset
        }
        Command::Calculate => {
            session.apply_form(form);
            Outcome::Submitted(submit(scorer, &session.application()))
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
