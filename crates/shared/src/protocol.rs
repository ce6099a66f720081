use serde::{Deserialize, Serialize};

use crate::domain::{loan_to_income_ratio, ApplicationInput, CreditRating, RiskResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub probability: f64,
    pub credit_score: i64,
    pub rating: CreditRating,
    pub rating_color: String,
    pub loan_to_income_ratio: f64,
}

impl ScoreResponse {
    pub fn new(input: &ApplicationInput, result: RiskResult) -> Self {
        Self {
            probability: result.probability,
            credit_score: result.credit_score,
            rating_color: result.rating.color().to_string(),
            rating: result.rating,
            loan_to_income_ratio: input.loan_to_income_ratio(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioQuery {
    pub income: f64,
    pub loan_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioResponse {
    pub loan_to_income_ratio: f64,
}

impl From<RatioQuery> for RatioResponse {
    fn from(query: RatioQuery) -> Self {
        Self {
            loan_to_income_ratio: loan_to_income_ratio(query.loan_amount, query.income),
        }
    }
}
