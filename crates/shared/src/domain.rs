use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! option_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| UnknownOption {
                        kind: stringify!($name),
                        value: raw.to_string(),
                    })
            }
        }
    };
}

option_enum!(ResidenceType { Owned, Rented, Mortgage });
option_enum!(LoanPurpose { Education, Home, Auto, Personal });
option_enum!(LoanType { Unsecured, Secured });

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} option: {value:?}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Applicant attributes collected by the form, in the order the scorer consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInput {
    pub age: i64,
    pub income: f64,
    pub loan_amount: f64,
    pub loan_tenure_months: i64,
    pub avg_dpd_per_delinquency: f64,
    pub delinquency_ratio: i64,
    pub credit_utilization_ratio: i64,
    pub num_open_accounts: i64,
    pub residence_type: ResidenceType,
    pub loan_purpose: LoanPurpose,
    pub loan_type: LoanType,
}

impl Default for ApplicationInput {
    fn default() -> Self {
        Self {
            age: 28,
            income: 1_200_000.0,
            loan_amount: 2_560_000.0,
            loan_tenure_months: 36,
            avg_dpd_per_delinquency: 20.0,
            delinquency_ratio: 30,
            credit_utilization_ratio: 30,
            num_open_accounts: 2,
            residence_type: ResidenceType::Owned,
            loan_purpose: LoanPurpose::Education,
            loan_type: LoanType::Unsecured,
        }
    }
}

impl ApplicationInput {
    pub fn loan_to_income_ratio(&self) -> f64 {
        loan_to_income_ratio(self.loan_amount, self.income)
    }

    /// Fail-fast checks run before any scoring call. Order matters: the first
    /// failing rule is the one reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.age < 18 {
            return Err(ValidationError::AgeBelowMinimum);
        }
        if self.income <= 0.0 {
            return Err(ValidationError::IncomeNotPositive);
        }
        if self.loan_amount <= 0.0 {
            return Err(ValidationError::LoanAmountNotPositive);
        }
        self.check_ranges()
    }

    /// Widget bounds for callers that bypass the form (JSON API, CLI).
    fn check_ranges(&self) -> Result<(), ValidationError> {
        let checks = [
            ("Age", self.age as f64, AGE_BOUNDS),
            ("Loan tenure", self.loan_tenure_months as f64, TENURE_BOUNDS),
            ("Avg DPD", self.avg_dpd_per_delinquency, DPD_BOUNDS),
            ("Delinquency ratio", self.delinquency_ratio as f64, PERCENT_BOUNDS),
            ("Credit utilization ratio", self.credit_utilization_ratio as f64, PERCENT_BOUNDS),
            ("Open loan accounts", self.num_open_accounts as f64, OPEN_ACCOUNT_BOUNDS),
        ];
        for (field, value, bounds) in checks {
            if !bounds.contains(value) {
                return Err(ValidationError::OutOfRange { field, bounds });
            }
        }
        Ok(())
    }
}

/// Inclusive range accepted for a numeric input. `max: None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: i64,
    pub max: Option<i64>,
}

impl Bounds {
    pub fn contains(self, value: f64) -> bool {
        value >= self.min as f64 && self.max.map_or(true, |max| value <= max as f64)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "between {} and {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

pub const AGE_BOUNDS: Bounds = Bounds { min: 18, max: Some(100) };
pub const TENURE_BOUNDS: Bounds = Bounds { min: 1, max: None };
pub const DPD_BOUNDS: Bounds = Bounds { min: 0, max: None };
pub const PERCENT_BOUNDS: Bounds = Bounds { min: 0, max: Some(100) };
pub const OPEN_ACCOUNT_BOUNDS: Bounds = Bounds { min: 1, max: Some(4) };

/// Zero when income is not positive or the quotient is not finite.
pub fn loan_to_income_ratio(loan_amount: f64, income: f64) -> f64 {
    if income > 0.0 {
        Some(loan_amount / income)
            .filter(|ratio| ratio.is_finite())
            .unwrap_or(0.0)
    } else {
        0.0
    }
}

/// Rating label produced by a scorer. Labels outside the four known bands are
/// kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CreditRating {
    Poor,
    Average,
    Good,
    Excellent,
    Unrecognized(String),
}

pub const NEUTRAL_RATING_COLOR: &str = "#666666";

impl CreditRating {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Poor" => Self::Poor,
            "Average" => Self::Average,
            "Good" => Self::Good,
            "Excellent" => Self::Excellent,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Poor => "Poor",
            Self::Average => "Average",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Poor => "#ff4444",
            Self::Average => "#ff8800",
            Self::Good => "#44aa44",
            Self::Excellent => "#00aa44",
            Self::Unrecognized(_) => NEUTRAL_RATING_COLOR,
        }
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CreditRating {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CreditRating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub probability: f64,
    pub credit_score: i64,
    pub rating: CreditRating,
}

impl RiskResult {
    /// Default probability as a percentage with one decimal, e.g. `42.0%`.
    pub fn probability_percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
