//! Widget definitions for the eleven application inputs.

use serde::{Deserialize, Serialize};
use shared::domain::{
    ApplicationInput, Bounds, LoanPurpose, LoanType, ResidenceType, AGE_BOUNDS, DPD_BOUNDS,
    OPEN_ACCOUNT_BOUNDS, PERCENT_BOUNDS, TENURE_BOUNDS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    Income,
    LoanAmount,
    LoanTenureMonths,
    AvgDpdPerDelinquency,
    DelinquencyRatio,
    CreditUtilizationRatio,
    NumOpenAccounts,
    ResidenceType,
    LoanPurpose,
    LoanType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Integer { min: i64, max: Option<i64> },
    Number { min: f64 },
    Choice { options: &'static [&'static str] },
}

const RESIDENCE_OPTIONS: &[&str] = &["Owned", "Rented", "Mortgage"];
const PURPOSE_OPTIONS: &[&str] = &["Education", "Home", "Auto", "Personal"];
const LOAN_TYPE_OPTIONS: &[&str] = &["Unsecured", "Secured"];

/// A widget's current value. Numbers are always stored already clamped into
/// the widget's bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WidgetValue {
    Integer(i64),
    Number(f64),
    Choice(String),
}

impl WidgetValue {
    pub fn display(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Number(v) => v.to_string(),
            Self::Choice(v) => v.clone(),
        }
    }
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Age,
        Field::Income,
        Field::LoanAmount,
        Field::LoanTenureMonths,
        Field::AvgDpdPerDelinquency,
        Field::DelinquencyRatio,
        Field::CreditUtilizationRatio,
        Field::NumOpenAccounts,
        Field::ResidenceType,
        Field::LoanPurpose,
        Field::LoanType,
    ];

    /// Stable prefix of the widget's storage key.
    pub fn key(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Income => "income",
            Field::LoanAmount => "loan_amount",
            Field::LoanTenureMonths => "tenure",
            Field::AvgDpdPerDelinquency => "dpd",
            Field::DelinquencyRatio => "delinq_ratio",
            Field::CreditUtilizationRatio => "credit_util",
            Field::NumOpenAccounts => "open_accounts",
            Field::ResidenceType => "residence",
            Field::LoanPurpose => "purpose",
            Field::LoanType => "type",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Income => "Income",
            Field::LoanAmount => "Loan Amount",
            Field::LoanTenureMonths => "Loan Tenure (months)",
            Field::AvgDpdPerDelinquency => "Avg DPD",
            Field::DelinquencyRatio => "Delinquency Ratio",
            Field::CreditUtilizationRatio => "Credit Utilization Ratio",
            Field::NumOpenAccounts => "Open Loan Accounts",
            Field::ResidenceType => "Residence Type",
            Field::LoanPurpose => "Loan Purpose",
            Field::LoanType => "Loan Type",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Field::Age => "Enter your current age (18-100 years)",
            Field::Income => "Enter your annual income",
            Field::LoanAmount => "Enter the requested loan amount",
            Field::LoanTenureMonths => "Loan tenure in months",
            Field::AvgDpdPerDelinquency => "Average Days Past Due per delinquency",
            Field::DelinquencyRatio => "Delinquency ratio percentage",
            Field::CreditUtilizationRatio => "Credit utilization percentage",
            Field::NumOpenAccounts => "Number of open loan accounts",
            Field::ResidenceType => "Type of residence",
            Field::LoanPurpose => "Purpose of the loan",
            Field::LoanType => "Type of loan (secured/unsecured)",
        }
    }

    pub fn kind(self) -> FieldKind {
        let integer = |bounds: Bounds| FieldKind::Integer {
            min: bounds.min,
            max: bounds.max,
        };
        match self {
            Field::Age => integer(AGE_BOUNDS),
            Field::Income | Field::LoanAmount => FieldKind::Number { min: 0.0 },
            Field::AvgDpdPerDelinquency => FieldKind::Number {
                min: DPD_BOUNDS.min as f64,
            },
            Field::LoanTenureMonths => integer(TENURE_BOUNDS),
            Field::DelinquencyRatio | Field::CreditUtilizationRatio => integer(PERCENT_BOUNDS),
            Field::NumOpenAccounts => integer(OPEN_ACCOUNT_BOUNDS),
            Field::ResidenceType => FieldKind::Choice {
                options: RESIDENCE_OPTIONS,
            },
            Field::LoanPurpose => FieldKind::Choice {
                options: PURPOSE_OPTIONS,
            },
            Field::LoanType => FieldKind::Choice {
                options: LOAN_TYPE_OPTIONS,
            },
        }
    }

    pub fn default_value(self) -> WidgetValue {
        let defaults = ApplicationInput::default();
        match self {
            Field::Age => WidgetValue::Integer(defaults.age),
            Field::Income => WidgetValue::Number(defaults.income),
            Field::LoanAmount => WidgetValue::Number(defaults.loan_amount),
            Field::LoanTenureMonths => WidgetValue::Integer(defaults.loan_tenure_months),
            Field::AvgDpdPerDelinquency => WidgetValue::Number(defaults.avg_dpd_per_delinquency),
            Field::DelinquencyRatio => WidgetValue::Integer(defaults.delinquency_ratio),
            Field::CreditUtilizationRatio => {
                WidgetValue::Integer(defaults.credit_utilization_ratio)
            }
            Field::NumOpenAccounts => WidgetValue::Integer(defaults.num_open_accounts),
            Field::ResidenceType => WidgetValue::Choice(defaults.residence_type.to_string()),
            Field::LoanPurpose => WidgetValue::Choice(defaults.loan_purpose.to_string()),
            Field::LoanType => WidgetValue::Choice(defaults.loan_type.to_string()),
        }
    }

    /// Parses a posted value the way the widget would accept it. Returns `None`
    /// when the text is not usable, in which case the caller keeps the old value.
    pub fn parse(self, raw: &str) -> Option<WidgetValue> {
        let raw = raw.trim();
        match self.kind() {
            FieldKind::Integer { min, max } => {
                let value = match raw.parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => {
                        let v = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
                        v.round() as i64
                    }
                };
                let value = value.max(min);
                let value = max.map_or(value, |max| value.min(max));
                Some(WidgetValue::Integer(value))
            }
            FieldKind::Number { min } => {
                let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
                Some(WidgetValue::Number(value.max(min)))
            }
            FieldKind::Choice { options } => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(raw))
                .map(|option| WidgetValue::Choice(option.to_string())),
        }
    }
}

/// Collects the eleven widget values into an application. Values of the wrong
/// shape fall back to the field default.
pub fn application_from(value_of: impl Fn(Field) -> WidgetValue) -> ApplicationInput {
    let integer = |field: Field| match value_of(field) {
        WidgetValue::Integer(v) => v,
        _ => match field.default_value() {
            WidgetValue::Integer(v) => v,
            _ => 0,
        },
    };
    let number = |field: Field| match value_of(field) {
        WidgetValue::Number(v) => v,
        WidgetValue::Integer(v) => v as f64,
        WidgetValue::Choice(_) => match field.default_value() {
            WidgetValue::Number(v) => v,
            _ => 0.0,
        },
    };
    let choice = |field: Field| match value_of(field) {
        WidgetValue::Choice(v) => v,
        _ => field.default_value().display(),
    };

    let defaults = ApplicationInput::default();
    ApplicationInput {
        age: integer(Field::Age),
        income: number(Field::Income),
        loan_amount: number(Field::LoanAmount),
        loan_tenure_months: integer(Field::LoanTenureMonths),
        avg_dpd_per_delinquency: number(Field::AvgDpdPerDelinquency),
        delinquency_ratio: integer(Field::DelinquencyRatio),
        credit_utilization_ratio: integer(Field::CreditUtilizationRatio),
        num_open_accounts: integer(Field::NumOpenAccounts),
        residence_type: choice(Field::ResidenceType)
            .parse::<ResidenceType>()
            .unwrap_or(defaults.residence_type),
        loan_purpose: choice(Field::LoanPurpose)
            .parse::<LoanPurpose>()
            .unwrap_or(defaults.loan_purpose),
        loan_type: choice(Field::LoanType)
            .parse::<LoanType>()
            .unwrap_or(defaults.loan_type),
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
