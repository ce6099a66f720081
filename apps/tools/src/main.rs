use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use scoring::{LogisticScorer, Scorer};
use shared::{
    domain::{ApplicationInput, LoanPurpose, LoanType, ResidenceType},
    protocol::ScoreResponse,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Model artifact to load instead of the built-in one.
    #[arg(long)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a single application and print the result as JSON.
    Score(ScoreArgs),
    /// Print the active model artifact as JSON.
    ExportModel,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    #[arg(long, default_value_t = 28)]
    age: i64,
    #[arg(long, default_value_t = 1_200_000.0)]
    income: f64,
    #[arg(long, default_value_t = 2_560_000.0)]
    loan_amount: f64,
    #[arg(long, default_value_t = 36)]
    loan_tenure_months: i64,
    #[arg(long, default_value_t = 20.0)]
    avg_dpd_per_delinquency: f64,
    #[arg(long, default_value_t = 30)]
    delinquency_ratio: i64,
    #[arg(long, default_value_t = 30)]
    credit_utilization_ratio: i64,
    #[arg(long, default_value_t = 2)]
    num_open_accounts: i64,
    #[arg(long, default_value = "Owned")]
    residence_type: ResidenceType,
    #[arg(long, default_value = "Education")]
    loan_purpose: LoanPurpose,
    #[arg(long, default_value = "Unsecured")]
    loan_type: LoanType,
}

impl From<ScoreArgs> for ApplicationInput {
    fn from(args: ScoreArgs) -> Self {
        Self {
            age: args.age,
            income: args.income,
            loan_amount: args.loan_amount,
            loan_tenure_months: args.loan_tenure_months,
            avg_dpd_per_delinquency: args.avg_dpd_per_delinquency,
            delinquency_ratio: args.delinquency_ratio,
            credit_utilization_ratio: args.credit_utilization_ratio,
            num_open_accounts: args.num_open_accounts,
            residence_type: args.residence_type,
            loan_purpose: args.loan_purpose,
            loan_type: args.loan_type,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scorer = match &cli.model {
        Some(path) => LogisticScorer::from_path(path)
            .with_context(|| format!("failed to load model '{}'", path.display()))?,
        None => LogisticScorer::builtin().context("failed to load built-in model")?,
    };

    match cli.command {
        Command::Score(args) => {
            let input = ApplicationInput::from(args);
            if let Err(err) = input.validate() {
                bail!("{err}");
            }
            let result = scorer.predict(&input)?;
            let response = ScoreResponse::new(&input, result);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::ExportModel => {
            println!("{}", serde_json::to_string_pretty(&scorer.to_artifact())?);
        }
    }

    Ok(())
}
