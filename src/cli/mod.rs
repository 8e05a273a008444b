//! Command-line parsing for the loan default scorer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading/scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BorrowerProfile, EmploymentType, field_index};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ldr", version, about = "Loan default risk scorer")]
pub struct Cli {
    /// Classifier artifact JSON (env: LDR_MODEL_PATH).
    #[arg(long, global = true, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Decision threshold file (env: LDR_THRESHOLD_PATH).
    #[arg(long, global = true, value_name = "TXT")]
    pub threshold: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive borrower form.
    Tui,
    /// Score one borrower and print the probability of default.
    Score(ScoreArgs),
    /// Show the loaded classifier, threshold, and feature schema.
    Info,
    /// Write a request JSON holding the form defaults.
    Template(TemplateArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    /// Read the request from a JSON object instead of flags (not clamped).
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Debug, Args, Clone)]
pub struct TemplateArgs {
    /// Output path (prints to stdout when omitted).
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}

/// Borrower fields; anything omitted keeps the form default.
///
/// Values are clamped into the form ranges before scoring.
#[derive(Debug, Args, Clone, Default)]
pub struct ProfileArgs {
    /// Disbursed amount (₹), 1000..=5000000.
    #[arg(long, value_parser = finite_f64)]
    pub disbursed_amount: Option<f64>,
    /// Asset cost (₹), 10000..=10000000.
    #[arg(long, value_parser = finite_f64)]
    pub asset_cost: Option<f64>,
    /// Loan-to-value ratio (%), 10..=120.
    #[arg(long, value_parser = finite_f64)]
    pub ltv: Option<f64>,
    /// Customer age, 18..=80.
    #[arg(long, value_parser = finite_f64)]
    pub age: Option<f64>,
    /// Loan age (days), 0..=5000.
    #[arg(long, value_parser = finite_f64)]
    pub loan_age_days: Option<f64>,
    /// Employment type.
    #[arg(long, value_enum)]
    pub employment: Option<EmploymentType>,
    /// Credit bureau score, 0..=900.
    #[arg(long, value_parser = finite_f64)]
    pub cns_score: Option<f64>,
    /// Enquiries in the last 6 months, 0..=50.
    #[arg(long, value_parser = finite_f64)]
    pub inquiries: Option<f64>,
    /// Delinquent accounts in the last 6 months, 0..=20.
    #[arg(long, value_parser = finite_f64)]
    pub delinquent_accts: Option<f64>,
    /// Primary number of accounts, 0..=50.
    #[arg(long, value_parser = finite_f64)]
    pub pri_accts: Option<f64>,
    /// Primary active accounts, 0..=50.
    #[arg(long, value_parser = finite_f64)]
    pub pri_active_accts: Option<f64>,
    /// Primary overdue accounts, 0..=20.
    #[arg(long, value_parser = finite_f64)]
    pub pri_overdue_accts: Option<f64>,
    /// Primary sanctioned amount, 0..=10000000.
    #[arg(long, value_parser = finite_f64)]
    pub pri_sanctioned_amount: Option<f64>,
    /// Primary disbursed amount, 0..=10000000.
    #[arg(long, value_parser = finite_f64)]
    pub pri_disbursed_amount: Option<f64>,
    /// Credit history length (months), 0..=500.
    #[arg(long, value_parser = finite_f64)]
    pub credit_history_months: Option<f64>,
    /// Average account age (months), 0..=500.
    #[arg(long, value_parser = finite_f64)]
    pub avg_acct_age_months: Option<f64>,
    /// State ID, 1..=50.
    #[arg(long, value_parser = finite_f64)]
    pub state_id: Option<f64>,
    /// Current pincode ID, 100000..=999999.
    #[arg(long, value_parser = finite_f64)]
    pub pincode_id: Option<f64>,
}

impl ProfileArgs {
    /// Numeric overrides keyed by training-schema feature name.
    fn numeric_overrides(&self) -> [(&'static str, Option<f64>); 17] {
        [
            ("disbursed_amount", self.disbursed_amount),
            ("asset_cost", self.asset_cost),
            ("ltv", self.ltv),
            ("Age", self.age),
            ("Loan_Age_Days", self.loan_age_days),
            ("PERFORM_CNS.SCORE", self.cns_score),
            ("NO.OF_INQUIRIES", self.inquiries),
            ("DELINQUENT.ACCTS.IN.LAST.SIX.MONTHS", self.delinquent_accts),
            ("PRI.NO.OF.ACCTS", self.pri_accts),
            ("PRI.ACTIVE.ACCTS", self.pri_active_accts),
            ("PRI.OVERDUE.ACCTS", self.pri_overdue_accts),
            ("PRI.SANCTIONED.AMOUNT", self.pri_sanctioned_amount),
            ("PRI.DISBURSED.AMOUNT", self.pri_disbursed_amount),
            ("CREDIT.HISTORY.LENGTH_MONTHS", self.credit_history_months),
            ("AVERAGE.ACCT.AGE_MONTHS", self.avg_acct_age_months),
            ("State_ID", self.state_id),
            ("Current_pincode_ID", self.pincode_id),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.employment.is_none() && self.numeric_overrides().iter().all(|(_, v)| v.is_none())
    }

    /// Form defaults with the given flags applied, then clamped.
    pub fn to_profile(&self) -> BorrowerProfile {
        let mut profile = BorrowerProfile::default();
        for (name, value) in self.numeric_overrides() {
            if let (Some(v), Some(idx)) = (value, field_index(name)) {
                profile.set_raw_number(idx, v);
            }
        }
        if let Some(e) = self.employment {
            profile.set_employment(e);
        }
        profile.clamped()
    }
}

/// Parse a borrower field value; NaN and infinities are usage errors.
fn finite_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("invalid number '{s}': {e}"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EMPLOYMENT_FIELD;

    #[test]
    fn flags_map_onto_schema_fields_and_clamp() {
        let cli = Cli::parse_from([
            "ldr",
            "score",
            "--age",
            "95",
            "--cns-score",
            "720",
            "--employment",
            "self-employed",
        ]);
        let Command::Score(args) = cli.command else {
            panic!("expected score command");
        };
        let profile = args.profile.to_profile();
        assert_eq!(profile.number("Age"), Some(80.0));
        assert_eq!(profile.number("PERFORM_CNS.SCORE"), Some(720.0));
        assert_eq!(profile.employment(), EmploymentType::SelfEmployed);
        assert!(!args.profile.is_empty());
    }

    #[test]
    fn non_finite_flag_values_are_usage_errors() {
        for bad in ["NaN", "nan", "inf", "-inf"] {
            let err = Cli::try_parse_from(["ldr", "score", "--age", bad]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
            assert_eq!(err.exit_code(), 2);
        }
        assert!(Cli::try_parse_from(["ldr", "score", "--ltv", "82.5"]).is_ok());
    }

    #[test]
    fn every_override_names_a_numeric_form_field() {
        let args = ProfileArgs::default();
        for (name, _) in args.numeric_overrides() {
            assert!(field_index(name).is_some(), "unknown field {name}");
            assert_ne!(name, EMPLOYMENT_FIELD);
        }
        assert!(args.is_empty());
    }

    #[test]
    fn global_paths_parse_after_subcommand() {
        let cli = Cli::parse_from(["ldr", "info", "--model", "m.json", "--threshold", "t.txt"]);
        assert_eq!(cli.model, Some(PathBuf::from("m.json")));
        assert_eq!(cli.threshold, Some(PathBuf::from("t.txt")));
    }
}
