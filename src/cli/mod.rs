//! Command-line parsing for the credit-risk client.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! workflow code: commands only translate flags into form edits.

use std::path::PathBuf;

use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Args, Parser, Subcommand};

use crate::config::Overrides;
use crate::domain::FieldKey;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "credit-risk",
    version,
    about = "Loan application risk assessment client"
)]
pub struct Cli {
    /// Base URL of the scoring service (overrides CREDIT_RISK_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// HTTP request timeout in seconds (overrides CREDIT_RISK_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive application form (default).
    Tui(TuiArgs),
    /// Score one application given on the command line and print the assessment.
    Score(ScoreArgs),
    /// List the application fields, their defaults, and legal choices.
    Fields,
    /// Show the resolved scoring endpoint and API documentation URL.
    Info,
}

#[derive(Debug, Clone, Args)]
pub struct TuiArgs {
    /// Append logs to this file (the terminal is owned by the UI).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Application values for `credit-risk score`.
///
/// Omitted fields keep their form defaults; numeric fields default to empty
/// and are reported as invalid when missing.
#[derive(Debug, Clone, Args)]
pub struct ScoreArgs {
    /// Annual income (USD).
    #[arg(long, allow_hyphen_values = true)]
    pub income: Option<String>,

    /// Loan amount (USD).
    #[arg(long, allow_hyphen_values = true)]
    pub loan_amount: Option<String>,

    /// Existing debt (USD).
    #[arg(long, allow_hyphen_values = true)]
    pub existing_debt: Option<String>,

    /// Loan term in months.
    #[arg(long, value_parser = registry_choices(FieldKey::LoanTermMonths))]
    pub loan_term: Option<String>,

    /// Credit history length in months.
    #[arg(long, allow_hyphen_values = true)]
    pub credit_history: Option<String>,

    /// Employment status.
    #[arg(long, value_parser = registry_choices(FieldKey::EmploymentStatus))]
    pub employment: Option<String>,

    /// Education level.
    #[arg(long, value_parser = registry_choices(FieldKey::Education))]
    pub education: Option<String>,

    /// Property area.
    #[arg(long, value_parser = registry_choices(FieldKey::PropertyArea))]
    pub property_area: Option<String>,

    /// Number of dependents.
    #[arg(long, value_parser = registry_choices(FieldKey::Dependents))]
    pub dependents: Option<String>,

    /// Print the raw result as JSON instead of the formatted report.
    #[arg(long)]
    pub json: bool,
}

impl ScoreArgs {
    /// Field edits implied by the flags that were given.
    pub fn field_values(&self) -> Vec<(FieldKey, String)> {
        let pairs = [
            (FieldKey::ApplicantIncome, &self.income),
            (FieldKey::LoanAmount, &self.loan_amount),
            (FieldKey::ExistingDebt, &self.existing_debt),
            (FieldKey::LoanTermMonths, &self.loan_term),
            (FieldKey::CreditHistoryMonths, &self.credit_history),
            (FieldKey::EmploymentStatus, &self.employment),
            (FieldKey::Education, &self.education),
            (FieldKey::PropertyArea, &self.property_area),
            (FieldKey::Dependents, &self.dependents),
        ];
        pairs
            .into_iter()
            .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
            .collect()
    }
}

/// Legal values of an enumerated field, labelled for `--help`.
fn registry_choices(key: FieldKey) -> PossibleValuesParser {
    PossibleValuesParser::new(
        key.spec()
            .choices
            .iter()
            .map(|c| PossibleValue::new(c.value).help(c.label)),
    )
}

/// Rewrite argv so `credit-risk` defaults to `credit-risk tui`.
///
/// Rules:
/// - `credit-risk`                     -> `credit-risk tui`
/// - `credit-risk --log-file x ...`    -> `credit-risk tui --log-file x ...`
/// - `credit-risk --help/--version/-h` -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let has_subcommand = argv
        .iter()
        .skip(1)
        .any(|a| matches!(a.as_str(), "tui" | "score" | "fields" | "info"));
    if has_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(args(&["credit-risk"])), args(&["credit-risk", "tui"]));
        assert_eq!(
            rewrite_args(args(&["credit-risk", "--log-file", "x.log"])),
            args(&["credit-risk", "tui", "--log-file", "x.log"])
        );
    }

    #[test]
    fn explicit_commands_are_untouched() {
        let argv = args(&["credit-risk", "--api-url", "http://localhost:8000", "score"]);
        assert_eq!(rewrite_args(argv.clone()), argv);
        let argv = args(&["credit-risk", "--help"]);
        assert_eq!(rewrite_args(argv.clone()), argv);
    }

    #[test]
    fn score_flags_map_to_fields() {
        let cli = Cli::parse_from(args(&[
            "credit-risk",
            "score",
            "--income",
            "50000",
            "--loan-amount",
            "150000",
            "--education",
            "not_graduate",
            "--json",
        ]));
        let Command::Score(score) = cli.command else {
            panic!("expected score command");
        };
        assert!(score.json);
        assert_eq!(
            score.field_values(),
            vec![
                (FieldKey::ApplicantIncome, "50000".to_string()),
                (FieldKey::LoanAmount, "150000".to_string()),
                (FieldKey::Education, "not_graduate".to_string()),
            ]
        );
    }

    #[test]
    fn choice_flags_reject_unknown_values() {
        let res = Cli::try_parse_from(args(&["credit-risk", "score", "--property-area", "moon"]));
        assert!(res.is_err());
    }

    #[test]
    fn choice_flags_accept_every_registry_value() {
        for (flag, key) in [
            ("--loan-term", FieldKey::LoanTermMonths),
            ("--employment", FieldKey::EmploymentStatus),
            ("--education", FieldKey::Education),
            ("--property-area", FieldKey::PropertyArea),
            ("--dependents", FieldKey::Dependents),
        ] {
            for choice in key.spec().choices {
                let cli = Cli::try_parse_from(args(&["credit-risk", "score", flag, choice.value]))
                    .unwrap_or_else(|e| panic!("{flag} {}: {e}", choice.value));
                let Command::Score(score) = cli.command else {
                    panic!("expected score command");
                };
                assert_eq!(score.field_values(), vec![(key, choice.value.to_string())]);
            }
        }
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::parse_from(args(&[
            "credit-risk",
            "info",
            "--api-url",
            "http://localhost:8000",
            "--timeout-secs",
            "9",
        ]));
        let overrides = cli.overrides();
        assert_eq!(overrides.api_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(overrides.timeout_secs, Some(9));
    }
}
