//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads configuration and installs logging
//! - dispatches to the TUI or the one-shot commands

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ScoreArgs, TuiArgs};
use crate::config::AppConfig;
use crate::data::ScoringClient;
use crate::error::AppError;
use crate::telemetry::LogSink;
use crate::workflow::SubmitError;

pub mod pipeline;

/// Entry point for the `credit-risk` binary.
pub fn run() -> Result<(), AppError> {
    let argv = crate::cli::rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let config = AppConfig::load(&cli.overrides())?;

    let sink = match &cli.command {
        Command::Tui(TuiArgs {
            log_file: Some(path),
        }) => LogSink::File(path.clone()),
        Command::Tui(_) => LogSink::Disabled,
        Command::Score(_) | Command::Fields | Command::Info => LogSink::Stderr,
    };
    crate::telemetry::init(&config.telemetry, &sink)?;

    match cli.command {
        Command::Tui(_) => handle_tui(&config),
        Command::Score(args) => handle_score(&config, &args),
        Command::Fields => {
            print!("{}", crate::report::format_field_registry());
            Ok(())
        }
        Command::Info => {
            println!("Scoring endpoint: {}", config.scoring.score_url());
            println!("API documentation: {}", config.scoring.docs_url());
            match config.scoring.timeout {
                Some(t) => println!("Request timeout: {}s", t.as_secs()),
                None => println!("Request timeout: client default"),
            }
            Ok(())
        }
    }
}

fn handle_tui(config: &AppConfig) -> Result<(), AppError> {
    info!(endpoint = %config.scoring.score_url(), "starting terminal UI");
    crate::tui::run(config)
}

fn handle_score(config: &AppConfig, args: &ScoreArgs) -> Result<(), AppError> {
    let client = ScoringClient::new(&config.scoring)?;
    let output = pipeline::run_score(&args.field_values(), &client).map_err(submit_error_to_app)?;

    if args.json {
        let json = serde_json::to_string_pretty(&output.result)
            .map_err(|e| AppError::runtime(format!("Failed to encode result: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_assessment(&output.display));
    }
    Ok(())
}

fn submit_error_to_app(err: SubmitError) -> AppError {
    match err {
        SubmitError::Validation(_) => AppError::input(err.user_message()),
        _ => AppError::runtime(err.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKey;
    use crate::error::{EXIT_INPUT, EXIT_RUNTIME};
    use crate::workflow::{FALLBACK_ERROR, ValidationError, ValidationReason};

    #[test]
    fn submit_errors_map_to_exit_codes() {
        let validation = SubmitError::Validation(ValidationError {
            field: FieldKey::LoanAmount,
            reason: ValidationReason::NotANumber,
        });
        let err = submit_error_to_app(validation);
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert_eq!(err.to_string(), "Loan Amount (USD): not a number.");

        let err = submit_error_to_app(SubmitError::Decode("missing field".to_string()));
        assert_eq!(err.exit_code(), EXIT_RUNTIME);
        assert_eq!(err.to_string(), FALLBACK_ERROR);
    }
}
