//! One-shot scoring pipeline used by the `score` command.
//!
//! form edits -> normalize -> POST -> decode -> present
//!
//! The TUI drives the same `SubmissionController`, split across threads.

use crate::data::ScoringTransport;
use crate::domain::{FieldKey, ScoringResult};
use crate::report::{DisplayModel, present};
use crate::workflow::{SubmissionController, SubmissionStatus, SubmitError};

/// Outputs of a successful run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub result: ScoringResult,
    pub display: DisplayModel,
}

/// Apply `edits` to a fresh form, submit once, and return the outcome.
pub fn run_score<T: ScoringTransport + ?Sized>(
    edits: &[(FieldKey, String)],
    transport: &T,
) -> Result<RunOutput, SubmitError> {
    let mut controller = SubmissionController::new();
    for (key, value) in edits {
        controller.set_field(*key, value.clone());
    }

    controller.submit(transport);

    match controller.store().status() {
        SubmissionStatus::Succeeded(result) => Ok(RunOutput {
            display: present(result),
            result: result.clone(),
        }),
        _ => Err(controller
            .last_error()
            .cloned()
            .unwrap_or_else(|| SubmitError::Transport("submission did not complete".to_string()))),
    }
}
