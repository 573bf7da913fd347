//! Submission controller: the Idle/Pending/Succeeded/Failed state machine.
//!
//! A submission can be driven in two ways:
//!
//! - `submit(&transport)` runs one attempt to completion on the calling thread
//! - `begin_submit()` + `complete()` split the attempt so the request can run
//!   elsewhere (the TUI uses a worker thread) while the store shows `Pending`

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::{RawResponse, ScoringTransport, TransportError};
use crate::domain::{FieldKey, ScoringRequest, ScoringResult};

use super::form::{FormStore, SubmissionStatus};
use super::normalize::{ValidationError, normalize};

/// Shown whenever the service gives no usable explanation.
pub const FALLBACK_ERROR: &str = "Failed to score application. Please check your inputs.";

/// Every way a submission attempt can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The form could not be normalized; nothing was sent.
    Validation(ValidationError),
    /// No response was received.
    Transport(String),
    /// The service answered with a non-2xx status.
    Status { status: u16, detail: Option<String> },
    /// A 2xx body did not match the expected result shape.
    Decode(String),
}

impl SubmitError {
    /// Single-line message for display in place of results.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(err) => err.user_message(),
            SubmitError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            SubmitError::Status { detail: None, .. }
            | SubmitError::Transport(_)
            | SubmitError::Decode(_) => FALLBACK_ERROR.to_string(),
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Validation(err) => write!(f, "invalid input: {err}"),
            SubmitError::Transport(msg) => write!(f, "transport error: {msg}"),
            SubmitError::Status {
                status,
                detail: Some(detail),
            } => write!(f, "scoring service returned {status}: {detail}"),
            SubmitError::Status {
                status,
                detail: None,
            } => write!(f, "scoring service returned {status}"),
            SubmitError::Decode(msg) => write!(f, "unexpected scoring response: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(value: ValidationError) -> Self {
        SubmitError::Validation(value)
    }
}

impl From<TransportError> for SubmitError {
    fn from(value: TransportError) -> Self {
        SubmitError::Transport(value.0)
    }
}

/// A request that has been issued and is awaiting its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub attempt: u64,
    pub request: ScoringRequest,
}

/// Owns the form store and applies every status transition.
#[derive(Debug, Default)]
pub struct SubmissionController {
    store: FormStore,
    attempt: u64,
    last_error: Option<SubmitError>,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    /// Structured cause of the current `Failed` status, if any.
    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    pub fn set_field(&mut self, key: FieldKey, raw: impl Into<String>) {
        self.store.set_field(key, raw);
    }

    pub fn field_mut(&mut self, key: FieldKey) -> &mut String {
        self.store.field_mut(key)
    }

    /// Back to defaults and `Idle` from any state.
    ///
    /// An in-flight attempt is not cancelled; its completion is dropped.
    pub fn reset(&mut self) {
        info!(from = self.store.status().name(), "workflow reset");
        self.store.reset();
        self.last_error = None;
    }

    /// Start an attempt: clear the previous outcome, normalize, go `Pending`.
    ///
    /// Returns `None` while another attempt is pending (no-op) and when the form
    /// does not normalize; the latter moves straight to `Failed` without a request.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.store.is_pending() {
            debug!(attempt = self.attempt, "submit ignored while pending");
            return None;
        }

        self.store.set_status(SubmissionStatus::Idle);
        self.last_error = None;
        self.attempt += 1;

        match normalize(self.store.form()) {
            Ok(request) => {
                info!(attempt = self.attempt, "submitting application for scoring");
                self.store.set_status(SubmissionStatus::Pending);
                Some(Submission {
                    attempt: self.attempt,
                    request,
                })
            }
            Err(err) => {
                warn!(attempt = self.attempt, error = %err, "application failed validation");
                self.fail(SubmitError::Validation(err));
                None
            }
        }
    }

    /// Apply the outcome of `attempt`.
    ///
    /// Outcomes for anything but the current pending attempt are ignored and
    /// `false` is returned.
    pub fn complete(
        &mut self,
        attempt: u64,
        outcome: Result<RawResponse, TransportError>,
    ) -> bool {
        if !self.store.is_pending() || attempt != self.attempt {
            debug!(attempt, current = self.attempt, "dropping stale completion");
            return false;
        }

        match outcome.map_err(SubmitError::from).and_then(decode_response) {
            Ok(result) => {
                info!(
                    attempt,
                    application_id = %result.application_id,
                    risk_score = result.risk_score,
                    category = %result.risk_category,
                    "application scored"
                );
                self.store.set_status(SubmissionStatus::Succeeded(result));
            }
            Err(err) => {
                warn!(attempt, error = %err, "scoring failed");
                self.fail(err);
            }
        }
        true
    }

    /// Run one attempt to completion on this thread.
    ///
    /// Returns `false` when nothing was sent (pending guard or invalid input).
    pub fn submit<T: ScoringTransport + ?Sized>(&mut self, transport: &T) -> bool {
        let Some(submission) = self.begin_submit() else {
            return false;
        };
        let outcome = transport.post_score(&submission.request);
        self.complete(submission.attempt, outcome);
        true
    }

    fn fail(&mut self, err: SubmitError) {
        self.store
            .set_status(SubmissionStatus::Failed(err.user_message()));
        self.last_error = Some(err);
    }
}

/// Turn a raw HTTP response into a result or a classified error.
pub fn decode_response(response: RawResponse) -> Result<ScoringResult, SubmitError> {
    if !response.is_success() {
        return Err(SubmitError::Status {
            status: response.status,
            detail: extract_detail(&response.body),
        });
    }
    serde_json::from_str::<ScoringResult>(&response.body)
        .map_err(|e| SubmitError::Decode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Pull a single-line message out of an error body's `detail` field.
///
/// A string is used as-is; a list of `{loc, msg}` validation entries is joined.
/// Anything else yields `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let text = match parsed.detail {
        Value::String(s) => s,
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(validation_entry).collect();
            if parts.is_empty() {
                return None;
            }
            parts.join("; ")
        }
        _ => return None,
    };
    let line = single_line(&text);
    if line.is_empty() { None } else { Some(line) }
}

fn validation_entry(item: &Value) -> Option<String> {
    let msg = item.get("msg")?.as_str()?;
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .and_then(Value::as_str);
    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}

/// Line breaks become single spaces; all other text is kept as sent.
fn single_line(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskCategory;
    use std::cell::RefCell;

    const SUCCESS_BODY: &str = r#"{
        "risk_score": 72,
        "risk_category": "MEDIUM",
        "approval_recommendation": "REVIEW",
        "confidence": 0.84,
        "debt_to_income_ratio": 30.0,
        "loan_to_income_ratio": 3.0,
        "key_factors": {
            "positive": ["Long credit history", "Graduate education"],
            "negative": ["High loan-to-income ratio"]
        },
        "application_id": "APP-20240501-0001",
        "processed_at": "2024-05-01T10:15:00.123456"
    }"#;

    /// In-memory transport returning canned outcomes and recording requests.
    struct FakeTransport {
        outcome: Result<RawResponse, TransportError>,
        sent: RefCell<Vec<ScoringRequest>>,
    }

    impl FakeTransport {
        fn responding(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(RawResponse::new(status, body)),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                outcome: Err(TransportError("connection refused".to_string())),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn sent(&self) -> usize {
            self.sent.borrow().len()
        }
    }

    impl ScoringTransport for FakeTransport {
        fn post_score(&self, request: &ScoringRequest) -> Result<RawResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            self.outcome.clone()
        }
    }

    fn filled_controller() -> SubmissionController {
        let mut ctl = SubmissionController::new();
        fill(&mut ctl);
        ctl
    }

    fn fill(ctl: &mut SubmissionController) {
        ctl.set_field(FieldKey::ApplicantIncome, "50000");
        ctl.set_field(FieldKey::LoanAmount, "150000");
        ctl.set_field(FieldKey::LoanTermMonths, "360");
        ctl.set_field(FieldKey::CreditHistoryMonths, "84");
        ctl.set_field(FieldKey::EmploymentStatus, "employed");
        ctl.set_field(FieldKey::PropertyArea, "urban");
        ctl.set_field(FieldKey::Dependents, "0");
        ctl.set_field(FieldKey::Education, "graduate");
        ctl.set_field(FieldKey::ExistingDebt, "15000");
    }

    #[test]
    fn success_stores_result_only() {
        let transport = FakeTransport::responding(200, SUCCESS_BODY);
        let mut ctl = filled_controller();

        assert!(ctl.submit(&transport));

        assert_eq!(transport.sent(), 1);
        let result = ctl.store().result().unwrap();
        assert_eq!(result.risk_score, 72.0);
        assert_eq!(result.risk_category, RiskCategory::Medium);
        assert_eq!(
            result.key_factors.positive,
            vec!["Long credit history", "Graduate education"]
        );
        assert!(ctl.store().error().is_none());
        assert!(ctl.last_error().is_none());
    }

    #[test]
    fn sends_the_normalized_payload() {
        let transport = FakeTransport::responding(200, SUCCESS_BODY);
        let mut ctl = filled_controller();
        ctl.submit(&transport);

        let sent = transport.sent.borrow();
        assert_eq!(sent[0].applicant_income, 50000.0);
        assert_eq!(sent[0].loan_term_months, 360);
        assert_eq!(sent[0].education, "graduate");
    }

    #[test]
    fn server_detail_becomes_error_message() {
        let transport = FakeTransport::responding(500, r#"{"detail":"model unavailable"}"#);
        let mut ctl = filled_controller();
        ctl.submit(&transport);

        assert_eq!(ctl.store().error(), Some("model unavailable"));
        assert!(ctl.store().result().is_none());
        assert_eq!(
            ctl.last_error(),
            Some(&SubmitError::Status {
                status: 500,
                detail: Some("model unavailable".to_string())
            })
        );
    }

    #[test]
    fn unparseable_error_body_uses_fallback() {
        let transport = FakeTransport::responding(500, "<html>Internal Server Error</html>");
        let mut ctl = filled_controller();
        ctl.submit(&transport);

        assert_eq!(ctl.store().error(), Some(FALLBACK_ERROR));
        assert!(ctl.store().result().is_none());
    }

    #[test]
    fn transport_failure_uses_fallback() {
        let transport = FakeTransport::unreachable();
        let mut ctl = filled_controller();
        assert!(ctl.submit(&transport));

        assert_eq!(ctl.store().error(), Some(FALLBACK_ERROR));
        assert!(matches!(ctl.last_error(), Some(SubmitError::Transport(_))));
    }

    #[test]
    fn malformed_success_body_fails_instead_of_panicking() {
        let transport = FakeTransport::responding(200, r#"{"risk_score": 50}"#);
        let mut ctl = filled_controller();
        ctl.submit(&transport);

        assert_eq!(ctl.store().error(), Some(FALLBACK_ERROR));
        assert!(matches!(ctl.last_error(), Some(SubmitError::Decode(_))));
    }

    #[test]
    fn invalid_form_fails_without_sending() {
        let transport = FakeTransport::responding(200, SUCCESS_BODY);
        let mut ctl = filled_controller();
        ctl.set_field(FieldKey::ApplicantIncome, "");

        assert!(!ctl.submit(&transport));

        assert_eq!(transport.sent(), 0);
        assert_eq!(
            ctl.store().error(),
            Some("Annual Income (USD): not a number.")
        );
        match ctl.last_error() {
            Some(SubmitError::Validation(err)) => {
                assert_eq!(err.field, FieldKey::ApplicantIncome)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn submit_while_pending_is_a_noop() {
        let mut ctl = filled_controller();
        let first = ctl.begin_submit().unwrap();
        assert!(ctl.store().is_pending());

        assert!(ctl.begin_submit().is_none());
        let transport = FakeTransport::responding(200, SUCCESS_BODY);
        assert!(!ctl.submit(&transport));
        assert_eq!(transport.sent(), 0);
        assert!(ctl.store().is_pending());

        assert!(ctl.complete(first.attempt, Ok(RawResponse::new(200, SUCCESS_BODY))));
        assert!(ctl.store().result().is_some());
    }

    #[test]
    fn resubmission_clears_previous_outcome() {
        let mut ctl = filled_controller();
        ctl.submit(&FakeTransport::responding(500, r#"{"detail":"try later"}"#));
        assert_eq!(ctl.store().error(), Some("try later"));

        let submission = ctl.begin_submit().unwrap();
        assert_eq!(ctl.store().status(), &SubmissionStatus::Pending);
        assert!(ctl.store().error().is_none());
        assert!(ctl.store().result().is_none());
        assert_eq!(submission.attempt, 2);
    }

    #[test]
    fn failure_keeps_form_values() {
        let mut ctl = filled_controller();
        ctl.submit(&FakeTransport::unreachable());
        assert_eq!(ctl.store().form().get(FieldKey::LoanAmount), "150000");
    }

    #[test]
    fn reset_clears_everything_from_any_state() {
        let mut ctl = filled_controller();
        ctl.submit(&FakeTransport::responding(200, SUCCESS_BODY));
        ctl.reset();
        assert_eq!(ctl.store().status(), &SubmissionStatus::Idle);
        assert_eq!(ctl.store().form().get(FieldKey::LoanAmount), "");
        assert_eq!(ctl.store().form().get(FieldKey::LoanTermMonths), "360");

        let mut ctl = filled_controller();
        ctl.submit(&FakeTransport::unreachable());
        ctl.reset();
        assert!(ctl.store().error().is_none());
        assert!(ctl.last_error().is_none());
    }

    #[test]
    fn completion_after_reset_is_dropped() {
        let mut ctl = filled_controller();
        let submission = ctl.begin_submit().unwrap();
        ctl.reset();

        assert!(!ctl.complete(
            submission.attempt,
            Ok(RawResponse::new(200, SUCCESS_BODY))
        ));
        assert_eq!(ctl.store().status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn completion_for_old_attempt_is_dropped() {
        let mut ctl = filled_controller();
        let first = ctl.begin_submit().unwrap();
        ctl.reset();
        fill(&mut ctl);
        let second = ctl.begin_submit().unwrap();

        assert!(!ctl.complete(first.attempt, Err(TransportError("late".to_string()))));
        assert!(ctl.store().is_pending());
        assert!(ctl.complete(second.attempt, Ok(RawResponse::new(200, SUCCESS_BODY))));
        assert!(ctl.store().result().is_some());
    }

    #[test]
    fn detail_extraction() {
        assert_eq!(
            extract_detail(r#"{"detail":"model unavailable"}"#),
            Some("model unavailable".to_string())
        );
        assert_eq!(
            extract_detail(r#"{"detail":"line one\nline two"}"#),
            Some("line one line two".to_string())
        );
        assert_eq!(
            extract_detail(
                r#"{"detail":[{"loc":["body","loan_amount"],"msg":"value is not a valid float","type":"type_error.float"}]}"#
            ),
            Some("loan_amount: value is not a valid float".to_string())
        );
        assert_eq!(
            extract_detail(r#"{"detail":"  loan  amount exceeds\r\nlimit  "}"#),
            Some("loan  amount exceeds limit".to_string())
        );
        assert_eq!(extract_detail(r#"{"detail":42}"#), None);
        assert_eq!(extract_detail(r#"{"detail":"   "}"#), None);
        assert_eq!(extract_detail(r#"{"message":"nope"}"#), None);
        assert_eq!(extract_detail(""), None);
    }
}
