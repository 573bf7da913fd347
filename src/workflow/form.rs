//! Form state store: raw field values plus the submission status.

use crate::domain::{FieldKey, ScoringResult};

/// Raw, unvalidated field values; one slot per `FieldKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: [String; FieldKey::COUNT],
}

impl FormState {
    /// A form seeded with registry defaults.
    pub fn with_defaults() -> Self {
        Self {
            values: FieldKey::ALL.map(|k| k.default_value().to_string()),
        }
    }

    pub fn get(&self, key: FieldKey) -> &str {
        &self.values[key.index()]
    }

    pub fn set(&mut self, key: FieldKey, raw: impl Into<String>) {
        self.values[key.index()] = raw.into();
    }

    /// Mutable access for in-place editing (typing, backspace).
    pub fn get_mut(&mut self, key: FieldKey) -> &mut String {
        &mut self.values[key.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        FieldKey::ALL
            .into_iter()
            .map(move |k| (k, self.values[k.index()].as_str()))
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Submission lifecycle.
///
/// The outcome lives inside the status, so a result and an error can never
/// coexist and both are dropped as soon as the status moves on.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Succeeded(ScoringResult),
    Failed(String),
}

impl SubmissionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Succeeded(_) => "succeeded",
            SubmissionStatus::Failed(_) => "failed",
        }
    }
}

/// The single owned store behind a workflow.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    form: FormState,
    status: SubmissionStatus,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, SubmissionStatus::Pending)
    }

    pub fn result(&self) -> Option<&ScoringResult> {
        match &self.status {
            SubmissionStatus::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SubmissionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Replace the raw value of `key`. No validation happens here.
    pub fn set_field(&mut self, key: FieldKey, raw: impl Into<String>) {
        self.form.set(key, raw);
    }

    pub fn field_mut(&mut self, key: FieldKey) -> &mut String {
        self.form.get_mut(key)
    }

    /// Restore defaults and return to `Idle`, dropping any result or error.
    pub fn reset(&mut self) {
        self.form = FormState::with_defaults();
        self.status = SubmissionStatus::Idle;
    }

    pub(crate) fn set_status(&mut self, status: SubmissionStatus) {
        self.status = status;
    }
}
