//! The submission workflow: form state, normalization, and the state machine
//! that turns a form into a scoring result or an error message.
//!
//! Nothing here knows about terminals or HTTP libraries; the transport is
//! reached through `crate::data::ScoringTransport`.

pub mod controller;
pub mod form;
pub mod normalize;

pub use controller::{FALLBACK_ERROR, SubmitError, Submission, SubmissionController};
pub use form::{FormState, FormStore, SubmissionStatus};
pub use normalize::{ValidationError, ValidationReason, normalize};
