//! Domain types used throughout the workflow.
//!
//! This module defines:
//!
//! - the field registry (`FieldKey`, `FieldSpec`, choice lists)
//! - the scoring request/response wire types (`ScoringRequest`, `ScoringResult`)

pub mod fields;
pub mod types;

pub use fields::*;
pub use types::*;
