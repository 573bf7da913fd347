//! External data sources.

pub mod scoring;

pub use scoring::{RawResponse, ScoringClient, ScoringTransport, TransportError};
