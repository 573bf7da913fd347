//! `credit-risk` library crate.
//!
//! The binary (`credit-risk`) is a thin wrapper around this library so that:
//!
//! - the submission workflow is testable without a terminal or a network
//! - the TUI and the one-shot `score` command share one state machine

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod report;
pub mod telemetry;
pub mod tui;
pub mod workflow;
