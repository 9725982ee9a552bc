//! Shared domain types for intake.
//!
//! This crate contains the questionnaire catalog, answer addressing, sessions,
//! the form wire format, configuration, and the error types used across the
//! workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod answer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod session;
