//! Session engine and store gateway traits for intake.
//!
//! This crate defines the questionnaire state machine (cursor + answers), the
//! progress evaluator, the listing cache, and the `SessionStore` port that the
//! infrastructure layer (intake-infra) implements. It depends only on
//! `intake-types` -- never on intake-infra or any database/IO crate.

pub mod controller;
pub mod cursor;
pub mod gateway;
pub mod listing;
pub mod progress;

#[cfg(test)]
mod test_support;
