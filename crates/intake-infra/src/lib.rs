//! Infrastructure layer for intake.
//!
//! Contains the implementations of the `SessionStore` gateway defined in
//! `intake-core` (SQLite, HTTP client, in-memory), the runtime backend
//! selector, and config/catalog loading from the data directory.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod memory;
pub mod sqlite;
pub mod store;
