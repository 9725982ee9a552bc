//! HTTP layer: the form REST contract served by `intake serve`.

pub mod error;
pub mod handlers;
pub mod router;
