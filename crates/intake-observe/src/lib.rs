//! Observability setup for intake: the global tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
