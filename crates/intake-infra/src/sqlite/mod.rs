//! SQLite persistence: connection pool and the `forms` table gateway.

pub mod form;
pub mod pool;
