//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod dining_table;
pub mod dish;

// Re-exports
pub use dining_table::*;
pub use dish::*;
