//! Shared types for the POS backend
//!
//! Wire and domain types used by the server and its clients: error codes,
//! the unified API response, menu/table models and the order aggregate.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
