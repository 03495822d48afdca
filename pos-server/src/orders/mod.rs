//! Order Lifecycle Module
//!
//! - **manager**: `OrdersManager`, every order mutation as one SQLite unit of work
//! - **status**: status transition table and the table signal each status implies
//! - **table_binding**: best-effort table occupancy writer, run after commit
//!
//! # Architecture
//!
//! ```text
//! HTTP handler → OrdersManager ─┬─ inventory (stock, in tx)
//!                               ├─ order_money (bill, pure)
//!                               ├─ order repository (in tx)
//!                               └─ COMMIT → TableBinding (after)
//! ```

mod error;
pub mod manager;
pub mod status;
pub mod table_binding;

pub use error::{OrderError, OrderResult};
pub use manager::{OrderSettings, OrdersManager};
pub use status::TableSignal;
pub use table_binding::{SqliteTableBinding, TableBinding};

// Re-export shared types for convenience
pub use shared::order::{BillSnapshot, DiscountClaim, LineItem, Order, OrderStatus};
