//! Order status transition table
//!
//! ```text
//! In Progress ──► Ready ──► Paid
//!      ▲            │
//!      └────────────┘ (edit-back)
//! In Progress / Ready ──► Cancelled
//! ```
//!
//! Paid and Cancelled are terminal. Moving to the current status is an
//! idempotent no-op.

use super::OrderError;
use shared::order::OrderStatus;

/// What the table binding must do after a transition commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSignal {
    /// Mark the table Booked and linked to the order
    Bind,
    /// Mark the table Available and unlink it
    Release,
}

/// Whether `from → to` is allowed (same-status included)
pub fn is_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    from == to
        || matches!(
            (from, to),
            (InProgress, Ready)
                | (InProgress, Cancelled)
                | (Ready, Paid)
                | (Ready, InProgress)
                | (Ready, Cancelled)
        )
}

pub fn check_transition(order_id: i64, from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
    if is_allowed(from, to) {
        return Ok(());
    }
    let reason = if from.is_terminal() {
        format!("Order {order_id} is already {from}")
    } else {
        format!("Order {order_id} cannot move from {from} to {to}")
    };
    Err(OrderError::Conflict(reason))
}

/// Table signal for an order that has just reached `status`
pub fn signal_for(status: OrderStatus) -> TableSignal {
    match status {
        OrderStatus::InProgress | OrderStatus::Ready => TableSignal::Bind,
        OrderStatus::Paid | OrderStatus::Cancelled => TableSignal::Release,
    }
}
