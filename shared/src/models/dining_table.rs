//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Occupancy status of a dining table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum TableStatus {
    #[default]
    Available,
    Booked,
}

/// Dining table entity
///
/// A table with `current_order_id` set is `Booked`; without one it is
/// `Available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub table_no: i64,
    pub seats: i32,
    pub status: TableStatus,
    pub current_order_id: Option<i64>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableCreate {
    pub table_no: i64,
    pub seats: i32,
}
