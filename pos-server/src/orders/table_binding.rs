//! Table Binding Synchronizer
//!
//! Keeps a table's occupancy in step with its order. Runs after the order's
//! unit of work has committed and is best-effort: a failure is logged and
//! never undoes the order change.

use crate::db::repository::dining_table;
use async_trait::async_trait;
use shared::models::TableStatus;
use sqlx::SqlitePool;

/// Table occupancy writer
///
/// Both operations are idempotent. A missing table is not an error.
#[async_trait]
pub trait TableBinding: Send + Sync {
    /// Mark the table Booked and point it at `order_id`
    async fn bind(&self, table_id: i64, order_id: i64) -> anyhow::Result<()>;

    /// Mark the table Available with no current order
    async fn release(&self, table_id: i64) -> anyhow::Result<()>;
}

/// [`TableBinding`] over the `dining_table` rows
#[derive(Clone, Debug)]
pub struct SqliteTableBinding {
    pool: SqlitePool,
}

impl SqliteTableBinding {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TableBinding for SqliteTableBinding {
    async fn bind(&self, table_id: i64, order_id: i64) -> anyhow::Result<()> {
        let found =
            dining_table::set_binding(&self.pool, table_id, TableStatus::Booked, Some(order_id))
                .await?;
        if found {
            tracing::info!(table_id, order_id, "Table bound");
        } else {
            tracing::warn!(table_id, order_id, "Bind skipped: table not found");
        }
        Ok(())
    }

    async fn release(&self, table_id: i64) -> anyhow::Result<()> {
        let found =
            dining_table::set_binding(&self.pool, table_id, TableStatus::Available, None).await?;
        if found {
            tracing::info!(table_id, "Table released");
        } else {
            tracing::warn!(table_id, "Release skipped: table not found");
        }
        Ok(())
    }
}
