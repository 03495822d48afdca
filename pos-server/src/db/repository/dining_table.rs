//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, TableStatus};
use sqlx::SqlitePool;

const SELECT_TABLE: &str =
    "SELECT id, table_no, seats, status, current_order_id FROM dining_table";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!("{SELECT_TABLE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(table)
}

/// Whether a table exists, checked inside the caller's unit of work
pub async fn exists_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM dining_table WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(found.is_some())
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO dining_table (id, table_no, seats, status) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(data.table_no)
        .bind(data.seats)
        .bind(TableStatus::Available)
        .execute(pool)
        .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

/// Set status and current order together. Returns `false` if the table is missing.
pub async fn set_binding(
    pool: &SqlitePool,
    id: i64,
    status: TableStatus,
    current_order_id: Option<i64>,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE dining_table SET status = ?, current_order_id = ? WHERE id = ?")
        .bind(status)
        .bind(current_order_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
