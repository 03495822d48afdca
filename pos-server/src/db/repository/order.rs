//! Order Repository
//!
//! Orders are stored as documents: customer, items, claims and bill are JSON
//! columns re-validated on every write. All mutations run inside the order
//! manager's unit of work.

use super::{RepoError, RepoResult};
use shared::order::{
    BillSnapshot, CustomerDetails, DiscountClaim, LineItem, Order, OrderStatus, PaymentMethod,
};
use sqlx::{Executor, Sqlite, SqlitePool, Transaction};

const SELECT_ORDER: &str = "SELECT id, status, customer, items, discounts, bill, tax_ratio, \
     table_id, is_take_out, note, payment_method, employee_id, created_at, updated_at FROM orders";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    status: String,
    customer: String,
    items: String,
    discounts: String,
    bill: String,
    tax_ratio: String,
    table_id: Option<i64>,
    is_take_out: bool,
    note: String,
    payment_method: String,
    employee_id: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_status: OrderStatus = row
            .status
            .parse()
            .map_err(|e| RepoError::Database(format!("Order {}: {e}", row.id)))?;
        let payment_method: PaymentMethod = row
            .payment_method
            .parse()
            .map_err(|e| RepoError::Database(format!("Order {}: {e}", row.id)))?;
        let customer_details: CustomerDetails = serde_json::from_str(&row.customer)?;
        let items: Vec<LineItem> = serde_json::from_str(&row.items)?;
        let discounts: Vec<DiscountClaim> = serde_json::from_str(&row.discounts)?;
        let bills: BillSnapshot = serde_json::from_str(&row.bill)?;

        Ok(Order {
            id: row.id,
            customer_details,
            items,
            discounts,
            bills,
            order_status,
            table: row.table_id,
            is_take_out: row.is_take_out,
            note: row.note,
            payment_method,
            employee: row.employee_id,
            tax_ratio: row.tax_ratio,
            order_date: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

async fn fetch_optional<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    row.map(Order::try_from).transpose()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    fetch_optional(pool, id).await
}

/// Read an order through the caller's unit of work
pub async fn find_by_id_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
) -> RepoResult<Option<Order>> {
    fetch_optional(&mut **tx, id).await
}

/// Newest first, optionally filtered by status
pub async fn find_all(pool: &SqlitePool, status: Option<OrderStatus>) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, OrderRow>(&format!(
                "{SELECT_ORDER} WHERE status = ? ORDER BY created_at DESC, id DESC"
            ))
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, OrderRow>(&format!(
                "{SELECT_ORDER} ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    rows.into_iter().map(Order::try_from).collect()
}

pub async fn insert(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, status, customer, items, discounts, bill, tax_ratio, table_id, \
         is_take_out, note, payment_method, employee_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.order_status.as_str())
    .bind(serde_json::to_string(&order.customer_details)?)
    .bind(serde_json::to_string(&order.items)?)
    .bind(serde_json::to_string(&order.discounts)?)
    .bind(serde_json::to_string(&order.bills)?)
    .bind(&order.tax_ratio)
    .bind(order.table)
    .bind(order.is_take_out)
    .bind(&order.note)
    .bind(order.payment_method.as_str())
    .bind(order.employee)
    .bind(order.order_date)
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn ensure_updated(rows: u64, id: i64) -> RepoResult<()> {
    if rows == 0 {
        return Err(RepoError::NotFound(format!("Order {id}")));
    }
    Ok(())
}

pub async fn update_items(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    items: &[LineItem],
    bill: &BillSnapshot,
    updated_at: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET items = ?, bill = ?, updated_at = ? WHERE id = ?")
        .bind(serde_json::to_string(items)?)
        .bind(serde_json::to_string(bill)?)
        .bind(updated_at)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    ensure_updated(rows.rows_affected(), id)
}

pub async fn update_discounts(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    discounts: &[DiscountClaim],
    bill: &BillSnapshot,
    updated_at: i64,
) -> RepoResult<()> {
    let rows =
        sqlx::query("UPDATE orders SET discounts = ?, bill = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(discounts)?)
            .bind(serde_json::to_string(bill)?)
            .bind(updated_at)
            .bind(id)
            .execute(&mut **tx)
            .await?;
    ensure_updated(rows.rows_affected(), id)
}

pub async fn update_status(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    status: OrderStatus,
    updated_at: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(updated_at)
        .bind(id)
        .execute(&mut **tx)
        .await?;
    ensure_updated(rows.rows_affected(), id)
}

pub async fn delete(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}
