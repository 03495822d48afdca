//! OrdersManager - the order lifecycle
//!
//! Owns every mutation of an order's items, claims, bill and status. Each
//! mutation is one SQLite unit of work that also drives the inventory
//! ledger; the table binding is signalled only after commit.
//!
//! # Create flow
//!
//! ```text
//! create_order(input)
//!     ├─ 1. Validate customer, items, claims (no transaction yet)
//!     ├─ 2. Price items, compute bill with the supplied claims
//!     ├─ 3. BEGIN IMMEDIATE
//!     ├─ 4. Check table exists (dine-in)
//!     ├─ 5. inventory::reserve
//!     ├─ 6. Insert order (In Progress)
//!     ├─ 7. inventory::decrement
//!     ├─ 8. COMMIT (any error above rolls back everything)
//!     └─ 9. bind table (best-effort)
//! ```

#[cfg(test)]
mod tests;

use super::status::{self, TableSignal};
use super::table_binding::{SqliteTableBinding, TableBinding};
use super::{OrderError, OrderResult};
use crate::db::begin_unit;
use crate::db::repository::{dining_table, order as order_repo};
use crate::inventory;
use crate::order_money;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use rust_decimal::Decimal;
use shared::order::{
    BillSnapshot, CustomerDetails, LineItem, Order, OrderCreate, OrderStatus, RawDiscountClaim,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

/// Note stored when the client sends none
const DEFAULT_NOTE: &str = "None";

/// Engine settings taken from the server config
#[derive(Debug, Clone, Default)]
pub struct OrderSettings {
    /// Tax rate in percent used to fix a new order's tax ratio
    pub tax_rate_percent: Decimal,
    /// Re-credit stock when an order is cancelled or a live order is deleted
    pub restore_stock_on_cancel: bool,
}

/// OrdersManager for order mutations
pub struct OrdersManager {
    pool: SqlitePool,
    tables: Arc<dyn TableBinding>,
    settings: OrderSettings,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("pool", &"<SqlitePool>")
            .field("tables", &"<dyn TableBinding>")
            .field("settings", &self.settings)
            .finish()
    }
}

impl OrdersManager {
    /// Manager with the SQLite table binding
    pub fn new(pool: SqlitePool, settings: OrderSettings) -> Self {
        let tables = Arc::new(SqliteTableBinding::new(pool.clone()));
        Self::with_table_binding(pool, settings, tables)
    }

    pub fn with_table_binding(
        pool: SqlitePool,
        settings: OrderSettings,
        tables: Arc<dyn TableBinding>,
    ) -> Self {
        Self {
            pool,
            tables,
            settings,
        }
    }

    pub fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn get_order(&self, order_id: i64) -> OrderResult<Order> {
        order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))
    }

    pub async fn list_orders(&self, status: Option<OrderStatus>) -> OrderResult<Vec<Order>> {
        Ok(order_repo::find_all(&self.pool, status).await?)
    }

    // ========================================================================
    // Create
    // ========================================================================

    /// Open a new order, taking stock for every line item
    pub async fn create_order(
        &self,
        input: OrderCreate,
        employee_id: Option<i64>,
    ) -> OrderResult<Order> {
        let table = input.dine_in_table();
        let OrderCreate {
            customer_details,
            items,
            discounts: claims,
            note,
            payment_method,
            ..
        } = input;

        validate_customer(&customer_details)?;
        validate_optional_text(note.as_deref(), "note", MAX_NOTE_LEN)?;
        let mut items = validate_items(items)?;
        order_money::validate_claims(&claims)?;

        order_money::price_items(&mut items);
        let subtotal = order_money::subtotal(&items);
        let tax_ratio =
            order_money::tax_ratio_at_creation(subtotal, self.settings.tax_rate_percent);
        let (discounts, bills) = order_money::apply_discounts(
            subtotal,
            customer_details.guests,
            &claims,
            tax_ratio,
        );

        let now = now_millis();
        let order = Order {
            id: snowflake_id(),
            customer_details,
            items,
            discounts,
            bills,
            order_status: OrderStatus::InProgress,
            table,
            is_take_out: table.is_none(),
            note: note
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NOTE.to_string()),
            payment_method: payment_method.unwrap_or_default(),
            employee: employee_id,
            tax_ratio: tax_ratio.to_string(),
            order_date: now,
            updated_at: now,
        };

        let mut tx = begin_unit(&self.pool).await?;
        let result = insert_with_stock(&mut tx, &order).await;
        finish(tx, result, "create_order", order.id).await?;

        tracing::info!(
            order_id = order.id,
            table_id = ?order.table,
            items = order.items.len(),
            total = order.bills.total_with_tax,
            "Order created"
        );

        if let Some(table_id) = order.table {
            self.signal(order.id, table_id, TableSignal::Bind).await;
        }
        Ok(order)
    }

    // ========================================================================
    // Update items
    // ========================================================================

    /// Replace the item list of an in-progress order.
    ///
    /// Stock moves from the old list to the new one inside one unit of work;
    /// a shortage leaves order and stock untouched. A supplied bill must be
    /// self-consistent and is stored as given; otherwise the bill is
    /// recomputed from the new items, the stored claims and the stored tax
    /// ratio.
    pub async fn update_items(
        &self,
        order_id: i64,
        items: Vec<LineItem>,
        bill: Option<BillSnapshot>,
    ) -> OrderResult<Order> {
        let mut items = validate_items(items)?;
        if let Some(bill) = &bill {
            order_money::validate_bill(bill)?;
        }
        order_money::price_items(&mut items);

        let mut tx = begin_unit(&self.pool).await?;
        let result = replace_items(&mut tx, order_id, items, bill).await;
        let order = finish(tx, result, "update_items", order_id).await?;

        tracing::info!(
            order_id,
            items = order.items.len(),
            total = order.bills.total_with_tax,
            "Order items updated"
        );
        Ok(order)
    }

    // ========================================================================
    // Update discount
    // ========================================================================

    /// Recompute the bill for a new claim set.
    ///
    /// Invalid claim rows are dropped; the normalized set is stored.
    pub async fn update_discount(
        &self,
        order_id: i64,
        claims: Vec<RawDiscountClaim>,
    ) -> OrderResult<Order> {
        order_money::validate_claims(&claims)?;

        let mut tx = begin_unit(&self.pool).await?;
        let result = replace_discounts(&mut tx, order_id, &claims).await;
        let order = finish(tx, result, "update_discount", order_id).await?;

        tracing::info!(
            order_id,
            claims = order.discounts.len(),
            discount = order.bills.discount_amount,
            total = order.bills.total_with_tax,
            "Order discount updated"
        );
        Ok(order)
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Move an order along the status table and signal its table
    pub async fn set_status(&self, order_id: i64, status: OrderStatus) -> OrderResult<Order> {
        let mut tx = begin_unit(&self.pool).await?;
        let result = self.transition(&mut tx, order_id, status).await;
        let (order, previous) = finish(tx, result, "set_status", order_id).await?;

        if previous != status {
            tracing::info!(order_id, from = %previous, to = %status, "Order status changed");
        }

        if let Some(table_id) = order.table {
            self.signal(order.id, table_id, status::signal_for(status))
                .await;
        }
        Ok(order)
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Remove an order document and free its table if it still held one
    pub async fn delete_order(&self, order_id: i64) -> OrderResult<Order> {
        let mut tx = begin_unit(&self.pool).await?;
        let result = self.remove(&mut tx, order_id).await;
        let order = finish(tx, result, "delete_order", order_id).await?;

        tracing::info!(order_id, status = %order.order_status, "Order deleted");

        if let Some(table_id) = order.table
            && !order.order_status.is_terminal()
        {
            self.signal(order.id, table_id, TableSignal::Release).await;
        }
        Ok(order)
    }

    // ========================================================================
    // Unit-of-work bodies
    // ========================================================================

    async fn transition(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order_id: i64,
        to: OrderStatus,
    ) -> OrderResult<(Order, OrderStatus)> {
        let mut order = load(tx, order_id).await?;
        let from = order.order_status;
        status::check_transition(order_id, from, to)?;
        if from == to {
            return Ok((order, from));
        }

        if to == OrderStatus::Cancelled && self.settings.restore_stock_on_cancel {
            inventory::restore(tx, &order.items).await?;
        }

        let now = now_millis();
        order_repo::update_status(tx, order_id, to, now).await?;
        order.order_status = to;
        order.updated_at = now;
        Ok((order, from))
    }

    async fn remove(&self, tx: &mut Transaction<'_, Sqlite>, order_id: i64) -> OrderResult<Order> {
        let order = load(tx, order_id).await?;
        if self.settings.restore_stock_on_cancel && !order.order_status.is_terminal() {
            inventory::restore(tx, &order.items).await?;
        }
        if !order_repo::delete(tx, order_id).await? {
            return Err(OrderError::OrderNotFound(order_id));
        }
        Ok(order)
    }

    /// Best-effort table signal; failures are logged only
    async fn signal(&self, order_id: i64, table_id: i64, signal: TableSignal) {
        let result = match signal {
            TableSignal::Bind => self.tables.bind(table_id, order_id).await,
            TableSignal::Release => self.tables.release(table_id).await,
        };
        if let Err(e) = result {
            tracing::warn!(
                order_id,
                table_id,
                signal = ?signal,
                error = %e,
                "Table binding failed; order change kept"
            );
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_customer(customer: &CustomerDetails) -> OrderResult<()> {
    validate_required_text(&customer.name, "customerDetails.name", MAX_NAME_LEN)?;
    validate_required_text(&customer.phone, "customerDetails.phone", MAX_SHORT_TEXT_LEN)?;
    if customer.guests == 0 {
        return Err(OrderError::Validation(
            "customerDetails.guests must be at least 1".into(),
        ));
    }
    Ok(())
}

fn validate_items(items: Vec<LineItem>) -> OrderResult<Vec<LineItem>> {
    if items.is_empty() {
        return Err(OrderError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    for item in &items {
        order_money::validate_line_item(item)?;
        validate_optional_text(item.note.as_deref(), "items.note", MAX_NOTE_LEN)?;
    }
    Ok(items)
}

async fn load(tx: &mut Transaction<'_, Sqlite>, order_id: i64) -> OrderResult<Order> {
    order_repo::find_by_id_in_tx(tx, order_id)
        .await?
        .ok_or(OrderError::OrderNotFound(order_id))
}

async fn insert_with_stock(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> OrderResult<()> {
    if let Some(table_id) = order.table
        && !dining_table::exists_in_tx(tx, table_id).await?
    {
        return Err(OrderError::TableNotFound(table_id));
    }
    inventory::reserve(tx, &order.items).await?;
    order_repo::insert(tx, order).await?;
    inventory::decrement(tx, &order.items).await?;
    Ok(())
}

async fn replace_items(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    items: Vec<LineItem>,
    bill: Option<BillSnapshot>,
) -> OrderResult<Order> {
    let mut order = load(tx, order_id).await?;
    if order.order_status != OrderStatus::InProgress {
        return Err(OrderError::NotEditable(format!(
            "Order {order_id} is {}; items can only change while In Progress",
            order.order_status
        )));
    }

    inventory::apply_delta(tx, &order.items, &items).await?;

    let bills = match bill {
        Some(bill) => bill,
        None => order_money::calculate_bill(
            order_money::subtotal(&items),
            order.customer_details.guests,
            &order.discounts,
            order_money::parse_tax_ratio(&order.tax_ratio),
        ),
    };

    let now = now_millis();
    order_repo::update_items(tx, order_id, &items, &bills, now).await?;
    order.items = items;
    order.bills = bills;
    order.updated_at = now;
    Ok(order)
}

async fn replace_discounts(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    claims: &[RawDiscountClaim],
) -> OrderResult<Order> {
    let mut order = load(tx, order_id).await?;
    if order.order_status != OrderStatus::Ready {
        tracing::warn!(
            order_id,
            status = %order.order_status,
            "Discount applied to an order that is not Ready"
        );
    }

    let (discounts, bills) = order_money::apply_discounts(
        order_money::to_decimal(order.bills.subtotal),
        order.customer_details.guests,
        claims,
        order_money::parse_tax_ratio(&order.tax_ratio),
    );

    let now = now_millis();
    order_repo::update_discounts(tx, order_id, &discounts, &bills, now).await?;
    order.discounts = discounts;
    order.bills = bills;
    order.updated_at = now;
    Ok(order)
}

/// Commit on success, roll back and log on failure
async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    result: OrderResult<T>,
    operation: &str,
    order_id: i64,
) -> OrderResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = tx.rollback().await {
                tracing::error!(operation, order_id, error = %e, "Rollback failed");
            }
            tracing::warn!(operation, order_id, error = %err, "Unit of work rolled back");
            Err(err)
        }
    }
}
