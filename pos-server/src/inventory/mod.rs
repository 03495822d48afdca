//! Inventory Ledger
//!
//! Sole writer of `dish.stock`. Every operation runs on the caller's
//! transaction, so a failure anywhere in the batch is undone by the
//! caller's rollback. Decrements are conditional updates
//! (`stock >= n`); stock never goes negative.

use shared::order::LineItem;
use sqlx::{Sqlite, Transaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockError {
    #[error("Dish {0} not found")]
    DishNotFound(i64),

    #[error("Insufficient stock for {dish_name}: requested {requested}, available {available}")]
    InsufficientStock {
        dish_id: i64,
        dish_name: String,
        requested: i64,
        available: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StockResult<T> = Result<T, StockError>;

/// Requested units per dish, merged across line items, in first-seen order
pub fn demand(items: &[LineItem]) -> Vec<(i64, i64)> {
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(items.len());
    for item in items {
        let qty = i64::from(item.quantity);
        match merged.iter_mut().find(|(id, _)| *id == item.dish_id) {
            Some((_, total)) => *total += qty,
            None => merged.push((item.dish_id, qty)),
        }
    }
    merged
}

async fn load(tx: &mut Transaction<'_, Sqlite>, dish_id: i64) -> StockResult<Option<(String, i64)>> {
    let row = sqlx::query_as::<_, (String, i64)>("SELECT name, stock FROM dish WHERE id = ?")
        .bind(dish_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row)
}

/// Check every dish has enough stock, failing on the first one that does not.
///
/// Reads go through the transaction, so they see the caller's own earlier
/// writes (e.g. a restore in the same unit of work).
pub async fn reserve(tx: &mut Transaction<'_, Sqlite>, items: &[LineItem]) -> StockResult<()> {
    for (dish_id, requested) in demand(items) {
        let (dish_name, available) = load(tx, dish_id)
            .await?
            .ok_or(StockError::DishNotFound(dish_id))?;
        if available < requested {
            return Err(StockError::InsufficientStock {
                dish_id,
                dish_name,
                requested,
                available,
            });
        }
    }
    Ok(())
}

async fn take(tx: &mut Transaction<'_, Sqlite>, dish_id: i64, qty: i64) -> StockResult<bool> {
    let rows = sqlx::query("UPDATE dish SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1")
        .bind(qty)
        .bind(dish_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

async fn give(tx: &mut Transaction<'_, Sqlite>, dish_id: i64, qty: i64) -> StockResult<bool> {
    let rows = sqlx::query("UPDATE dish SET stock = stock + ? WHERE id = ?")
        .bind(qty)
        .bind(dish_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Build the error for a guarded decrement that touched no row.
/// `credited` is added to the reported availability when the caller has
/// already logically returned units that were not written yet.
async fn shortage(
    tx: &mut Transaction<'_, Sqlite>,
    dish_id: i64,
    requested: i64,
    credited: i64,
) -> StockError {
    match load(tx, dish_id).await {
        Ok(Some((dish_name, stock))) => StockError::InsufficientStock {
            dish_id,
            dish_name,
            requested,
            available: stock + credited,
        },
        Ok(None) => StockError::DishNotFound(dish_id),
        Err(e) => e,
    }
}

/// Take stock for every line item
pub async fn decrement(tx: &mut Transaction<'_, Sqlite>, items: &[LineItem]) -> StockResult<()> {
    for (dish_id, qty) in demand(items) {
        if !take(tx, dish_id, qty).await? {
            return Err(shortage(tx, dish_id, qty, 0).await);
        }
        tracing::debug!(dish_id, quantity = qty, "Stock decremented");
    }
    Ok(())
}

/// Give stock back for every line item. Dishes removed from the menu are skipped.
pub async fn restore(tx: &mut Transaction<'_, Sqlite>, items: &[LineItem]) -> StockResult<()> {
    for (dish_id, qty) in demand(items) {
        if give(tx, dish_id, qty).await? {
            tracing::debug!(dish_id, quantity = qty, "Stock restored");
        } else {
            tracing::warn!(dish_id, quantity = qty, "Restore skipped: dish no longer exists");
        }
    }
    Ok(())
}

/// Move from the `old` item list to the `new` one with one signed
/// adjustment per dish.
///
/// Equivalent to `restore(old)` then `reserve(new)` + `decrement(new)`:
/// shortages report the availability as it would be after `old` is
/// credited back.
pub async fn apply_delta(
    tx: &mut Transaction<'_, Sqlite>,
    old: &[LineItem],
    new: &[LineItem],
) -> StockResult<()> {
    let old_demand = demand(old);
    let new_demand = demand(new);
    let old_qty = |dish_id: i64| {
        old_demand
            .iter()
            .find(|(id, _)| *id == dish_id)
            .map_or(0, |(_, q)| *q)
    };

    // Dishes that need more units first, so a shortage fails before any credit lands
    for &(dish_id, wanted) in &new_demand {
        let credited = old_qty(dish_id);
        let extra = wanted - credited;
        if extra <= 0 {
            continue;
        }
        if !take(tx, dish_id, extra).await? {
            return Err(shortage(tx, dish_id, wanted, credited).await);
        }
        tracing::debug!(dish_id, quantity = extra, "Stock decremented");
    }

    for &(dish_id, had) in &old_demand {
        let wanted = new_demand
            .iter()
            .find(|(id, _)| *id == dish_id)
            .map_or(0, |(_, q)| *q);
        let surplus = had - wanted;
        if surplus > 0 {
            if give(tx, dish_id, surplus).await? {
                tracing::debug!(dish_id, quantity = surplus, "Stock restored");
            } else {
                tracing::warn!(dish_id, quantity = surplus, "Restore skipped: dish no longer exists");
            }
        }
    }
    Ok(())
}
