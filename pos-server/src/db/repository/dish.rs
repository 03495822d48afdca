//! Dish Repository
//!
//! Catalog reads and seeding. Stock counters are written only through
//! [`crate::inventory`].

use super::{RepoError, RepoResult};
use shared::models::{Dish, DishCreate};
use sqlx::SqlitePool;

const SELECT_DISH: &str =
    "SELECT id, name, price, stock, category, subcategory FROM dish";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Dish>> {
    let dish = sqlx::query_as::<_, Dish>(&format!("{SELECT_DISH} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(dish)
}

pub async fn create(pool: &SqlitePool, data: DishCreate) -> RepoResult<Dish> {
    if data.stock < 0 {
        return Err(RepoError::Validation(format!(
            "Dish stock must be non-negative, got {}",
            data.stock
        )));
    }
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO dish (id, name, price, stock, category, subcategory) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.stock)
    .bind(&data.category)
    .bind(&data.subcategory)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dish".into()))
}

/// Current stock of a dish, `None` when the dish does not exist
pub async fn stock_of(pool: &SqlitePool, id: i64) -> RepoResult<Option<i64>> {
    let stock = sqlx::query_scalar::<_, i64>("SELECT stock FROM dish WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(stock)
}
