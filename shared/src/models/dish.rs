//! Dish Model

use serde::{Deserialize, Serialize};

/// Menu dish with its sellable stock counter
///
/// `stock` is never negative in a committed state; the inventory ledger is
/// the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishCreate {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
}
