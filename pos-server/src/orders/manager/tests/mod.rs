//! OrdersManager tests
//!
//! Each test opens its own SQLite file in a temp dir with the real
//! migrations applied.

use super::*;
use crate::db::DbService;
use crate::db::repository::{dining_table, dish};
use shared::models::{DiningTableCreate, DishCreate, TableStatus};
use shared::order::{OrderCreate, PaymentMethod};
use std::sync::Mutex;
use tempfile::TempDir;

mod test_core;

/// Manager plus the pool it writes to; the temp dir lives as long as the env
struct TestEnv {
    _dir: TempDir,
    pool: SqlitePool,
    manager: OrdersManager,
}

async fn open_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orders.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    (dir, db.pool)
}

async fn create_test_manager() -> TestEnv {
    create_test_manager_with(OrderSettings {
        tax_rate_percent: Decimal::new(525, 2),
        restore_stock_on_cancel: false,
    })
    .await
}

async fn create_test_manager_with(settings: OrderSettings) -> TestEnv {
    let (dir, pool) = open_pool().await;
    let manager = OrdersManager::new(pool.clone(), settings);
    TestEnv {
        _dir: dir,
        pool,
        manager,
    }
}

async fn create_manager_with_binding(tables: Arc<dyn TableBinding>) -> TestEnv {
    let (dir, pool) = open_pool().await;
    let manager = OrdersManager::with_table_binding(pool.clone(), OrderSettings::default(), tables);
    TestEnv {
        _dir: dir,
        pool,
        manager,
    }
}

async fn seed_dish(pool: &SqlitePool, name: &str, price: f64, stock: i64) -> i64 {
    dish::create(
        pool,
        DishCreate {
            name: name.to_string(),
            price,
            stock,
            category: None,
            subcategory: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_table(pool: &SqlitePool, table_no: i64) -> i64 {
    dining_table::create(
        pool,
        DiningTableCreate {
            table_no,
            seats: 4,
        },
    )
    .await
    .unwrap()
    .id
}

async fn stock(pool: &SqlitePool, dish_id: i64) -> i64 {
    dish::stock_of(pool, dish_id).await.unwrap().unwrap()
}

fn simple_item(dish_id: i64, name: &str, price: f64, quantity: i32) -> LineItem {
    LineItem {
        dish_id,
        name: name.to_string(),
        price_per_quantity: price,
        quantity,
        price: 0.0,
        note: None,
        is_existing: None,
    }
}

fn customer(guests: u32) -> CustomerDetails {
    CustomerDetails {
        name: "Maria".to_string(),
        phone: "09171234567".to_string(),
        guests,
    }
}

fn dine_in(table: i64, guests: u32, items: Vec<LineItem>) -> OrderCreate {
    OrderCreate {
        customer_details: customer(guests),
        items,
        table: Some(table),
        discounts: vec![],
        note: None,
        payment_method: None,
        is_take_out: None,
    }
}

fn take_out(guests: u32, items: Vec<LineItem>) -> OrderCreate {
    OrderCreate {
        table: None,
        is_take_out: Some(true),
        payment_method: Some(PaymentMethod::Gcash),
        ..dine_in(0, guests, items)
    }
}

/// Binding that records every call
#[derive(Default)]
struct RecordingBinding {
    calls: Mutex<Vec<(TableSignal, i64)>>,
}

impl RecordingBinding {
    fn calls(&self) -> Vec<(TableSignal, i64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TableBinding for RecordingBinding {
    async fn bind(&self, table_id: i64, _order_id: i64) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push((TableSignal::Bind, table_id));
        Ok(())
    }

    async fn release(&self, table_id: i64) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push((TableSignal::Release, table_id));
        Ok(())
    }
}

/// Binding whose every call fails
struct FailingBinding;

#[async_trait::async_trait]
impl TableBinding for FailingBinding {
    async fn bind(&self, _table_id: i64, _order_id: i64) -> anyhow::Result<()> {
        anyhow::bail!("table service unavailable")
    }

    async fn release(&self, _table_id: i64) -> anyhow::Result<()> {
        anyhow::bail!("table service unavailable")
    }
}

async fn table_state(pool: &SqlitePool, table_id: i64) -> (TableStatus, Option<i64>) {
    let table = dining_table::find_by_id(pool, table_id).await.unwrap().unwrap();
    (table.status, table.current_order_id)
}
