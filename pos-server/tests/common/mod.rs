//! 集成测试公共设施
//!
//! 每个测试使用独立的临时工作目录和 SQLite 文件。

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pos_server::auth::JwtConfig;
use pos_server::db::repository::{dining_table, dish};
use pos_server::orders::TableBinding;
use pos_server::{Config, OrderSettings, OrdersManager, ServerState};
use rust_decimal::Decimal;
use shared::models::{DiningTable, DiningTableCreate, DishCreate};
use shared::order::{CustomerDetails, LineItem, OrderCreate};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestServer {
    _dir: TempDir,
    pub state: ServerState,
}

impl TestServer {
    /// 税率 5.25%，取消不回补库存
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_work_dir(
            dir.path().to_string_lossy().into_owned(),
            JwtConfig::with_secret(TEST_SECRET),
        );
        config.tax_rate_percent = Decimal::new(525, 2);
        configure(&mut config);

        let state = ServerState::initialize(&config).await.unwrap();
        Self { _dir: dir, state }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.state.pool()
    }

    pub fn orders(&self) -> &OrdersManager {
        self.state.orders()
    }

    /// 同一数据库上换一个桌台绑定实现
    pub fn manager_with_binding(&self, tables: Arc<dyn TableBinding>) -> OrdersManager {
        OrdersManager::with_table_binding(
            self.pool().clone(),
            OrderSettings {
                tax_rate_percent: Decimal::new(525, 2),
                restore_stock_on_cancel: false,
            },
            tables,
        )
    }

    pub fn token(&self, employee_id: i64, role: &str, permissions: &[&str]) -> String {
        self.state
            .jwt_service()
            .generate_token(employee_id, "tester", role, permissions)
            .unwrap()
    }

    pub async fn seed_dish(&self, name: &str, price: f64, stock: i64) -> i64 {
        dish::create(
            self.pool(),
            DishCreate {
                name: name.to_string(),
                price,
                stock,
                category: Some("Mains".to_string()),
                subcategory: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    pub async fn seed_table(&self, table_no: i64) -> i64 {
        dining_table::create(
            self.pool(),
            DiningTableCreate {
                table_no,
                seats: 4,
            },
        )
        .await
        .unwrap()
        .id
    }

    pub async fn stock(&self, dish_id: i64) -> i64 {
        dish::stock_of(self.pool(), dish_id).await.unwrap().unwrap()
    }

    pub async fn table(&self, table_id: i64) -> DiningTable {
        dining_table::find_by_id(self.pool(), table_id)
            .await
            .unwrap()
            .unwrap()
    }
}

pub fn item(dish_id: i64, name: &str, price: f64, quantity: i32) -> LineItem {
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

pub fn order_input(table: Option<i64>, guests: u32, items: Vec<LineItem>) -> OrderCreate {
    OrderCreate {
        customer_details: CustomerDetails {
            name: "Jose".to_string(),
            phone: "09181234567".to_string(),
            guests,
        },
        items,
        table,
        discounts: vec![],
        note: None,
        payment_method: None,
        is_take_out: None,
    }
}

/// 记录调用的桌台绑定
#[derive(Default)]
pub struct RecordingBinding {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingBinding {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TableBinding for RecordingBinding {
    async fn bind(&self, table_id: i64, order_id: i64) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("bind {table_id} {order_id}"));
        Ok(())
    }

    async fn release(&self, table_id: i64) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(format!("release {table_id}"));
        Ok(())
    }
}

/// 总是失败的桌台绑定
pub struct FailingBinding;

#[async_trait]
impl TableBinding for FailingBinding {
    async fn bind(&self, _table_id: i64, _order_id: i64) -> anyhow::Result<()> {
        anyhow::bail!("table service unavailable")
    }

    async fn release(&self, _table_id: i64) -> anyhow::Result<()> {
        anyhow::bail!("table service unavailable")
    }
}
