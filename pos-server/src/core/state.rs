use std::path::Path;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrdersManager;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，可直接作为 axum 的 `State`。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 验证 |
/// | orders | Arc<OrdersManager> | 订单引擎 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// 手动构造
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 代替
    pub fn new(config: Config, db: DbService, jwt_service: Arc<JwtService>) -> Self {
        let orders = Arc::new(OrdersManager::new(db.pool.clone(), config.order_settings()));
        Self {
            config,
            db,
            jwt_service,
            orders,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库并执行迁移
    /// 3. 构建 JWT 服务和订单引擎
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        if let Some(parent) = Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = DbService::new(&config.database_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        tracing::info!(
            work_dir = %config.work_dir,
            tax_rate_percent = %config.tax_rate_percent,
            restore_stock_on_cancel = config.restore_stock_on_cancel,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db, jwt_service))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn orders(&self) -> &OrdersManager {
        &self.orders
    }
}
