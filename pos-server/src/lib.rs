//! POS Server - 餐厅收银订单引擎
//!
//! # 架构概述
//!
//! 订单、库存、账单在同一个 SQLite 事务中完成，桌台占用在提交后同步：
//!
//! - **库存** (`inventory`): 菜品库存的唯一写入者，条件扣减，不会出现负库存
//! - **账单** (`order_money`): 折扣与税额计算 (rust_decimal)
//! - **订单** (`orders`): 订单状态机、事务编排、桌台同步
//! - **数据库** (`db`): SQLite (WAL) 连接池、迁移、仓储
//! - **认证** (`auth`): JWT 验证、权限中间件
//! - **HTTP API** (`api`): axum 路由和处理器
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! ├── inventory/     # 库存台账
//! ├── order_money/   # 金额与折扣计算
//! ├── orders/        # 订单生命周期
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod order_money;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerError, ServerState};
pub use orders::{OrderSettings, OrdersManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 安全事件统一输出到 `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 加载 `.env`、读取配置并初始化日志
pub fn setup_environment() -> Result<Config, ServerError> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }

    init_logger_with_file(
        Some(&config.log_level),
        config.log_json,
        config.log_dir.as_deref(),
    );
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
