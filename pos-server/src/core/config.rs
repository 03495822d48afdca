use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};
use crate::orders::OrderSettings;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | <WORK_DIR>/pos.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TAX_RATE_PERCENT | 0 | 新订单税率 (百分比) |
/// | RESTORE_STOCK_ON_CANCEL | false | 取消/删除订单时回补库存 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (存在时写入滚动文件) |
/// | LOG_JSON | false | JSON 格式日志 |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 新订单的税率 (百分比)，创建时换算为税率比例并固化到订单
    pub tax_rate_percent: Decimal,
    /// 取消或删除未结订单时回补库存
    pub restore_stock_on_cancel: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；格式错误的税率或缺失的生产密钥返回错误。
    pub fn from_env() -> Result<Self> {
        let work_dir = env_or("WORK_DIR", "./data");
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| default_database_path(&work_dir));

        let tax_rate_percent = match std::env::var("TAX_RATE_PERCENT") {
            Ok(raw) => parse_tax_rate(&raw)?,
            Err(_) => Decimal::ZERO,
        };

        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(Self {
            work_dir,
            database_path,
            http_port: env_parse("HTTP_PORT", 3000),
            environment: env_or("ENVIRONMENT", "development"),
            tax_rate_percent,
            restore_stock_on_cancel: env_parse("RESTORE_STOCK_ON_CANCEL", false),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30_000),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: env_parse("LOG_JSON", false),
            jwt,
        })
    }

    /// 以指定工作目录和 JWT 配置构造，其余取默认值
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>, jwt: JwtConfig) -> Self {
        let work_dir = work_dir.into();
        Self {
            database_path: default_database_path(&work_dir),
            work_dir,
            http_port: 3000,
            environment: "development".into(),
            tax_rate_percent: Decimal::ZERO,
            restore_stock_on_cancel: false,
            request_timeout_ms: 30_000,
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            jwt,
        }
    }

    /// 订单引擎设置
    pub fn order_settings(&self) -> OrderSettings {
        OrderSettings {
            tax_rate_percent: self.tax_rate_percent,
            restore_stock_on_cancel: self.restore_stock_on_cancel,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_database_path(work_dir: &str) -> String {
    PathBuf::from(work_dir)
        .join("pos.db")
        .to_string_lossy()
        .into_owned()
}

/// 税率百分比，必须在 [0, 100]
fn parse_tax_rate(raw: &str) -> Result<Decimal> {
    let rate = Decimal::from_str(raw.trim())
        .map_err(|e| ServerError::Config(format!("TAX_RATE_PERCENT is not a number: {e}")))?;
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(ServerError::Config(format!(
            "TAX_RATE_PERCENT must be between 0 and 100, got {rate}"
        )));
    }
    Ok(rate)
}
