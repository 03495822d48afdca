//! 认证授权模块
//!
//! 验证员工 JWT 并提供权限中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前操作员上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_permission`] - 权限检查中间件

mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
