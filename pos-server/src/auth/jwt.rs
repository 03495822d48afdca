//! JWT 令牌服务
//!
//! 令牌由外部登录服务签发，本服务只负责验证并解析出操作员身份。
//! `generate_token` 供测试和运维工具使用。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 密钥最短长度 (字节)
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_ISSUER: &str = "pos-server";
const DEFAULT_AUDIENCE: &str = "pos-clients";
const DEFAULT_EXPIRATION_MINUTES: i64 = 720;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量读取
    ///
    /// `JWT_SECRET` 在 release 构建中必须设置；debug 构建缺省时生成临时密钥。
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(JwtError::ConfigError(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Ok(secret) => secret,
            Err(_) => missing_secret()?,
        };

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EXPIRATION_MINUTES),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string()),
        })
    }

    /// 使用给定密钥和默认签发者/受众
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }
}

#[cfg(debug_assertions)]
fn missing_secret() -> Result<String, JwtError> {
    tracing::warn!("JWT_SECRET not set, generating a temporary development key");
    generate_printable_secret()
}

#[cfg(not(debug_assertions))]
fn missing_secret() -> Result<String, JwtError> {
    Err(JwtError::ConfigError(
        "JWT_SECRET environment variable must be set in production".to_string(),
    ))
}

/// 令牌中的 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 员工 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 角色名称
    pub role: String,
    /// 权限列表
    #[serde(default)]
    pub permissions: Vec<String>,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("JWT configuration error: {0}")]
    ConfigError(String),
}

/// 生成 64 个可打印字符的随机密钥
pub fn generate_printable_secret() -> Result<String, JwtError> {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::ConfigError("Failed to generate secure random key".to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| CHARSET[(*b as usize) % CHARSET.len()] as char)
        .collect())
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为员工签发令牌
    pub fn generate_token(
        &self,
        employee_id: i64,
        username: &str,
        role: &str,
        permissions: &[&str],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: employee_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// 当前操作员 (从 JWT Claims 解析)
///
/// 由认证中间件注入请求扩展；订单创建时记录其 `id`。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 员工 ID
    pub id: i64,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("subject is not an employee id: {}", claims.sub)))?;

        Ok(Self {
            id,
            username: claims.username,
            role: claims.role,
            permissions: claims.permissions,
        })
    }
}

impl CurrentUser {
    /// 管理员拥有所有权限
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// 检查权限
    ///
    /// - 管理员或持有 `"all"` 拥有全部权限
    /// - `"orders:*"` 匹配 `"orders:delete"` 等
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions.iter().any(|p| {
            p == "all"
                || p == permission
                || p.strip_suffix(":*").is_some_and(|prefix| {
                    permission
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with(':'))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig::with_secret(
            "test-secret-that-is-long-enough-for-hs256",
        ))
    }

    fn user(role: &str, permissions: &[&str]) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "ana".to_string(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_token_roundtrip_to_current_user() {
        let service = service();
        let token = service
            .generate_token(42, "ana", "waiter", &["orders:discount"])
            .unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.permissions, vec!["orders:discount"]);

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username, "ana");
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service().generate_token(1, "ana", "waiter", &[]).unwrap();
        let other = JwtService::with_config(JwtConfig::with_secret(
            "another-secret-that-is-also-long-enough",
        ));
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = JwtConfig::with_secret("test-secret-that-is-long-enough-for-hs256");
        config.expiration_minutes = -10;
        let service = JwtService::with_config(config);
        let token = service.generate_token(1, "ana", "waiter", &[]).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let claims = Claims {
            sub: "abc".to_string(),
            username: "ana".to_string(),
            role: "waiter".to_string(),
            permissions: vec![],
            exp: 0,
            iat: 0,
            iss: DEFAULT_ISSUER.to_string(),
            aud: DEFAULT_AUDIENCE.to_string(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_permission_matching() {
        let waiter = user("waiter", &["orders:*"]);
        assert!(waiter.has_permission("orders:delete"));
        assert!(!waiter.has_permission("ordersx:delete"));
        assert!(!waiter.has_permission("menu:manage"));

        let cashier = user("cashier", &["orders:discount"]);
        assert!(!cashier.has_permission("orders:delete"));

        assert!(user("admin", &[]).has_permission("orders:delete"));
        assert!(user("manager", &["all"]).has_permission("orders:delete"));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_printable_secret().unwrap();
        let b = generate_printable_secret().unwrap();
        assert_eq!(a.len(), 64);
        assert!(a.len() >= MIN_SECRET_LEN);
        assert_ne!(a, b);
    }
}
