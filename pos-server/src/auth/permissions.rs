//! Permission Definitions
//!
//! 基础订单操作 (开单、改单、折扣、改状态) 登录即可使用；
//! 删除订单是管理操作，需单独授权。

/// 删除订单文档
pub const ORDERS_DELETE: &str = "orders:delete";

/// 可授予的权限
pub const ALL_PERMISSIONS: &[&str] = &[ORDERS_DELETE];

/// 是否为已知权限 (含 `"all"` 和 `"<module>:*"` 通配)
pub fn is_known_permission(permission: &str) -> bool {
    if permission == "all" {
        return true;
    }
    if let Some(module) = permission.strip_suffix(":*") {
        return ALL_PERMISSIONS
            .iter()
            .any(|p| p.split(':').next() == Some(module));
    }
    ALL_PERMISSIONS.contains(&permission)
}
