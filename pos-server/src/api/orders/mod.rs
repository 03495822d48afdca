//! Order API Module
//!
//! | 路径 | 方法 | 说明 | 权限 |
//! |------|------|------|------|
//! | /api/orders | POST | 开单 | 登录 |
//! | /api/orders | GET | 订单列表 (`?status=`) | 登录 |
//! | /api/orders/{id} | GET | 订单详情 | 登录 |
//! | /api/orders/{id} | PUT | 修改状态 | 登录 |
//! | /api/orders/{id}/items | PUT | 修改菜品 | 登录 |
//! | /api/orders/{id}/discount | PUT | 修改折扣 | 登录 |
//! | /api/orders/{id} | DELETE | 删除订单 | orders:delete |

mod handler;

use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, put},
};

use crate::auth::{permissions::ORDERS_DELETE, require_permission};
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::create))
        .route(
            "/api/orders/{id}",
            get(handler::get_by_id).put(handler::set_status).delete(
                handler::delete.layer(middleware::from_fn(require_permission(ORDERS_DELETE))),
            ),
        )
        .route("/api/orders/{id}/items", put(handler::update_items))
        .route("/api/orders/{id}/discount", put(handler::update_discount))
}
