//! Order API Handlers
//!
//! Thin adapters: decode the payload, call [`OrdersManager`](crate::orders::OrdersManager),
//! wrap the order in an [`ApiResponse`].

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use shared::order::{
    Order, OrderCreate, OrderDiscountUpdate, OrderItemsUpdate, OrderStatus, OrderStatusUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::validation(e.body_text()))
}

/// Create an order for the authenticated employee
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    body: Result<Json<OrderCreate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let input = payload(body)?;
    let order = state.orders().create_order(input, Some(user.id)).await?;
    Ok(Json(ApiResponse::success_with_message("Order created", order)))
}

/// List orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<OrderStatus>()
                .map_err(|e| AppError::validation(e.to_string()))?,
        ),
    };
    let orders = state.orders().list_orders(status).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders().get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Move an order to another status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    body: Result<Json<OrderStatusUpdate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let update = payload(body)?;
    let order = state.orders().set_status(id, update.order_status).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Replace the item list
pub async fn update_items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    body: Result<Json<OrderItemsUpdate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let update = payload(body)?;
    let order = state
        .orders()
        .update_items(id, update.items, update.bills)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Replace the discount claims and recompute the bill
pub async fn update_discount(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    body: Result<Json<OrderDiscountUpdate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let update = payload(body)?;
    let order = state.orders().update_discount(id, update.discounts).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Delete an order document, returning what was removed
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders().delete_order(id).await?;
    tracing::info!(order_id = id, employee_id = user.id, "Order deleted by employee");
    Ok(Json(ApiResponse::success_with_message("Order deleted", order)))
}
