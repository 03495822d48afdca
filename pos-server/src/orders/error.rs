use crate::db::repository::RepoError;
use crate::inventory::StockError;
use crate::utils::{AppError, ErrorCode};
use thiserror::Error;

/// Order engine errors
///
/// Anything returned from inside a unit of work aborts it; the transaction
/// is dropped without commit.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("Dish {0} not found")]
    DishNotFound(i64),

    #[error("Table {0} not found")]
    TableNotFound(i64),

    #[error("Insufficient stock for {dish_name}: requested {requested}, available {available}")]
    InsufficientStock {
        dish_id: i64,
        dish_name: String,
        requested: i64,
        available: i64,
    },

    /// Status transition not allowed from the current status
    #[error("{0}")]
    Conflict(String),

    /// Items can only change while the order is in progress
    #[error("{0}")]
    NotEditable(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<StockError> for OrderError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::DishNotFound(id) => OrderError::DishNotFound(id),
            StockError::InsufficientStock {
                dish_id,
                dish_name,
                requested,
                available,
            } => OrderError::InsufficientStock {
                dish_id,
                dish_name,
                requested,
                available,
            },
            StockError::Database(e) => e.into(),
        }
    }
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(msg) => OrderError::Validation(msg),
            other => OrderError::Database(other.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => AppError::validation(msg),
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
                    .with_detail("orderId", id)
            }
            OrderError::DishNotFound(id) => {
                AppError::with_message(ErrorCode::DishNotFound, format!("Dish {id} not found"))
                    .with_detail("dishId", id)
            }
            OrderError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
                    .with_detail("tableId", id)
            }
            OrderError::InsufficientStock {
                dish_id,
                dish_name,
                requested,
                available,
            } => AppError::insufficient_stock(dish_id, dish_name, requested, available),
            OrderError::Conflict(msg) => AppError::with_message(ErrorCode::OrderStatusConflict, msg),
            OrderError::NotEditable(msg) => AppError::with_message(ErrorCode::OrderNotEditable, msg),
            OrderError::Database(msg) => {
                // Never expose driver text to clients
                tracing::error!(error = %msg, "Order engine database error");
                AppError::database("Database error")
            }
        }
    }
}
