//! Order domain types shared between server and clients

pub mod bill;
pub mod discount;
pub mod request;
pub mod types;

pub use bill::BillSnapshot;
pub use discount::{DiscountClaim, DiscountType, RawDiscountClaim};
pub use request::{OrderCreate, OrderDiscountUpdate, OrderItemsUpdate, OrderStatusUpdate};
pub use types::{
    CustomerDetails, LineItem, Order, OrderStatus, PaymentMethod, UnknownOrderStatus,
};
