//! Order aggregate types

use super::bill::BillSnapshot;
use super::discount::DiscountClaim;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// Wire values follow the POS client: `"In Progress"`, `"Ready"`, `"Paid"`,
/// `"Cancelled"`. Older clients send `"Completed"` for a paid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "In Progress")]
    InProgress,
    Ready,
    #[serde(alias = "Completed")]
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Ready => "Ready",
            OrderStatus::Paid => "Paid",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Paid and Cancelled accept no further transitions
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderStatus(pub String);

impl fmt::Display for UnknownOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownOrderStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Progress" => Ok(OrderStatus::InProgress),
            "Ready" => Ok(OrderStatus::Ready),
            "Paid" | "Completed" => Ok(OrderStatus::Paid),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Payment method recorded on the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Gcash,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Gcash => "Gcash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMethod::Cash),
            "Card" => Ok(PaymentMethod::Card),
            "Gcash" => Ok(PaymentMethod::Gcash),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Customer details captured when the order is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub guests: u32,
}

/// Line item snapshot (name and unit price are copied from the menu at order time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Dish reference
    #[serde(rename = "id")]
    pub dish_id: i64,
    pub name: String,
    /// Unit price snapshot
    pub price_per_quantity: f64,
    pub quantity: i32,
    /// Line total (`price_per_quantity * quantity`), filled in by the server
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Set by the client during an edit: `true` for items already on the
    /// order, `false` for items added in this edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_existing: Option<bool>,
}

/// Persisted order document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_details: CustomerDetails,
    pub items: Vec<LineItem>,
    /// Normalized claim set (invalid claims already dropped)
    pub discounts: Vec<DiscountClaim>,
    pub bills: BillSnapshot,
    pub order_status: OrderStatus,
    /// Dine-in table, `None` for take-out
    pub table: Option<i64>,
    pub is_take_out: bool,
    pub note: String,
    pub payment_method: PaymentMethod,
    pub employee: Option<i64>,
    /// Tax-to-subtotal ratio fixed at creation, as a decimal string
    pub tax_ratio: String,
    /// Creation timestamp (Unix millis)
    pub order_date: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let paid: OrderStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(paid, OrderStatus::Paid);
        assert_eq!(serde_json::to_string(&paid).unwrap(), "\"Paid\"");
        assert!(serde_json::from_str::<OrderStatus>("\"Served\"").is_err());
    }

    #[test]
    fn test_status_from_str_matches_serde() {
        for status in [
            OrderStatus::InProgress,
            OrderStatus::Ready,
            OrderStatus::Paid,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("paid".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_line_item_client_shape() {
        let item: LineItem = serde_json::from_str(
            r#"{"id": 12, "name": "Sisig", "pricePerQuantity": 180, "quantity": 2}"#,
        )
        .unwrap();
        assert_eq!(item.dish_id, 12);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 0.0);
        assert!(item.is_existing.is_none());

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pricePerQuantity"], 180.0);
        assert!(json.get("note").is_none());
    }
}
