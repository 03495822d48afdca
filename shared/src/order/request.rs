//! Request payloads for the order endpoints

use super::bill::BillSnapshot;
use super::discount::RawDiscountClaim;
use super::types::{CustomerDetails, LineItem, OrderStatus, PaymentMethod};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Create order payload
///
/// `table` may be missing, `null`, `0` or `"0"` for a take-out order.
/// A client-computed `bills` field is accepted and ignored; the server
/// computes the bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer_details: CustomerDetails,
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "table_ref")]
    pub table: Option<i64>,
    #[serde(default)]
    pub discounts: Vec<RawDiscountClaim>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub is_take_out: Option<bool>,
}

impl OrderCreate {
    /// Table to bind, `None` for take-out
    pub fn dine_in_table(&self) -> Option<i64> {
        if self.is_take_out == Some(true) {
            return None;
        }
        self.table
    }
}

/// Replace the item list (and optionally the bill) of an in-progress order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemsUpdate {
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub bills: Option<BillSnapshot>,
}

/// Replace the discount claim set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDiscountUpdate {
    #[serde(default)]
    pub discounts: Vec<RawDiscountClaim>,
}

/// Move an order to another status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_status: OrderStatus,
}

fn table_ref<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<Value>::deserialize(deserializer)?;
    let id = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("invalid table reference: {n}")))?,
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .map_err(|_| D::Error::custom(format!("invalid table reference: {s}")))?
        }
        Some(other) => {
            return Err(D::Error::custom(format!("invalid table reference: {other}")));
        }
    };
    Ok((id != 0).then_some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(table: Value) -> OrderCreate {
        serde_json::from_value(json!({
            "customerDetails": {"name": "Ana", "phone": "0917", "guests": 2},
            "items": [{"id": 1, "name": "Adobo", "pricePerQuantity": 150, "quantity": 1}],
            "table": table,
        }))
        .unwrap()
    }

    #[test]
    fn test_take_out_table_forms() {
        assert_eq!(create(Value::Null).dine_in_table(), None);
        assert_eq!(create(json!(0)).dine_in_table(), None);
        assert_eq!(create(json!("0")).dine_in_table(), None);
        assert_eq!(create(json!(7)).dine_in_table(), Some(7));
        assert_eq!(create(json!("7")).dine_in_table(), Some(7));
    }

    #[test]
    fn test_missing_table_is_take_out() {
        let order: OrderCreate = serde_json::from_value(json!({
            "customerDetails": {"name": "Ana", "phone": "0917", "guests": 1},
            "items": [],
        }))
        .unwrap();
        assert_eq!(order.table, None);
        assert!(order.discounts.is_empty());
    }

    #[test]
    fn test_take_out_flag_overrides_table() {
        let mut order = create(json!(3));
        order.is_take_out = Some(true);
        assert_eq!(order.dine_in_table(), None);
    }

    #[test]
    fn test_invalid_table_reference_rejected() {
        let result = serde_json::from_value::<OrderCreate>(json!({
            "customerDetails": {"name": "Ana", "phone": "0917", "guests": 1},
            "items": [],
            "table": "window seat",
        }));
        assert!(result.is_err());
    }
}
