//! Bill snapshot

use serde::{Deserialize, Serialize};

/// Point-in-time monetary summary of an order
///
/// Monetary fields are rounded to 2 decimals. Serialized with the client's
/// key names: `total` is the pre-discount subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BillSnapshot {
    /// Sum of line totals before discount
    #[serde(rename = "total")]
    pub subtotal: f64,
    /// The single percent actually applied
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub tax: f64,
    pub total_with_tax: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_wire_keys() {
        let bill = BillSnapshot {
            subtotal: 1000.0,
            discount_percent: 20.0,
            discount_amount: 100.0,
            tax: 47.25,
            total_with_tax: 947.25,
        };
        let json = serde_json::to_value(bill).unwrap();
        assert_eq!(json["total"], 1000.0);
        assert_eq!(json["discountAmount"], 100.0);
        assert_eq!(json["totalWithTax"], 947.25);
    }

    #[test]
    fn test_bill_discount_fields_default() {
        let bill: BillSnapshot =
            serde_json::from_str(r#"{"total": 50, "tax": 0, "totalWithTax": 50}"#).unwrap();
        assert_eq!(bill.discount_amount, 0.0);
        assert_eq!(bill.discount_percent, 0.0);
    }
}
