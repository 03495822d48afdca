//! Discount claims
//!
//! Clients send claim rows straight from an editable form, so the raw shape
//! is lenient: any field may be missing and the percent may arrive as a
//! number or a numeric string. [`RawDiscountClaim::normalize`] turns a row
//! into a [`DiscountClaim`] or drops it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discount entitlement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountType {
    Senior,
    #[serde(rename = "PWD")]
    Pwd,
}

impl DiscountType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Senior" => Some(DiscountType::Senior),
            "PWD" => Some(DiscountType::Pwd),
            _ => None,
        }
    }
}

/// A discount claim row as received from the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiscountClaim {
    #[serde(rename = "type", default)]
    pub discount_type: Option<Value>,
    #[serde(default)]
    pub card_id: Option<Value>,
    #[serde(default)]
    pub discount_value: Option<Value>,
}

impl RawDiscountClaim {
    /// Percent as a number, if the value is a finite number or numeric string
    pub fn numeric_value(&self) -> Option<f64> {
        let value = match self.discount_value.as_ref()? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Validated claim, or `None` when the row is not a usable claim
    pub fn normalize(&self) -> Option<DiscountClaim> {
        let discount_type = DiscountType::parse(self.discount_type.as_ref()?.as_str()?)?;
        let card_id = self.card_id.as_ref()?.as_str()?.trim();
        if card_id.is_empty() {
            return None;
        }
        let discount_value = self.numeric_value()?;
        if discount_value < 0.0 {
            return None;
        }
        Some(DiscountClaim {
            discount_type,
            card_id: card_id.to_string(),
            discount_value,
        })
    }
}

/// A validated discount claim: one guest's entitlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountClaim {
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    pub card_id: String,
    pub discount_value: f64,
}

impl From<&DiscountClaim> for RawDiscountClaim {
    fn from(claim: &DiscountClaim) -> Self {
        Self {
            discount_type: Some(Value::from(match claim.discount_type {
                DiscountType::Senior => "Senior",
                DiscountType::Pwd => "PWD",
            })),
            card_id: Some(Value::from(claim.card_id.as_str())),
            discount_value: serde_json::Number::from_f64(claim.discount_value).map(Value::Number),
        }
    }
}
