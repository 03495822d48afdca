//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization. This module also holds the discount calculator:
//! a pure function from subtotal, guest count, claims and tax ratio to a
//! [`BillSnapshot`].

use crate::orders::OrderError;
use rust_decimal::prelude::*;
use shared::order::{BillSnapshot, DiscountClaim, LineItem, RawDiscountClaim};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed amount on a supplied bill
const MAX_BILL_AMOUNT: f64 = 100_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a line item before it reaches a unit of work
pub fn validate_line_item(item: &LineItem) -> Result<(), OrderError> {
    if item.name.trim().is_empty() {
        return Err(OrderError::Validation(format!(
            "item name is required (dish {})",
            item.dish_id
        )));
    }

    require_finite(item.price_per_quantity, "pricePerQuantity")?;
    if item.price_per_quantity < 0.0 {
        return Err(OrderError::Validation(format!(
            "pricePerQuantity must be non-negative, got {}",
            item.price_per_quantity
        )));
    }
    if item.price_per_quantity > MAX_PRICE {
        return Err(OrderError::Validation(format!(
            "pricePerQuantity exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price_per_quantity
        )));
    }

    if item.quantity <= 0 {
        return Err(OrderError::Validation(format!(
            "quantity must be positive, got {} for '{}'",
            item.quantity, item.name
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {} for '{}'",
            MAX_QUANTITY, item.quantity, item.name
        )));
    }
    Ok(())
}

/// Validate raw claims at the boundary.
///
/// A numeric percent outside [0, 100] is rejected. Rows the calculator
/// would drop anyway (unknown type, blank card id, non-numeric value) pass.
pub fn validate_claims(claims: &[RawDiscountClaim]) -> Result<(), OrderError> {
    for claim in claims {
        if let Some(value) = claim.numeric_value()
            && !(0.0..=100.0).contains(&value)
        {
            return Err(OrderError::Validation(format!(
                "discountValue must be between 0 and 100, got {}",
                value
            )));
        }
    }
    Ok(())
}

/// Validate a caller-supplied bill: finite, non-negative and self-consistent
pub fn validate_bill(bill: &BillSnapshot) -> Result<(), OrderError> {
    let fields = [
        (bill.subtotal, "bills.total"),
        (bill.discount_amount, "bills.discountAmount"),
        (bill.discount_percent, "bills.discountPercent"),
        (bill.tax, "bills.tax"),
        (bill.total_with_tax, "bills.totalWithTax"),
    ];
    for (value, name) in fields {
        require_finite(value, name)?;
        if value < 0.0 {
            return Err(OrderError::Validation(format!(
                "{} must be non-negative, got {}",
                name, value
            )));
        }
        if value > MAX_BILL_AMOUNT {
            return Err(OrderError::Validation(format!(
                "{} exceeds maximum allowed ({}), got {}",
                name, MAX_BILL_AMOUNT, value
            )));
        }
    }
    if bill.discount_percent > 100.0 {
        return Err(OrderError::Validation(format!(
            "bills.discountPercent must be between 0 and 100, got {}",
            bill.discount_percent
        )));
    }
    if bill.discount_amount > bill.subtotal {
        return Err(OrderError::Validation(format!(
            "bills.discountAmount ({}) exceeds bills.total ({})",
            bill.discount_amount, bill.subtotal
        )));
    }
    if !bill_identity_holds(bill) {
        return Err(OrderError::Validation(format!(
            "bills.totalWithTax ({}) does not equal total - discountAmount + tax ({})",
            bill.total_with_tax,
            to_f64(discounted_subtotal(bill) + to_decimal(bill.tax))
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the boundary.
/// If NaN/Infinity somehow reaches here, logs an error and returns ZERO
/// to avoid silent data corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to 2 decimal places, half away from zero
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round2(value).to_f64().unwrap_or_else(|| {
        tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
        0.0
    })
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// Line total: unit price × quantity
pub fn line_total(item: &LineItem) -> Decimal {
    to_decimal(item.price_per_quantity) * Decimal::from(item.quantity)
}

/// Sum of line totals, rounded to 2 decimals
pub fn subtotal(items: &[LineItem]) -> Decimal {
    round2(items.iter().map(line_total).sum())
}

/// Fill in each item's `price` with its rounded line total
pub fn price_items(items: &mut [LineItem]) {
    for item in items {
        item.price = to_f64(line_total(item));
    }
}

// ============================================================================
// Tax ratio
// ============================================================================

/// Tax-to-subtotal ratio from a configured tax rate in percent
pub fn tax_ratio_from_percent(rate_percent: Decimal) -> Decimal {
    (rate_percent / Decimal::ONE_HUNDRED).normalize()
}

/// Ratio fixed on an order at creation: the undiscounted bill's tax over its
/// subtotal, or zero when the subtotal is zero
pub fn tax_ratio_at_creation(subtotal: Decimal, rate_percent: Decimal) -> Decimal {
    let subtotal = round2(subtotal);
    if subtotal.is_zero() {
        return Decimal::ZERO;
    }
    let tax = round2(subtotal * tax_ratio_from_percent(rate_percent));
    (tax / subtotal).normalize()
}

/// Parse a stored ratio. A corrupt value is logged and treated as zero.
pub fn parse_tax_ratio(stored: &str) -> Decimal {
    Decimal::from_str(stored).unwrap_or_else(|e| {
        tracing::error!(value = %stored, error = %e, "Invalid stored tax ratio, defaulting to zero");
        Decimal::ZERO
    })
}

// ============================================================================
// Discount calculator
// ============================================================================

/// Keep only usable claims, in input order
pub fn normalize_claims(raw: &[RawDiscountClaim]) -> Vec<DiscountClaim> {
    raw.iter().filter_map(RawDiscountClaim::normalize).collect()
}

fn discounted_subtotal(bill: &BillSnapshot) -> Decimal {
    round2(to_decimal(bill.subtotal) - to_decimal(bill.discount_amount))
}

/// `round(discountedSubtotal + tax, 2) == totalWithTax` within 0.01
pub fn bill_identity_holds(bill: &BillSnapshot) -> bool {
    let expected = round2(discounted_subtotal(bill) + to_decimal(bill.tax));
    (expected - to_decimal(bill.total_with_tax)).abs() < MONEY_TOLERANCE
}

/// Compute a bill from a subtotal and a normalized claim set.
///
/// - discount count = number of claims (not deduplicated by card id)
/// - discount percent = maximum claimed percent
/// - discount amount = subtotal / guests × percent / 100 × count, capped at
///   the subtotal
/// - tax = discounted subtotal × `tax_ratio`
///
/// Every stored figure is rounded to 2 decimals, half-up.
pub fn calculate_bill(
    subtotal: Decimal,
    guests: u32,
    claims: &[DiscountClaim],
    tax_ratio: Decimal,
) -> BillSnapshot {
    let subtotal = round2(subtotal);
    let count = Decimal::from(claims.len() as u64);
    let percent = claims
        .iter()
        .map(|c| to_decimal(c.discount_value))
        .max()
        .unwrap_or(Decimal::ZERO);

    let per_head = if guests > 0 {
        subtotal / Decimal::from(guests)
    } else {
        subtotal
    };

    let discount_amount =
        round2(per_head * (percent / Decimal::ONE_HUNDRED) * count).min(subtotal);
    let discounted = round2(subtotal - discount_amount);
    let tax = round2(discounted * tax_ratio);
    let total_with_tax = round2(discounted + tax);

    BillSnapshot {
        subtotal: to_f64(subtotal),
        discount_percent: to_f64(percent),
        discount_amount: to_f64(discount_amount),
        tax: to_f64(tax),
        total_with_tax: to_f64(total_with_tax),
    }
}

/// Normalize raw claims and compute the bill in one step
pub fn apply_discounts(
    subtotal: Decimal,
    guests: u32,
    raw: &[RawDiscountClaim],
    tax_ratio: Decimal,
) -> (Vec<DiscountClaim>, BillSnapshot) {
    let claims = normalize_claims(raw);
    let bill = calculate_bill(subtotal, guests, &claims, tax_ratio);
    (claims, bill)
}
