//! # Pricing Module
//!
//! Turns (base price, add-on extras, discount, VAT rate) into a
//! [`Quote`]: subtotal, discount amount, VAT amount and total.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  base price                                                         │
//! │      + Σ extras            ──► subtotal                             │
//! │      - discount            ──► after-discount  (clamped at 0)       │
//! │      × vat rate            ──► vat amount                           │
//! │  after-discount + vat      ──► total                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both the guest booking wizard and the vendor manual-booking form price
//! through this one function, so their totals can never diverge.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Discount, VatRate};

// =============================================================================
// Quote
// =============================================================================

/// The priced breakdown of a booking, ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quote {
    /// Base price plus all extras, before discount and VAT.
    pub subtotal: Money,
    /// Discount actually applied (clamped to the subtotal).
    pub discount: Money,
    /// VAT on the discounted subtotal.
    pub vat: Money,
    /// Amount the customer owes: (subtotal - discount) + vat.
    pub total: Money,
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a booking.
///
/// ## Rules
/// - `subtotal = base + Σ extras`; any negative input is rejected
/// - Percentage discounts take their share of the subtotal; fixed
///   discounts are clamped so the total can never go negative
/// - VAT applies to the subtotal *after* discount
///
/// ## Example
/// ```rust
/// use reserva_core::money::Money;
/// use reserva_core::pricing::price_booking;
/// use reserva_core::types::{Discount, VatRate};
///
/// // Hall at SAR 2,000 + one SAR 300 add-on, 10% coupon, 15% VAT
/// let quote = price_booking(
///     Money::from_riyals(2000),
///     &[Money::from_riyals(300)],
///     Some(Discount::Percentage(1000)),
///     VatRate::from_bps(1500),
/// )
/// .unwrap();
///
/// assert_eq!(quote.total.halalas(), 238_050); // SAR 2,380.50
/// ```
pub fn price_booking(
    base: Money,
    extras: &[Money],
    discount: Option<Discount>,
    vat_rate: VatRate,
) -> CoreResult<Quote> {
    if base.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "base price".to_string(),
        }
        .into());
    }
    if extras.iter().any(|e| e.is_negative()) {
        return Err(ValidationError::MustBePositive {
            field: "extra price".to_string(),
        }
        .into());
    }

    let subtotal = base + extras.iter().copied().sum();
    let discount_amount = discount
        .map(|d| discount_amount(subtotal, d))
        .unwrap_or_else(Money::zero);

    let after_discount = (subtotal - discount_amount).clamp_non_negative();
    let vat = after_discount.calculate_vat(vat_rate);

    Ok(Quote {
        subtotal,
        discount: discount_amount,
        vat,
        total: after_discount + vat,
    })
}

/// The discount a rule grants on a given subtotal.
///
/// Fixed discounts are clamped to the subtotal so they can never produce a
/// negative price; percentage discounts cannot exceed it because
/// [`crate::types::Coupon::discount`] caps the rate at 100% and
/// [`crate::validation::validate_coupon_discount`] rejects larger values
/// at insert.
pub fn discount_amount(subtotal: Money, discount: Discount) -> Money {
    match discount {
        Discount::Percentage(bps) => subtotal.percentage(bps),
        Discount::Fixed(amount) => amount.min(subtotal).clamp_non_negative(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VAT: VatRate = VatRate::from_bps(1500);

    #[test]
    fn test_no_extras_no_discount() {
        // SAR 1,000 → vat 150 → total 1,150
        let quote = price_booking(Money::from_riyals(1000), &[], None, VAT).unwrap();
        assert_eq!(quote.subtotal.halalas(), 100_000);
        assert_eq!(quote.discount, Money::zero());
        assert_eq!(quote.vat.halalas(), 15_000);
        assert_eq!(quote.total.halalas(), 115_000);
    }

    #[test]
    fn test_percentage_discount() {
        // SAR 1,000, 10% coupon → 900 + 135 vat = 1,035
        let quote = price_booking(
            Money::from_riyals(1000),
            &[],
            Some(Discount::Percentage(1000)),
            VAT,
        )
        .unwrap();
        assert_eq!(quote.discount.halalas(), 10_000);
        assert_eq!(quote.vat.halalas(), 13_500);
        assert_eq!(quote.total.halalas(), 103_500);
    }

    #[test]
    fn test_fixed_discount_clamped_to_subtotal() {
        // SAR 100 subtotal with a SAR 500 fixed coupon can't go negative
        let quote = price_booking(
            Money::from_riyals(100),
            &[],
            Some(Discount::Fixed(Money::from_riyals(500))),
            VAT,
        )
        .unwrap();
        assert_eq!(quote.discount.halalas(), 10_000); // clamped to subtotal
        assert_eq!(quote.vat, Money::zero());
        assert_eq!(quote.total, Money::zero());
    }

    #[test]
    fn test_extras_included_in_subtotal() {
        // Hall 2,000 + add-on 300, 10% coupon: 2,300 - 230 = 2,070
        // + 310.50 vat = 2,380.50
        let quote = price_booking(
            Money::from_riyals(2000),
            &[Money::from_riyals(300)],
            Some(Discount::Percentage(1000)),
            VAT,
        )
        .unwrap();
        assert_eq!(quote.subtotal.halalas(), 230_000);
        assert_eq!(quote.discount.halalas(), 23_000);
        assert_eq!(quote.vat.halalas(), 31_050);
        assert_eq!(quote.total.halalas(), 238_050);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(price_booking(Money::from_halalas(-1), &[], None, VAT).is_err());
        assert!(price_booking(
            Money::from_riyals(100),
            &[Money::from_halalas(-1)],
            None,
            VAT
        )
        .is_err());
    }

    #[test]
    fn test_negative_fixed_discount_ignored() {
        // A corrupt fixed discount below zero never increases the total
        let quote = price_booking(
            Money::from_riyals(100),
            &[],
            Some(Discount::Fixed(Money::from_halalas(-500))),
            VAT,
        )
        .unwrap();
        assert_eq!(quote.discount, Money::zero());
        assert_eq!(quote.total.halalas(), 11_500);
    }

    #[test]
    fn test_zero_vat_regime() {
        let quote = price_booking(Money::from_riyals(1000), &[], None, VatRate::zero()).unwrap();
        assert_eq!(quote.vat, Money::zero());
        assert_eq!(quote.total.halalas(), 100_000);
    }
}
