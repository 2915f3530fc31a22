//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A booking total drifting by a halala across the wizard, the        │
//! │  vendor back-office and the payment ledger means three screens      │
//! │  showing three different "remaining" amounts.                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Halalas                                      │
//! │    SAR 2,380.50 = 238050 halalas, everywhere, always               │
//! │    Rounding happens exactly once, inside this module               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use reserva_core::money::Money;
//!
//! // Create from halalas (preferred)
//! let price = Money::from_halalas(105_000); // SAR 1,050.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_halalas(30_000);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(1050.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::VatRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (halalas for SAR).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction of two amounts stays closed under the type
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every amount in the system flows through this type: asset prices,
/// add-on prices, coupon discounts, VAT, booking totals and payment log
/// entries. Persisted columns store the raw halala value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from halalas (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Money;
    ///
    /// let price = Money::from_halalas(115_000); // SAR 1,150.00
    /// assert_eq!(price.halalas(), 115_000);
    /// ```
    #[inline]
    pub const fn from_halalas(halalas: i64) -> Self {
        Money(halalas)
    }

    /// Creates a Money value from whole riyals.
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Money;
    ///
    /// let price = Money::from_riyals(2000); // SAR 2,000.00
    /// assert_eq!(price.halalas(), 200_000);
    /// ```
    #[inline]
    pub const fn from_riyals(riyals: i64) -> Self {
        Money(riyals * 100)
    }

    /// Returns the value in halalas (smallest currency unit).
    #[inline]
    pub const fn halalas(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (riyals) portion.
    #[inline]
    pub const fn riyals(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Clamps a negative amount to zero.
    ///
    /// Used after discount subtraction: a discount can never push a
    /// subtotal below zero.
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Calculates VAT on this amount, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5). i128 intermediate
    /// prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Money;
    /// use reserva_core::types::VatRate;
    ///
    /// // SAR 2,070.00 at 15% = SAR 310.50
    /// let base = Money::from_halalas(207_000);
    /// let vat = base.calculate_vat(VatRate::from_bps(1500));
    /// assert_eq!(vat.halalas(), 31_050);
    /// ```
    pub fn calculate_vat(&self, rate: VatRate) -> Money {
        let vat = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_halalas(vat as i64)
    }

    /// Returns the given percentage of this amount (for percentage coupons).
    ///
    /// ## Arguments
    /// * `bps` - Percentage in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Money;
    ///
    /// let subtotal = Money::from_halalas(230_000); // SAR 2,300.00
    /// let discount = subtotal.percentage(1000);    // 10% coupon
    /// assert_eq!(discount.halalas(), 23_000);      // SAR 230.00
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_halalas(part as i64)
    }

    /// Multiplies money by a quantity (line totals, nightly rates).
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Money;
    ///
    /// let per_night = Money::from_riyals(850);
    /// assert_eq!(per_night.multiply_quantity(3).riyals(), 2550);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The UI formats amounts itself to
/// handle localization (Arabic numerals, currency placement).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.riyals().abs(), self.minor_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sums an iterator of amounts (add-on extras, payment log entries).
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_halalas() {
        let money = Money::from_halalas(105_099);
        assert_eq!(money.halalas(), 105_099);
        assert_eq!(money.riyals(), 1050);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_riyals() {
        assert_eq!(Money::from_riyals(2000).halalas(), 200_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_halalas(105_099)), "1050.99");
        assert_eq!(format!("{}", Money::from_halalas(500)), "5.00");
        assert_eq!(format!("{}", Money::from_halalas(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_halalas(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_halalas(1000);
        let b = Money::from_halalas(500);

        assert_eq!((a + b).halalas(), 1500);
        assert_eq!((a - b).halalas(), 500);
        let result: Money = a * 3;
        assert_eq!(result.halalas(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [50_00, 30_00, 20_00]
            .into_iter()
            .map(Money::from_halalas)
            .sum();
        assert_eq!(total.halalas(), 100_00);
    }

    #[test]
    fn test_vat_basic() {
        // SAR 1,000.00 at 15% = SAR 150.00
        let amount = Money::from_riyals(1000);
        let vat = amount.calculate_vat(VatRate::from_bps(1500));
        assert_eq!(vat.halalas(), 15_000);
    }

    #[test]
    fn test_vat_with_rounding() {
        // 33 halalas at 15% = 4.95 → rounds to 5
        let amount = Money::from_halalas(33);
        let vat = amount.calculate_vat(VatRate::from_bps(1500));
        assert_eq!(vat.halalas(), 5);
    }

    #[test]
    fn test_percentage() {
        let subtotal = Money::from_riyals(1000);
        assert_eq!(subtotal.percentage(1000).halalas(), 10_000); // 10%
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_halalas(-1).clamp_non_negative(), Money::zero());
        let positive = Money::from_halalas(7);
        assert_eq!(positive.clamp_non_negative(), positive);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_halalas(100);
        assert!(positive.is_positive());

        let negative = Money::from_halalas(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_min() {
        let a = Money::from_halalas(100);
        let b = Money::from_halalas(500);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), a);
    }
}
