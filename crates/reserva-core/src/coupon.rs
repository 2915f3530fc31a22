//! # Coupon Module
//!
//! Resolves a coupon code against a vendor's coupon set and produces the
//! discount the pricing module should apply.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  code (user input, any case)                                        │
//! │       │ upper-case                                                  │
//! │       ▼                                                             │
//! │  find in vendor's coupons ──► none?          NotFound               │
//! │       │                                                             │
//! │       ├── is_active false?                   Inactive               │
//! │       ├── today outside validity window?     Expired                │
//! │       ├── scoped and asset not in scope?     OutOfScope             │
//! │       │                                                             │
//! │       └── Ok(&Coupon) ──► Coupon::discount() ──► pricing            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution is pure over the supplied snapshot, so "remove coupon" in
//! the UI followed by re-applying the same code yields the same result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::Coupon;

// =============================================================================
// Rejection Reasons
// =============================================================================

/// Why a coupon code was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CouponRejection {
    /// No coupon with this code exists for the vendor.
    #[error("coupon code not found")]
    NotFound,

    /// The vendor deactivated the coupon.
    #[error("coupon is inactive")]
    Inactive,

    /// Today falls outside the coupon's validity window.
    #[error("coupon has expired or is not yet valid")]
    Expired,

    /// The coupon is scoped to other assets.
    #[error("coupon does not apply to this asset")]
    OutOfScope,
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves a coupon code for a booking against `asset_id`.
///
/// `coupons` is the caller-fetched snapshot of the vendor's coupons.
/// Lookup is case-insensitive: codes are stored upper-cased and the input
/// is normalized before comparison.
///
/// ## Example
/// ```rust,ignore
/// let coupon = resolve_coupon("eid10", "hall-a", &vendor_coupons, today)?;
/// let quote = price_booking(base, &extras, Some(coupon.discount()), vat)?;
/// ```
pub fn resolve_coupon<'a>(
    code: &str,
    asset_id: &str,
    coupons: &'a [Coupon],
    today: NaiveDate,
) -> Result<&'a Coupon, CouponRejection> {
    let normalized = code.trim().to_uppercase();

    let coupon = coupons
        .iter()
        .find(|c| c.code.to_uppercase() == normalized)
        .ok_or(CouponRejection::NotFound)?;

    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }
    if today < coupon.starts_on || today > coupon.ends_on {
        return Err(CouponRejection::Expired);
    }
    if !coupon.applies_to(asset_id) {
        return Err(CouponRejection::OutOfScope);
    }

    Ok(coupon)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::pricing::discount_amount;
    use crate::types::DiscountKind;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn coupon(code: &str, target_ids: Vec<String>) -> Coupon {
        Coupon {
            id: "c1".into(),
            vendor_id: "v1".into(),
            code: code.into(),
            discount_kind: DiscountKind::Percentage,
            discount_value: 1000,
            target_ids,
            starts_on: date("2025-01-01"),
            ends_on: date("2025-12-31"),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let coupons = vec![coupon("EID10", vec![])];
        let today = date("2025-06-01");

        assert!(resolve_coupon("eid10", "hall-a", &coupons, today).is_ok());
        assert!(resolve_coupon("  Eid10 ", "hall-a", &coupons, today).is_ok());
        assert_eq!(
            resolve_coupon("RAMADAN", "hall-a", &coupons, today),
            Err(CouponRejection::NotFound)
        );
    }

    #[test]
    fn test_inactive_rejected() {
        let mut c = coupon("EID10", vec![]);
        c.is_active = false;
        assert_eq!(
            resolve_coupon("EID10", "hall-a", &[c], date("2025-06-01")),
            Err(CouponRejection::Inactive)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let coupons = vec![coupon("EID10", vec![])];
        assert_eq!(
            resolve_coupon("EID10", "hall-a", &coupons, date("2026-01-01")),
            Err(CouponRejection::Expired)
        );
        // Not yet started counts as outside the window too
        assert_eq!(
            resolve_coupon("EID10", "hall-a", &coupons, date("2024-12-31")),
            Err(CouponRejection::Expired)
        );
        // Last valid day still applies
        assert!(resolve_coupon("EID10", "hall-a", &coupons, date("2025-12-31")).is_ok());
    }

    #[test]
    fn test_scope_rejection() {
        let coupons = vec![coupon("EID10", vec!["asset-a".into()])];
        let today = date("2025-06-01");

        assert!(resolve_coupon("EID10", "asset-a", &coupons, today).is_ok());
        assert_eq!(
            resolve_coupon("EID10", "asset-b", &coupons, today),
            Err(CouponRejection::OutOfScope)
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        // Apply, "remove" (client-side), apply again: same coupon, same
        // discount amount.
        let coupons = vec![coupon("EID10", vec![])];
        let today = date("2025-06-01");
        let subtotal = Money::from_riyals(2300);

        let first = resolve_coupon("EID10", "hall-a", &coupons, today).unwrap();
        let second = resolve_coupon("EID10", "hall-a", &coupons, today).unwrap();
        assert_eq!(
            discount_amount(subtotal, first.discount()),
            discount_amount(subtotal, second.discount())
        );
        assert_eq!(discount_amount(subtotal, first.discount()).halalas(), 23_000);
    }
}
