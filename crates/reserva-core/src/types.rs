//! # Domain Types
//!
//! Core domain types used throughout Reserva.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    Booking     │   │   PaymentLog   │   │     Coupon     │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  code (UPPER)  │      │
//! │  │  asset ref     │   │  booking_id FK │   │  discount kind │      │
//! │  │  status        │   │  method        │   │  target scope  │      │
//! │  │  total/paid    │   │  amount        │   │  validity      │      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    VatRate     │   │ BookingStatus  │   │ PaymentStatus  │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  bps (u32)     │   │  Pending ...   │   │  Unpaid        │      │
//! │  │  1500 = 15%    │   │  Blocked       │   │  Partial/Paid  │      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Asset Reference Pattern
//! The source data model carried three nullable foreign keys per booking
//! (hall_id / chalet_id / service_id) with an implicit "exactly one set"
//! rule. Here the target is a closed pair: [`AssetKind`] + `asset_id`.
//! A booking without a target, or with two, cannot be constructed.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the KSA standard rate, see [`crate::DEFAULT_VAT_BPS`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRate(u32);

impl VatRate {
    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    /// Creates a VAT rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        VatRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero VAT rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate(crate::DEFAULT_VAT_BPS)
    }
}

// =============================================================================
// Asset Kind
// =============================================================================

/// The kind of bookable asset.
///
/// Determines the scheduling shape of a booking:
/// - Hall: single day, optional intra-day time slot
/// - Chalet: date range (check-in .. check-out), priced per night
/// - Service: single date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Hall,
    Chalet,
    Service,
}

// =============================================================================
// Booking Status
// =============================================================================

/// The lifecycle status of a booking.
///
/// Transition rules live in [`crate::lifecycle`]; this enum is deliberately
/// data-only so every call site matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting vendor confirmation or payment.
    Pending,
    /// Confirmed; the date is committed.
    Confirmed,
    /// Cancelled; the date is released (terminal).
    Cancelled,
    /// The event took place (terminal).
    Completed,
    /// Date reserved pending payment; expires after 48 hours.
    OnHold,
    /// Vendor blocked the date without a customer (terminal).
    Blocked,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// How much of the booking total has been settled.
///
/// Always derived from the payment log sum via
/// [`crate::lifecycle::payment_status_for`] - never set by incrementing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash handed to the vendor.
    Cash,
    /// Card payment (gateway checkout or vendor terminal).
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Discounts
// =============================================================================

/// Persisted discriminator for a coupon's discount rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

/// A concrete discount handed to the pricing module.
///
/// ## Example
/// ```rust
/// use reserva_core::money::Money;
/// use reserva_core::types::Discount;
///
/// let ten_percent = Discount::Percentage(1000); // bps
/// let flat = Discount::Fixed(Money::from_riyals(50));
/// # let _ = (ten_percent, flat);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Discount {
    /// Percentage of the subtotal, in basis points (1000 = 10%).
    Percentage(u32),
    /// Fixed amount, clamped to the subtotal when applied.
    Fixed(Money),
}

// =============================================================================
// Checkout Mode
// =============================================================================

/// How the guest chose to pay at booking time.
///
/// Decides the initial booking and payment status, see
/// [`crate::lifecycle::initial_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "mode", content = "amount")]
pub enum CheckoutMode {
    /// Full payment through the gateway at booking time.
    PayNow,
    /// Reserve now, settle with the vendor later.
    PayLater,
    /// Partial deposit holds the date for 48 hours.
    Deposit(Money),
}

// =============================================================================
// Ledger Access
// =============================================================================

/// Caller-supplied capability for payment ledger operations.
///
/// Some views (e.g. a vendor's read-only payment history) must not be able
/// to register or reverse payments. This is a capability of the caller,
/// not a state of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAccess {
    ReadOnly,
    ReadWrite,
}

// =============================================================================
// Booking
// =============================================================================

/// One reservation of a hall, chalet or service for a date (or date range).
///
/// ## Financial Invariants
/// - `total = (subtotal - discount) + vat` (set once by pricing at creation)
/// - `paid` is a cached aggregate of the payment log; the ledger recomputes
///   it from the full log on every mutation, it is never incremented
/// - `paid <= total` is the target state; the ledger tolerates a transient
///   overshoot, the lifecycle guard rejects persisting one
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Vendor owning the booked asset.
    pub vendor_id: String,

    /// What kind of asset this reserves.
    pub asset_kind: AssetKind,

    /// The booked asset.
    pub asset_id: String,

    /// Registered user who booked, if any.
    pub user_id: Option<String>,

    /// Guest contact details (vendor manual entry or accountless booking).
    /// May coexist with `user_id` when a registered user books as itself.
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_email: Option<String>,

    /// First (or only) reserved day.
    #[ts(as = "String")]
    pub booking_date: NaiveDate,

    /// Last reserved day for multi-night chalet bookings (inclusive).
    #[ts(as = "Option<String>")]
    pub check_out_date: Option<NaiveDate>,

    /// Intra-day slot for hall bookings. Informational for availability:
    /// any booking blocks its whole calendar day regardless of times.
    #[ts(as = "Option<String>")]
    pub start_time: Option<NaiveTime>,
    #[ts(as = "Option<String>")]
    pub end_time: Option<NaiveTime>,

    pub status: BookingStatus,
    pub payment_status: PaymentStatus,

    /// Price before discount and VAT (base + add-ons).
    pub subtotal_halalas: i64,
    /// Discount actually applied (already clamped to the subtotal).
    pub discount_halalas: i64,
    /// VAT on the discounted subtotal.
    pub vat_halalas: i64,
    /// Authoritative display total: subtotal - discount + vat.
    pub total_halalas: i64,
    /// Cached sum of the payment log.
    pub paid_halalas: i64,

    /// Coupon code applied at creation time, upper-cased.
    pub applied_coupon: Option<String>,

    pub notes: Option<String>,

    /// Vendor inbox flag; orthogonal to the status machine.
    pub is_read: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns the booking total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_halalas(self.total_halalas)
    }

    /// Returns the cached paid aggregate as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_halalas(self.paid_halalas)
    }

    /// Remaining amount due (clamped to zero when fully settled).
    #[inline]
    pub fn remaining(&self) -> Money {
        (self.total() - self.paid()).clamp_non_negative()
    }

    /// The calendar days this booking occupies, as an inclusive span.
    pub fn span(&self) -> crate::availability::DateSpan {
        crate::availability::DateSpan {
            from: self.booking_date,
            to: self.check_out_date.unwrap_or(self.booking_date),
        }
    }

    /// Whether this booking blocks its dates for other bookings.
    #[inline]
    pub fn blocks_dates(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

// =============================================================================
// Booking Item
// =============================================================================

/// An add-on line item on a booking.
///
/// Uses the snapshot pattern: name and price are frozen at booking time so
/// the financial record survives later edits to the vendor's add-on list.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BookingItem {
    pub id: String,
    pub booking_id: String,
    /// Add-on name at booking time (frozen).
    pub name: String,
    /// Unit price in halalas at booking time (frozen).
    pub price_halalas: i64,
    pub quantity: i64,
    /// Free-form category shown on the booking detail ("addon", "extra").
    pub kind: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl BookingItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_halalas(self.price_halalas)
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment Log
// =============================================================================

/// One payment event against a booking. Append-only: corrections are
/// delete + recreate, never edit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentLog {
    pub id: String,
    pub booking_id: String,
    /// Denormalized for vendor-level reporting.
    pub vendor_id: String,
    /// Amount in halalas, always positive.
    pub amount_halalas: i64,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PaymentLog {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_halalas(self.amount_halalas)
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A discount rule scoped to a vendor and optionally to specific assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coupon {
    pub id: String,
    pub vendor_id: String,
    /// Unique per vendor; stored and compared upper-cased.
    pub code: String,
    pub discount_kind: DiscountKind,
    /// Basis points for percentage coupons, halalas for fixed coupons.
    pub discount_value: i64,
    /// Asset ids this coupon applies to. Empty = all of the vendor's assets.
    pub target_ids: Vec<String>,
    #[ts(as = "String")]
    pub starts_on: NaiveDate,
    #[ts(as = "String")]
    pub ends_on: NaiveDate,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// The concrete discount this coupon grants.
    ///
    /// The persisted value is re-checked here: percentage rates are capped
    /// at 100% (10000 bps) and fixed amounts floored at zero, so a corrupt
    /// row can never invert into a larger discount or a free booking.
    /// [`crate::validation::validate_coupon_discount`] rejects such values
    /// before they are stored in the first place.
    pub fn discount(&self) -> Discount {
        match self.discount_kind {
            DiscountKind::Percentage => {
                Discount::Percentage(self.discount_value.clamp(0, 10_000) as u32)
            }
            DiscountKind::Fixed => {
                Discount::Fixed(Money::from_halalas(self.discount_value.max(0)))
            }
        }
    }

    /// Whether the coupon's scope covers the given asset.
    ///
    /// An empty target set means the coupon applies to every asset the
    /// vendor owns.
    pub fn applies_to(&self, asset_id: &str) -> bool {
        self.target_ids.is_empty() || self.target_ids.iter().any(|t| t == asset_id)
    }
}

// =============================================================================
// Asset
// =============================================================================

/// An add-on a vendor offers alongside an asset (e.g. catering, decor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Addon {
    pub name: String,
    pub price_halalas: i64,
}

impl Addon {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_halalas(self.price_halalas)
    }
}

/// A bookable hall, chalet or service. Read-only from the core's
/// perspective: pricing reads it, nothing here mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Asset {
    pub id: String,
    pub vendor_id: String,
    pub kind: AssetKind,
    pub name: String,
    /// Flat price for halls/services; per-night price for chalets.
    pub price_halalas: i64,
    pub capacity: Option<i64>,
    pub addons: Vec<Addon>,
    pub policies: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Asset {
    /// Base price for a stay over the given span.
    ///
    /// Chalets price per night: a span of 2025-07-01..2025-07-03 is two
    /// nights. Halls and services have a flat price regardless of span.
    pub fn base_price(&self, span: crate::availability::DateSpan) -> Money {
        match self.kind {
            AssetKind::Chalet => {
                let nights = (span.to - span.from).num_days().max(1);
                Money::from_halalas(self.price_halalas).multiply_quantity(nights)
            }
            AssetKind::Hall | AssetKind::Service => Money::from_halalas(self.price_halalas),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::DateSpan;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_vat_rate_from_bps() {
        let rate = VatRate::from_bps(1500);
        assert_eq!(rate.bps(), 1500);
        assert!((rate.percentage() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_vat_rate_default_is_domain_rate() {
        assert_eq!(VatRate::default().bps(), crate::DEFAULT_VAT_BPS);
    }

    #[test]
    fn test_coupon_scope() {
        let mut coupon = Coupon {
            id: "c1".into(),
            vendor_id: "v1".into(),
            code: "EID10".into(),
            discount_kind: DiscountKind::Percentage,
            discount_value: 1000,
            target_ids: vec![],
            starts_on: date("2025-01-01"),
            ends_on: date("2025-12-31"),
            is_active: true,
            created_at: Utc::now(),
        };

        // Empty scope applies everywhere
        assert!(coupon.applies_to("hall-a"));
        assert!(coupon.applies_to("hall-b"));

        coupon.target_ids = vec!["hall-a".into()];
        assert!(coupon.applies_to("hall-a"));
        assert!(!coupon.applies_to("hall-b"));
    }

    #[test]
    fn test_corrupt_discount_values_clamped() {
        let mut coupon = Coupon {
            id: "c1".into(),
            vendor_id: "v1".into(),
            code: "BAD".into(),
            discount_kind: DiscountKind::Percentage,
            discount_value: -1,
            target_ids: vec![],
            starts_on: date("2025-01-01"),
            ends_on: date("2025-12-31"),
            is_active: true,
            created_at: Utc::now(),
        };

        // A negative percentage value must not wrap into a huge rate that
        // zeroes the booking; it reads as no discount at all
        assert_eq!(coupon.discount(), Discount::Percentage(0));
        let quote = crate::pricing::price_booking(
            Money::from_riyals(1000),
            &[],
            Some(coupon.discount()),
            VatRate::from_bps(1500),
        )
        .unwrap();
        assert_eq!(quote.discount, Money::zero());
        assert_eq!(quote.total.halalas(), 115_000);

        // Above 100% caps at 100%
        coupon.discount_value = 20_000;
        assert_eq!(coupon.discount(), Discount::Percentage(10_000));

        // A negative fixed amount floors at zero
        coupon.discount_kind = DiscountKind::Fixed;
        coupon.discount_value = -50_000;
        assert_eq!(coupon.discount(), Discount::Fixed(Money::zero()));
    }

    #[test]
    fn test_chalet_prices_per_night() {
        let chalet = Asset {
            id: "ch1".into(),
            vendor_id: "v1".into(),
            kind: AssetKind::Chalet,
            name: "Seaside".into(),
            price_halalas: 85_000, // SAR 850 / night
            capacity: Some(12),
            addons: vec![],
            policies: None,
            is_active: true,
            created_at: Utc::now(),
        };

        let two_nights = DateSpan {
            from: date("2025-07-01"),
            to: date("2025-07-03"),
        };
        assert_eq!(chalet.base_price(two_nights).halalas(), 170_000);

        // Same-day span still charges one night
        let same_day = DateSpan {
            from: date("2025-07-01"),
            to: date("2025-07-01"),
        };
        assert_eq!(chalet.base_price(same_day).halalas(), 85_000);
    }

    #[test]
    fn test_booking_remaining_clamps() {
        let booking = Booking {
            id: "b1".into(),
            vendor_id: "v1".into(),
            asset_kind: AssetKind::Hall,
            asset_id: "h1".into(),
            user_id: None,
            guest_name: Some("Huda".into()),
            guest_phone: None,
            guest_email: None,
            booking_date: date("2025-06-01"),
            check_out_date: None,
            start_time: None,
            end_time: None,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            subtotal_halalas: 100_000,
            discount_halalas: 0,
            vat_halalas: 15_000,
            total_halalas: 115_000,
            paid_halalas: 120_000, // overshoot tolerated
            applied_coupon: None,
            notes: None,
            is_read: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(booking.remaining(), Money::zero());
        assert!(booking.blocks_dates());
    }

    #[test]
    fn test_item_line_total() {
        let item = BookingItem {
            id: "i1".into(),
            booking_id: "b1".into(),
            name: "Coffee corner".into(),
            price_halalas: 30_000,
            quantity: 2,
            kind: "addon".into(),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total().halalas(), 60_000);
    }
}
