//! # reserva-core: Pure Business Logic for Reserva
//!
//! This crate is the **heart** of the Reserva venue-booking marketplace.
//! It contains every rule that decides what a booking costs, whether a date
//! can be booked, and which states a booking may move through - as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Reserva Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                     Web UI (guest + vendor)                 │   │
//! │  │   Booking wizard ──► Manual booking ──► Payment history     │   │
//! │  └───────────────────────────┬─────────────────────────────────┘   │
//! │                              │                                      │
//! │  ┌───────────────────────────▼─────────────────────────────────┐   │
//! │  │               ★ reserva-core (THIS CRATE) ★                 │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌────────────┐ ┌────────┐ ┌───────────┐       │   │
//! │  │  │ pricing │ │availability│ │ coupon │ │ lifecycle │       │   │
//! │  │  │  Money  │ │  DateSpan  │ │ resolve│ │ statuses  │       │   │
//! │  │  └─────────┘ └────────────┘ └────────┘ └───────────┘       │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └───────────────────────────┬─────────────────────────────────┘   │
//! │                              │                                      │
//! │  ┌───────────────────────────▼─────────────────────────────────┐   │
//! │  │                 reserva-db (Database Layer)                 │   │
//! │  │      SQLite repositories, payment ledger, migrations        │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Booking, PaymentLog, Coupon, Asset, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Subtotal / discount / VAT / total computation
//! - [`availability`] - Past-date and overlap checks over a booking snapshot
//! - [`coupon`] - Coupon code resolution against a vendor's coupon set
//! - [`lifecycle`] - Booking and payment status state machine
//! - [`validation`] - Input validation
//! - [`notify`] - Notification port (toast sink implemented by callers)
//! - [`checkout`] - Typed payloads for the external checkout redirect
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same snapshot in, same decision out
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All amounts are in halalas (i64) to avoid float errors
//! 4. **Closed Enums**: Booking and payment statuses are exhaustive enums, so
//!    invalid states are unrepresentable
//!
//! ## Example Usage
//!
//! ```rust
//! use reserva_core::money::Money;
//! use reserva_core::pricing::price_booking;
//! use reserva_core::types::VatRate;
//!
//! // SAR 1,000.00 hall, no extras, no discount, 15% VAT
//! let quote = price_booking(
//!     Money::from_halalas(100_000),
//!     &[],
//!     None,
//!     VatRate::from_bps(1500),
//! )
//! .unwrap();
//!
//! assert_eq!(quote.vat.halalas(), 15_000);
//! assert_eq!(quote.total.halalas(), 115_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod checkout;
pub mod coupon;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod notify;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use reserva_core::Money` instead of
// `use reserva_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default VAT rate in basis points (1500 = 15%, KSA standard rate).
///
/// ## Why a constant?
/// The marketplace currently operates in a single tax regime. The rate is
/// threaded through [`pricing::price_booking`] as a parameter so other
/// regimes stay possible; this constant is only the domain default.
pub const DEFAULT_VAT_BPS: u32 = 1500;

/// Default currency code handed to the checkout gateway.
pub const DEFAULT_CURRENCY: &str = "SAR";

/// Hours an on-hold booking reserves its date before it expires.
///
/// Expiry is enforced lazily by the service layer (on read / periodic
/// sweep), not by this crate - see `BookingService::expire_stale_holds`.
pub const HOLD_EXPIRY_HOURS: i64 = 48;

/// Maximum add-on line items on a single booking.
///
/// ## Business Reason
/// Prevents runaway bookings from the public wizard (e.g. a stuck "add"
/// button). Can be made configurable per-vendor in future versions.
pub const MAX_BOOKING_ITEMS: usize = 50;
