//! # Error Types
//!
//! Domain-specific error types for reserva-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  reserva-core errors (this file)                                    │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  reserva-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → UI message           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (booking id, amounts, statuses)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to a user-facing message; expected failures are
//!    returned, never thrown

use thiserror::Error;

use crate::availability::Unavailable;
use crate::coupon::CouponRejection;
use crate::money::Money;
use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are recoverable from the
/// caller's point of view: the operation is aborted with no partial state
/// change and a specific message is surfaced to the user.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Booking cannot be found.
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    /// Asset cannot be found (or is inactive).
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The requested dates cannot be booked.
    ///
    /// ## When This Occurs
    /// - Requested day is before today
    /// - Requested day(s) collide with a non-cancelled booking
    #[error("Date not available: {0}")]
    Unavailable(#[from] Unavailable),

    /// The coupon code cannot be applied to this booking.
    #[error("Coupon rejected: {0}")]
    CouponRejected(#[from] CouponRejection),

    /// A status transition the lifecycle matrix does not allow.
    ///
    /// ## When This Occurs
    /// - Confirming a cancelled booking
    /// - Completing a blocked date
    /// - Any edit racing another operator's transition
    #[error("Invalid transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Persisting would leave the booking with more paid than owed.
    ///
    /// The ledger tolerates a transient overshoot while recomputing, but a
    /// lifecycle transition must never commit one.
    #[error("Paid amount {paid} exceeds booking total {total}")]
    PaymentExceedsTotal { paid: Money, total: Money },

    /// Payment registration attempted through a read-only ledger view.
    #[error("Ledger is read-only for this caller")]
    ReadOnlyLedger,

    /// Payment reversal attempted without operator confirmation.
    #[error("Payment reversal requires operator confirmation")]
    ReversalNotConfirmed,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. invalid UUID, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A time slot that ends before (or when) it starts.
    #[error("start time must be before end time")]
    EmptyTimeSlot,

    /// A date range whose end precedes its start.
    #[error("check-out date must not be before the booking date")]
    InvertedDateRange,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PaymentExceedsTotal {
            paid: Money::from_halalas(120_000),
            total: Money::from_halalas(115_000),
        };
        assert_eq!(
            err.to_string(),
            "Paid amount 1200.00 exceeds booking total 1150.00"
        );

        let err = CoreError::InvalidTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        };
        assert_eq!(err.to_string(), "Invalid transition: Cancelled -> Confirmed");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "guest_name".to_string(),
        };
        assert_eq!(err.to_string(), "guest_name is required");

        let err = ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        };
        assert_eq!(err.to_string(), "payment amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptyTimeSlot;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
