//! # Lifecycle Module
//!
//! The booking status state machine and the payment-status derivation
//! rules. Every path that creates or edits a booking - guest wizard,
//! vendor manual entry, payment ledger - goes through these functions.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │   pending ──► confirmed ──► completed                               │
//! │      │    └─► on_hold ──► confirmed                                 │
//! │      │    └─► blocked        │                                      │
//! │      │    └─► completed      │                                      │
//! │      └──────► cancelled ◄────┘  (on_hold also expires → cancelled)  │
//! │                                                                     │
//! │   cancelled / completed / blocked are terminal                      │
//! │                                                                     │
//! │   payment: unpaid ──► partial ──► paid   (derived from ledger sum)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On-hold bookings soft-expire after [`crate::HOLD_EXPIRY_HOURS`]; the
//! service layer enforces this lazily on read via [`hold_expired`].

use chrono::{DateTime, Duration, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{BookingStatus, CheckoutMode, PaymentStatus};

// =============================================================================
// Transition Matrix
// =============================================================================

/// Whether the status machine allows `from -> to`.
///
/// Exhaustive on purpose: adding a status without deciding its transitions
/// is a compile error.
pub fn transition_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Confirmed | Cancelled | OnHold | Blocked | Completed) => true,
        (Confirmed, Cancelled | Completed) => true,
        (OnHold, Confirmed | Cancelled) => true,
        // Terminal states
        (Cancelled | Completed | Blocked, _) => false,
        // Everything else (incl. self-transitions) is a no-op we reject
        (Pending | Confirmed | OnHold, _) => false,
    }
}

/// Validates a transition, with context for the error message.
pub fn check_transition(from: BookingStatus, to: BookingStatus) -> CoreResult<()> {
    if transition_allowed(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition { from, to })
    }
}

// =============================================================================
// Payment Status Derivation
// =============================================================================

/// Derives the payment status from amounts.
///
/// This is the *only* place the unpaid/partial/paid decision is made; the
/// ledger and both creation paths call it with the recomputed log sum.
///
/// A zero-total booking never reads `Paid`: with no payments it stays
/// `Unpaid`, and a positive payment against it is an overshoot that reads
/// `Partial` until reversed ([`check_financials`] blocks transitions while
/// it stands).
pub fn payment_status_for(paid: Money, total: Money) -> PaymentStatus {
    if paid >= total && !total.is_zero() {
        PaymentStatus::Paid
    } else if paid.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

/// Rejects persisting a paid amount above the booking total.
///
/// The ledger recompute may transiently overshoot (it reports Paid and
/// keeps the true log sum); a lifecycle transition must not commit one.
pub fn check_financials(paid: Money, total: Money) -> CoreResult<()> {
    if paid > total {
        return Err(CoreError::PaymentExceedsTotal { paid, total });
    }
    Ok(())
}

/// Normalizes a vendor's manually entered payment fields.
///
/// ## Rules
/// - `Partial` with a zero paid amount is a data-entry error
/// - An amount at or above the total auto-upgrades the status to `Paid`
///   (explicit normalization, never silently dropped)
/// - An amount above the total is rejected outright
/// - `Paid` with less than the total downgrades to what the amount says
///
/// ## Example
/// ```rust
/// use reserva_core::lifecycle::normalize_manual_entry;
/// use reserva_core::money::Money;
/// use reserva_core::types::PaymentStatus;
///
/// let total = Money::from_riyals(1000);
/// let status =
///     normalize_manual_entry(PaymentStatus::Partial, total, total).unwrap();
/// assert_eq!(status, PaymentStatus::Paid);
/// ```
pub fn normalize_manual_entry(
    requested: PaymentStatus,
    paid: Money,
    total: Money,
) -> CoreResult<PaymentStatus> {
    if paid.is_negative() {
        return Err(ValidationError::MustBePositive {
            field: "paid amount".to_string(),
        }
        .into());
    }
    if paid > total {
        return Err(CoreError::PaymentExceedsTotal { paid, total });
    }
    if requested == PaymentStatus::Partial && paid.is_zero() {
        return Err(ValidationError::MustBePositive {
            field: "paid amount".to_string(),
        }
        .into());
    }

    Ok(payment_status_for(paid, total))
}

// =============================================================================
// Creation Paths
// =============================================================================

/// Initial booking state for a guest checkout choice.
///
/// ```text
/// pay now        → confirmed, paid,   paid_amount = total
/// pay later      → pending,   unpaid, paid_amount = 0
/// deposit (d)    → on_hold,   partial|unpaid, paid_amount = d
/// ```
pub fn initial_state(mode: CheckoutMode, total: Money) -> (BookingStatus, PaymentStatus, Money) {
    match mode {
        CheckoutMode::PayNow => (BookingStatus::Confirmed, PaymentStatus::Paid, total),
        CheckoutMode::PayLater => (BookingStatus::Pending, PaymentStatus::Unpaid, Money::zero()),
        CheckoutMode::Deposit(amount) => {
            let deposit = amount.clamp_non_negative().min(total);
            (
                BookingStatus::OnHold,
                payment_status_for(deposit, total),
                deposit,
            )
        }
    }
}

// =============================================================================
// Hold Expiry
// =============================================================================

/// Whether an on-hold booking has outlived its reservation window.
///
/// The window starts when the booking was created; expiry is evaluated
/// lazily (on read or by a sweep), so `now` is a parameter.
pub fn hold_expired(held_since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - held_since >= Duration::hours(crate::HOLD_EXPIRY_HOURS)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_transition_matrix() {
        // Pending fans out everywhere
        for to in [Confirmed, Cancelled, OnHold, Blocked, Completed] {
            assert!(transition_allowed(Pending, to), "pending -> {to:?}");
        }

        assert!(transition_allowed(Confirmed, Cancelled));
        assert!(transition_allowed(Confirmed, Completed));
        assert!(!transition_allowed(Confirmed, OnHold));

        assert!(transition_allowed(OnHold, Confirmed));
        assert!(transition_allowed(OnHold, Cancelled));
        assert!(!transition_allowed(OnHold, Completed));

        // Terminal states admit nothing
        for from in [Cancelled, Completed, Blocked] {
            for to in [Pending, Confirmed, Cancelled, Completed, OnHold, Blocked] {
                assert!(!transition_allowed(from, to), "{from:?} -> {to:?}");
            }
        }

        // Self-transitions are rejected
        assert!(!transition_allowed(Pending, Pending));
    }

    #[test]
    fn test_check_transition_error_context() {
        let err = check_transition(Cancelled, Confirmed).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: Cancelled,
                to: Confirmed
            }
        ));
    }

    #[test]
    fn test_payment_status_derivation() {
        let total = Money::from_riyals(100);

        assert_eq!(
            payment_status_for(Money::zero(), total),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            payment_status_for(Money::from_riyals(40), total),
            PaymentStatus::Partial
        );
        assert_eq!(payment_status_for(total, total), PaymentStatus::Paid);
        // Overshoot still reads as paid
        assert_eq!(
            payment_status_for(Money::from_riyals(120), total),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_free_booking_is_not_paid() {
        // A zero-total booking with no payments stays unpaid rather than
        // flipping to paid on 0 >= 0.
        assert_eq!(
            payment_status_for(Money::zero(), Money::zero()),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_payment_on_free_booking_reads_partial() {
        // Money recorded against a zero-total booking is an overshoot, not
        // a settlement: it reads partial until reversed, and the financial
        // guard refuses to commit a transition while it stands.
        assert_eq!(
            payment_status_for(Money::from_riyals(10), Money::zero()),
            PaymentStatus::Partial
        );
        assert!(check_financials(Money::from_riyals(10), Money::zero()).is_err());
    }

    #[test]
    fn test_check_financials() {
        let total = Money::from_riyals(100);
        assert!(check_financials(Money::from_riyals(100), total).is_ok());
        assert!(check_financials(Money::from_riyals(101), total).is_err());
    }

    #[test]
    fn test_manual_entry_auto_upgrade() {
        let total = Money::from_riyals(1000);

        // Vendor picked "partial" but typed the full amount
        let status = normalize_manual_entry(PaymentStatus::Partial, total, total).unwrap();
        assert_eq!(status, PaymentStatus::Paid);

        // Genuine partial stays partial
        let status =
            normalize_manual_entry(PaymentStatus::Partial, Money::from_riyals(400), total).unwrap();
        assert_eq!(status, PaymentStatus::Partial);
    }

    #[test]
    fn test_manual_entry_rejects_bad_amounts() {
        let total = Money::from_riyals(1000);

        // Partial with nothing paid
        assert!(normalize_manual_entry(PaymentStatus::Partial, Money::zero(), total).is_err());
        // More than owed
        assert!(
            normalize_manual_entry(PaymentStatus::Paid, Money::from_riyals(1001), total).is_err()
        );
        // Negative
        assert!(normalize_manual_entry(
            PaymentStatus::Unpaid,
            Money::from_halalas(-1),
            total
        )
        .is_err());
    }

    #[test]
    fn test_initial_states() {
        let total = Money::from_riyals(2380);

        let (status, pay, paid) = initial_state(CheckoutMode::PayNow, total);
        assert_eq!(status, Confirmed);
        assert_eq!(pay, PaymentStatus::Paid);
        assert_eq!(paid, total);

        let (status, pay, paid) = initial_state(CheckoutMode::PayLater, total);
        assert_eq!(status, Pending);
        assert_eq!(pay, PaymentStatus::Unpaid);
        assert!(paid.is_zero());

        let (status, pay, paid) =
            initial_state(CheckoutMode::Deposit(Money::from_riyals(500)), total);
        assert_eq!(status, OnHold);
        assert_eq!(pay, PaymentStatus::Partial);
        assert_eq!(paid, Money::from_riyals(500));

        // Zero deposit still holds the date, unpaid
        let (status, pay, paid) = initial_state(CheckoutMode::Deposit(Money::zero()), total);
        assert_eq!(status, OnHold);
        assert_eq!(pay, PaymentStatus::Unpaid);
        assert!(paid.is_zero());
    }

    #[test]
    fn test_hold_expiry() {
        let held = Utc::now();
        assert!(!hold_expired(held, held + Duration::hours(47)));
        assert!(hold_expired(held, held + Duration::hours(48)));
        assert!(hold_expired(held, held + Duration::hours(72)));
    }
}
