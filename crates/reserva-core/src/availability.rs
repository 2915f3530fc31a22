//! # Availability Module
//!
//! Decides whether a candidate date (or date range) can be booked against
//! a snapshot of the asset's existing bookings.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  candidate span                                                     │
//! │       │                                                             │
//! │       ├── starts before today?        ──► Unavailable::PastDate     │
//! │       │                                                             │
//! │       ├── expand non-cancelled bookings into blocked days           │
//! │       │                                                             │
//! │       ├── any candidate day blocked?  ──► Unavailable::Overlap      │
//! │       │                                                             │
//! │       └── Ok(())                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checker never queries the store: the caller fetches the snapshot
//! ("all non-cancelled bookings for asset X") and hands it in, so the
//! decision is deterministic and side-effect free.
//!
//! Time-slot bookings block their whole calendar day regardless of the
//! start/end times. Halls in this marketplace host one event per day; see
//! DESIGN.md before "fixing" this.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Booking;

// =============================================================================
// Date Span
// =============================================================================

/// An inclusive range of calendar days. A single-day booking is a span
/// with `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateSpan {
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[ts(as = "String")]
    pub to: NaiveDate,
}

impl DateSpan {
    /// A single-day span.
    #[inline]
    pub fn single(day: NaiveDate) -> Self {
        DateSpan { from: day, to: day }
    }

    /// A multi-day span; rejects an end before the start.
    pub fn range(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if to < from {
            return Err(ValidationError::InvertedDateRange);
        }
        Ok(DateSpan { from, to })
    }

    /// Iterates every calendar day in the span, inclusive on both ends.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let mut current = Some(self.from);
        let to = self.to;
        std::iter::from_fn(move || {
            let day = current?;
            if day > to {
                return None;
            }
            current = day.checked_add_days(Days::new(1));
            Some(day)
        })
    }
}

// =============================================================================
// Unavailability
// =============================================================================

/// Why a candidate span cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unavailable {
    /// The span starts before today. Any time on "today" is allowed;
    /// there is no same-day cutoff hour.
    #[error("requested date is in the past")]
    PastDate,

    /// At least one requested day collides with a non-cancelled booking.
    #[error("requested dates overlap an existing booking")]
    Overlap,
}

// =============================================================================
// Checks
// =============================================================================

/// Expands a booking snapshot into the set of blocked calendar days.
///
/// Every booking whose status is not cancelled contributes its full
/// inclusive span; a single-day booking contributes exactly one day.
/// Cancelled bookings release their dates immediately.
pub fn blocked_days(existing: &[Booking]) -> HashSet<NaiveDate> {
    existing
        .iter()
        .filter(|b| b.blocks_dates())
        .flat_map(|b| b.span().days().collect::<Vec<_>>())
        .collect()
}

/// Decides whether the candidate span is bookable.
///
/// `existing` must be the snapshot for the *same asset*; bookings against
/// other assets never block each other.
///
/// ## Example
/// ```rust
/// use reserva_core::availability::{check_availability, DateSpan, Unavailable};
///
/// let today = "2025-06-01".parse().unwrap();
/// let yesterday = "2025-05-31".parse().unwrap();
///
/// assert_eq!(
///     check_availability(DateSpan::single(yesterday), &[], today),
///     Err(Unavailable::PastDate)
/// );
/// assert!(check_availability(DateSpan::single(today), &[], today).is_ok());
/// ```
pub fn check_availability(
    candidate: DateSpan,
    existing: &[Booking],
    today: NaiveDate,
) -> Result<(), Unavailable> {
    // Past-date wins over overlap: a stale form should say "pick a new
    // date", not "date taken".
    if candidate.from < today {
        return Err(Unavailable::PastDate);
    }

    let blocked = blocked_days(existing);
    if candidate.days().any(|day| blocked.contains(&day)) {
        return Err(Unavailable::Overlap);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetKind, BookingStatus, PaymentStatus};
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn booking(from: &str, to: Option<&str>, status: BookingStatus) -> Booking {
        Booking {
            id: "b".into(),
            vendor_id: "v1".into(),
            asset_kind: AssetKind::Hall,
            asset_id: "h1".into(),
            user_id: None,
            guest_name: None,
            guest_phone: None,
            guest_email: None,
            booking_date: date(from),
            check_out_date: to.map(date),
            start_time: None,
            end_time: None,
            status,
            payment_status: PaymentStatus::Unpaid,
            subtotal_halalas: 0,
            discount_halalas: 0,
            vat_halalas: 0,
            total_halalas: 0,
            paid_halalas: 0,
            applied_coupon: None,
            notes: None,
            is_read: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_span_days_inclusive() {
        let span = DateSpan::range(date("2025-07-01"), date("2025-07-03")).unwrap();
        let days: Vec<_> = span.days().collect();
        assert_eq!(
            days,
            vec![date("2025-07-01"), date("2025-07-02"), date("2025-07-03")]
        );

        let single = DateSpan::single(date("2025-07-01"));
        assert_eq!(single.days().count(), 1);
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(DateSpan::range(date("2025-07-03"), date("2025-07-01")).is_err());
    }

    #[test]
    fn test_past_date_rejected_regardless_of_blocked_set() {
        let today = date("2025-06-02");
        // Yesterday is rejected even though nothing occupies it
        assert_eq!(
            check_availability(DateSpan::single(date("2025-06-01")), &[], today),
            Err(Unavailable::PastDate)
        );
        // Today itself is allowed, no cutoff hour
        assert!(check_availability(DateSpan::single(today), &[], today).is_ok());
    }

    #[test]
    fn test_overlap_on_same_day() {
        let today = date("2025-05-01");
        let existing = vec![booking("2025-06-01", None, BookingStatus::Pending)];

        assert_eq!(
            check_availability(DateSpan::single(date("2025-06-01")), &existing, today),
            Err(Unavailable::Overlap)
        );
        assert!(
            check_availability(DateSpan::single(date("2025-06-02")), &existing, today).is_ok()
        );
    }

    #[test]
    fn test_cancelled_booking_releases_its_date() {
        let today = date("2025-05-01");
        let existing = vec![booking("2025-06-01", None, BookingStatus::Cancelled)];

        assert!(
            check_availability(DateSpan::single(date("2025-06-01")), &existing, today).is_ok()
        );
    }

    #[test]
    fn test_blocked_status_blocks_date() {
        let today = date("2025-05-01");
        let existing = vec![booking("2025-06-01", None, BookingStatus::Blocked)];

        assert_eq!(
            check_availability(DateSpan::single(date("2025-06-01")), &existing, today),
            Err(Unavailable::Overlap)
        );
    }

    #[test]
    fn test_range_overlap_shares_boundary_day() {
        let today = date("2025-05-01");
        // Existing stay occupies 07-01..07-03 inclusive
        let existing = vec![booking(
            "2025-07-01",
            Some("2025-07-03"),
            BookingStatus::Confirmed,
        )];

        // Candidate 07-03..07-05 shares the boundary day
        let candidate = DateSpan::range(date("2025-07-03"), date("2025-07-05")).unwrap();
        assert_eq!(
            check_availability(candidate, &existing, today),
            Err(Unavailable::Overlap)
        );

        // 07-04..07-05 is clear
        let candidate = DateSpan::range(date("2025-07-04"), date("2025-07-05")).unwrap();
        assert!(check_availability(candidate, &existing, today).is_ok());
    }

    #[test]
    fn test_time_slot_blocks_whole_day() {
        let today = date("2025-05-01");
        let mut evening = booking("2025-06-01", None, BookingStatus::Confirmed);
        evening.start_time = Some("18:00:00".parse().unwrap());
        evening.end_time = Some("23:00:00".parse().unwrap());

        // A morning slot on the same day is still an overlap
        assert_eq!(
            check_availability(DateSpan::single(date("2025-06-01")), &[evening], today),
            Err(Unavailable::Overlap)
        );
    }

    #[test]
    fn test_deterministic_over_same_snapshot() {
        let today = date("2025-05-01");
        let existing = vec![booking("2025-06-01", None, BookingStatus::Pending)];
        let candidate = DateSpan::single(date("2025-06-01"));

        let first = check_availability(candidate, &existing, today);
        let second = check_availability(candidate, &existing, today);
        assert_eq!(first, second);
    }
}
