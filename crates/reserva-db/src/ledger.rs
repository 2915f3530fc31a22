//! # Payment Ledger
//!
//! The write side of the payment log. Every mutation follows the same
//! shape, in ONE transaction:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. Load the booking (row must exist)                               │
//! │  2. INSERT or DELETE the payment_logs row                           │
//! │  3. Recompute paid = SUM(amount_halalas) over the FULL log          │
//! │  4. Derive payment_status from (paid, total)                        │
//! │  5. UPDATE bookings.paid_halalas / payment_status / updated_at      │
//! │  6. COMMIT                                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cached `paid_halalas` is always recomputed from the full log, never
//! incremented, so a failed mutation leaves no drift: either the log row
//! and the aggregate both land, or neither does.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, instrument};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use reserva_core::{
    lifecycle, validation, CoreError, LedgerAccess, Money, PaymentLog, PaymentMethod,
    PaymentStatus,
};

// =============================================================================
// Ledger Totals
// =============================================================================

/// The booking's financial state after a ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Recomputed sum of all log entries.
    pub paid: Money,
    /// Status derived from the recomputed sum.
    pub payment_status: PaymentStatus,
}

// =============================================================================
// Payment Ledger
// =============================================================================

/// Transactional writer for the payment log.
///
/// Readers use [`crate::repository::payment_log::PaymentLogRepository`];
/// this type owns every mutation so the log and the booking's cached
/// aggregate can never disagree.
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    pool: SqlitePool,
}

impl PaymentLedger {
    /// Creates a new PaymentLedger.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentLedger { pool }
    }

    /// Appends a payment and recomputes the booking's aggregate.
    ///
    /// ## Errors
    /// - `Domain(ReadOnlyLedger)` if the caller holds read-only access
    /// - `Domain(Validation)` if the amount is not strictly positive
    /// - `NotFound` if the booking does not exist
    #[instrument(skip(self), fields(booking_id = %booking_id, amount = %amount))]
    pub async fn add_payment(
        &self,
        booking_id: &str,
        amount: Money,
        method: PaymentMethod,
        notes: Option<&str>,
        access: LedgerAccess,
    ) -> DbResult<LedgerTotals> {
        check_access(access)?;
        validation::validate_payment_amount(amount)?;

        let mut tx = self.pool.begin().await?;

        let (vendor_id, total) = booking_financials(&mut tx, booking_id).await?;

        let log = PaymentLog {
            id: generate_id(),
            booking_id: booking_id.to_string(),
            vendor_id,
            amount_halalas: amount.halalas(),
            method,
            notes: notes.map(str::to_string),
            created_at: chrono::Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO payment_logs (
                id, booking_id, vendor_id, amount_halalas, method, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&log.id)
        .bind(&log.booking_id)
        .bind(&log.vendor_id)
        .bind(log.amount_halalas)
        .bind(log.method)
        .bind(&log.notes)
        .bind(log.created_at)
        .execute(&mut *tx)
        .await?;

        let totals = recompute(&mut tx, booking_id, total).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking_id,
            paid = %totals.paid,
            status = ?totals.payment_status,
            "Payment registered"
        );
        Ok(totals)
    }

    /// Removes a payment (reversal) and recomputes the booking's aggregate.
    ///
    /// Operator confirmation is the service layer's concern; by the time a
    /// reversal reaches the ledger it is authorized.
    #[instrument(skip(self), fields(log_id = %log_id))]
    pub async fn remove_payment(&self, log_id: &str, access: LedgerAccess) -> DbResult<LedgerTotals> {
        check_access(access)?;

        let mut tx = self.pool.begin().await?;

        let booking_id: Option<String> =
            sqlx::query_scalar("SELECT booking_id FROM payment_logs WHERE id = ?1")
                .bind(log_id)
                .fetch_optional(&mut *tx)
                .await?;

        let booking_id = booking_id.ok_or_else(|| DbError::not_found("PaymentLog", log_id))?;
        let (_, total) = booking_financials(&mut tx, &booking_id).await?;

        sqlx::query("DELETE FROM payment_logs WHERE id = ?1")
            .bind(log_id)
            .execute(&mut *tx)
            .await?;

        let totals = recompute(&mut tx, &booking_id, total).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking_id,
            paid = %totals.paid,
            status = ?totals.payment_status,
            "Payment reversed"
        );
        Ok(totals)
    }
}

// =============================================================================
// Internals
// =============================================================================

fn check_access(access: LedgerAccess) -> DbResult<()> {
    match access {
        LedgerAccess::ReadWrite => Ok(()),
        LedgerAccess::ReadOnly => Err(DbError::Domain(CoreError::ReadOnlyLedger)),
    }
}

/// Loads the owning booking's vendor and total inside the transaction.
async fn booking_financials(
    tx: &mut Transaction<'_, Sqlite>,
    booking_id: &str,
) -> DbResult<(String, Money)> {
    let row: Option<(String, i64)> =
        sqlx::query_as("SELECT vendor_id, total_halalas FROM bookings WHERE id = ?1")
            .bind(booking_id)
            .fetch_optional(&mut **tx)
            .await?;

    let (vendor_id, total) = row.ok_or_else(|| DbError::not_found("Booking", booking_id))?;
    Ok((vendor_id, Money::from_halalas(total)))
}

/// Recomputes the full-log sum and writes it back to the booking.
async fn recompute(
    tx: &mut Transaction<'_, Sqlite>,
    booking_id: &str,
    total: Money,
) -> DbResult<LedgerTotals> {
    let sum: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_halalas), 0) FROM payment_logs WHERE booking_id = ?1",
    )
    .bind(booking_id)
    .fetch_one(&mut **tx)
    .await?;

    let paid = Money::from_halalas(sum);
    let payment_status = lifecycle::payment_status_for(paid, total);

    sqlx::query(
        r#"
        UPDATE bookings SET paid_halalas = ?2, payment_status = ?3, updated_at = ?4
        WHERE id = ?1
        "#,
    )
    .bind(booking_id)
    .bind(paid.halalas())
    .bind(payment_status)
    .bind(chrono::Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(LedgerTotals {
        paid,
        payment_status,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
