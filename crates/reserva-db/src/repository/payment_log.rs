//! # Payment Log Repository
//!
//! Read-side queries over the append-only payment log. Writes go through
//! [`crate::ledger::PaymentLedger`], which pairs every log mutation with a
//! recompute of the owning booking's cached aggregate in one transaction.

use sqlx::SqlitePool;

use crate::error::DbResult;
use reserva_core::PaymentLog;

/// Repository for payment log queries.
#[derive(Debug, Clone)]
pub struct PaymentLogRepository {
    pool: SqlitePool,
}

impl PaymentLogRepository {
    /// Creates a new PaymentLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentLogRepository { pool }
    }

    /// Gets one log entry by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PaymentLog>> {
        let log = sqlx::query_as::<_, PaymentLog>(
            r#"
            SELECT id, booking_id, vendor_id, amount_halalas, method, notes, created_at
            FROM payment_logs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(log)
    }

    /// All payments for a booking, oldest first (payment history view).
    pub async fn list_for_booking(&self, booking_id: &str) -> DbResult<Vec<PaymentLog>> {
        let logs = sqlx::query_as::<_, PaymentLog>(
            r#"
            SELECT id, booking_id, vendor_id, amount_halalas, method, notes, created_at
            FROM payment_logs
            WHERE booking_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// All payments registered for a vendor, newest first (reporting).
    pub async fn list_for_vendor(&self, vendor_id: &str, limit: i64) -> DbResult<Vec<PaymentLog>> {
        let logs = sqlx::query_as::<_, PaymentLog>(
            r#"
            SELECT id, booking_id, vendor_id, amount_halalas, method, notes, created_at
            FROM payment_logs
            WHERE vendor_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(vendor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Sum of all log amounts for a booking.
    ///
    /// This is the source of truth the cached `paid_halalas` is derived
    /// from; anything disagreeing with this sum is stale.
    pub async fn sum_for_booking(&self, booking_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount_halalas)
            FROM payment_logs
            WHERE booking_id = ?1
            "#,
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}
