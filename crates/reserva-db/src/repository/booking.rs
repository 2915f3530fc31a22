//! # Booking Repository
//!
//! Database operations for bookings and their add-on items.
//!
//! ## Booking Lifecycle (storage view)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                          │
//! │     └── insert_with_items() → booking + frozen line items, one tx   │
//! │                                                                     │
//! │  2. TRANSITION                                                      │
//! │     └── transition_status() → guarded UPDATE (expected status in    │
//! │         the WHERE clause; 0 rows affected = raced another operator) │
//! │                                                                     │
//! │  3. PAYMENTS                                                        │
//! │     └── owned by the PaymentLedger, never touched here              │
//! │                                                                     │
//! │  4. EXPIRY                                                          │
//! │     └── expire_stale_holds() → on_hold past 48h becomes cancelled   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use reserva_core::{Booking, BookingItem, BookingStatus};

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Gets a booking by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, vendor_id, asset_kind, asset_id, user_id,
                guest_name, guest_phone, guest_email,
                booking_date, check_out_date, start_time, end_time,
                status, payment_status,
                subtotal_halalas, discount_halalas, vat_halalas,
                total_halalas, paid_halalas,
                applied_coupon, notes, is_read, created_at, updated_at
            FROM bookings
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Inserts a booking and its frozen line items in one transaction.
    ///
    /// Either the whole booking lands or none of it does; a half-created
    /// booking with missing add-ons would show a total that doesn't match
    /// its items.
    pub async fn insert_with_items(&self, booking: &Booking, items: &[BookingItem]) -> DbResult<()> {
        debug!(id = %booking.id, asset_id = %booking.asset_id, "Inserting booking");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, vendor_id, asset_kind, asset_id, user_id,
                guest_name, guest_phone, guest_email,
                booking_date, check_out_date, start_time, end_time,
                status, payment_status,
                subtotal_halalas, discount_halalas, vat_halalas,
                total_halalas, paid_halalas,
                applied_coupon, notes, is_read, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11, ?12,
                ?13, ?14,
                ?15, ?16, ?17,
                ?18, ?19,
                ?20, ?21, ?22, ?23, ?24
            )
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.vendor_id)
        .bind(booking.asset_kind)
        .bind(&booking.asset_id)
        .bind(&booking.user_id)
        .bind(&booking.guest_name)
        .bind(&booking.guest_phone)
        .bind(&booking.guest_email)
        .bind(booking.booking_date)
        .bind(booking.check_out_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(booking.subtotal_halalas)
        .bind(booking.discount_halalas)
        .bind(booking.vat_halalas)
        .bind(booking.total_halalas)
        .bind(booking.paid_halalas)
        .bind(&booking.applied_coupon)
        .bind(&booking.notes)
        .bind(booking.is_read)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO booking_items (
                    id, booking_id, name, price_halalas, quantity, kind, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.booking_id)
            .bind(&item.name)
            .bind(item.price_halalas)
            .bind(item.quantity)
            .bind(&item.kind)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets all add-on items for a booking, in insertion order.
    pub async fn items(&self, booking_id: &str) -> DbResult<Vec<BookingItem>> {
        let items = sqlx::query_as::<_, BookingItem>(
            r#"
            SELECT id, booking_id, name, price_halalas, quantity, kind, created_at
            FROM booking_items
            WHERE booking_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// The availability snapshot: all non-cancelled bookings for an asset.
    ///
    /// This is the input [`reserva_core::availability::check_availability`]
    /// expects; cancelled bookings have released their dates and are not
    /// fetched at all.
    pub async fn active_for_asset(&self, asset_id: &str) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, vendor_id, asset_kind, asset_id, user_id,
                guest_name, guest_phone, guest_email,
                booking_date, check_out_date, start_time, end_time,
                status, payment_status,
                subtotal_halalas, discount_halalas, vat_halalas,
                total_halalas, paid_halalas,
                applied_coupon, notes, is_read, created_at, updated_at
            FROM bookings
            WHERE asset_id = ?1 AND status != 'cancelled'
            ORDER BY booking_date
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Vendor inbox: bookings for a vendor, newest first.
    pub async fn list_for_vendor(&self, vendor_id: &str, limit: i64) -> DbResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, vendor_id, asset_kind, asset_id, user_id,
                guest_name, guest_phone, guest_email,
                booking_date, check_out_date, start_time, end_time,
                status, payment_status,
                subtotal_halalas, discount_halalas, vat_halalas,
                total_halalas, paid_halalas,
                applied_coupon, notes, is_read, created_at, updated_at
            FROM bookings
            WHERE vendor_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(vendor_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Transitions a booking's status with an optimistic guard.
    ///
    /// The expected current status travels in the WHERE clause: if another
    /// operator already moved the booking, 0 rows are affected and the
    /// caller gets NotFound instead of silently clobbering their change.
    pub async fn transition_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE bookings SET status = ?2, updated_at = ?3
            WHERE id = ?1 AND status = ?4
            "#,
        )
        .bind(id)
        .bind(to)
        .bind(now)
        .bind(from)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking (expected status)", id));
        }

        debug!(id = %id, from = ?from, to = ?to, "Booking status transitioned");
        Ok(())
    }

    /// Marks a booking read/unread in the vendor inbox.
    ///
    /// Orthogonal to the status machine by design.
    pub async fn set_read(&self, id: &str, is_read: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE bookings SET is_read = ?2 WHERE id = ?1")
            .bind(id)
            .bind(is_read)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }
        Ok(())
    }

    /// Updates guest contact details and notes. Never touches status,
    /// payment_status or any amount.
    pub async fn update_guest_contact(
        &self,
        id: &str,
        guest_name: Option<&str>,
        guest_phone: Option<&str>,
        guest_email: Option<&str>,
        notes: Option<&str>,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                guest_name = ?2,
                guest_phone = ?3,
                guest_email = ?4,
                notes = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(guest_name)
        .bind(guest_phone)
        .bind(guest_email)
        .bind(notes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }
        Ok(())
    }

    /// Cancels every on-hold booking created before `cutoff`.
    ///
    /// The 48-hour hold window is a domain rule
    /// ([`reserva_core::HOLD_EXPIRY_HOURS`]); callers compute the cutoff
    /// and this sweep applies it. Returns the number of expired holds.
    pub async fn expire_stale_holds(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE bookings SET status = 'cancelled', updated_at = ?2
            WHERE status = 'on_hold' AND created_at < ?1
            "#,
        )
        .bind(cutoff)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a booking. Items and payment logs cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }
        Ok(())
    }
}
