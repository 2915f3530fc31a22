//! # Coupon Repository
//!
//! Database operations for coupons. The asset scope (`target_ids`) is a
//! JSON column, so rows pass through a local record struct before
//! becoming [`reserva_core::Coupon`] values.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use reserva_core::{validation, Coupon, DiscountKind};

/// Raw coupon row; `target_ids` is JSON text.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: String,
    vendor_id: String,
    code: String,
    discount_kind: DiscountKind,
    discount_value: i64,
    target_ids: String,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl CouponRow {
    fn into_coupon(self) -> DbResult<Coupon> {
        let target_ids: Vec<String> = serde_json::from_str(&self.target_ids)
            .map_err(|e| DbError::Internal(format!("corrupt coupon scope: {e}")))?;

        Ok(Coupon {
            id: self.id,
            vendor_id: self.vendor_id,
            code: self.code,
            discount_kind: self.discount_kind,
            discount_value: self.discount_value,
            target_ids,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

const COUPON_COLUMNS: &str = r#"
    id, vendor_id, code, discount_kind, discount_value,
    target_ids, starts_on, ends_on, is_active, created_at
"#;

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    /// Creates a new CouponRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Inserts a coupon. The code is stored upper-cased so the unique
    /// (vendor_id, code) index enforces case-insensitive uniqueness.
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(vendor_id = %coupon.vendor_id, code = %coupon.code, "Inserting coupon");

        validation::validate_coupon_code(&coupon.code)?;
        validation::validate_coupon_discount(coupon.discount_kind, coupon.discount_value)?;

        let scope = serde_json::to_string(&coupon.target_ids)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO coupons (
                id, vendor_id, code, discount_kind, discount_value,
                target_ids, starts_on, ends_on, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&coupon.id)
        .bind(&coupon.vendor_id)
        .bind(coupon.code.to_uppercase())
        .bind(coupon.discount_kind)
        .bind(coupon.discount_value)
        .bind(scope)
        .bind(coupon.starts_on)
        .bind(coupon.ends_on)
        .bind(coupon.is_active)
        .bind(coupon.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The coupon snapshot handed to the resolver: every active coupon a
    /// vendor currently has. Date-window and scope checks stay in
    /// reserva-core so the rejection reason is specific.
    pub async fn active_for_vendor(&self, vendor_id: &str) -> DbResult<Vec<Coupon>> {
        let rows = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE vendor_id = ?1 AND is_active = 1"
        ))
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CouponRow::into_coupon).collect()
    }

    /// Looks a coupon up by vendor and code, active or not.
    pub async fn get_by_code(&self, vendor_id: &str, code: &str) -> DbResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE vendor_id = ?1 AND code = ?2"
        ))
        .bind(vendor_id)
        .bind(code.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CouponRow::into_coupon).transpose()
    }

    /// Deactivates a coupon (soft delete; historical bookings keep the
    /// applied code).
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE coupons SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", id));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::generate_id;
    use reserva_core::CoreError;

    fn coupon(kind: DiscountKind, value: i64) -> Coupon {
        Coupon {
            id: generate_id(),
            vendor_id: "vendor-1".to_string(),
            code: "EID10".to_string(),
            discount_kind: kind,
            discount_value: value,
            target_ids: vec![],
            starts_on: "2025-01-01".parse().unwrap(),
            ends_on: "2025-12-31".parse().unwrap(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_discount_values() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        for bad in [
            coupon(DiscountKind::Percentage, -1),
            coupon(DiscountKind::Percentage, 10_001),
            coupon(DiscountKind::Fixed, -50_000),
        ] {
            let err = repo.insert(&bad).await.unwrap_err();
            assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        }

        assert!(repo
            .active_for_vendor("vendor-1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_lookup_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        let mut original = coupon(DiscountKind::Percentage, 1000);
        original.code = "eid10".to_string();
        repo.insert(&original).await.unwrap();

        // Stored upper-cased, found case-insensitively
        let found = repo.get_by_code("vendor-1", "Eid10").await.unwrap().unwrap();
        assert_eq!(found.code, "EID10");
        assert_eq!(found.discount_value, 1000);
        assert_eq!(found.target_ids, original.target_ids);
    }
}
