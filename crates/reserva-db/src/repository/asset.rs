//! # Asset Repository
//!
//! Database operations for bookable assets (halls, chalets, services).
//! The add-on catalog (`addons`) is a JSON column, so rows pass through a
//! local record struct before becoming [`reserva_core::Asset`] values.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use reserva_core::{Addon, Asset, AssetKind};

/// Raw asset row; `addons` is JSON text.
#[derive(Debug, sqlx::FromRow)]
struct AssetRow {
    id: String,
    vendor_id: String,
    kind: AssetKind,
    name: String,
    price_halalas: i64,
    capacity: Option<i64>,
    addons: String,
    policies: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl AssetRow {
    fn into_asset(self) -> DbResult<Asset> {
        let addons: Vec<Addon> = serde_json::from_str(&self.addons)
            .map_err(|e| DbError::Internal(format!("corrupt asset addons: {e}")))?;

        Ok(Asset {
            id: self.id,
            vendor_id: self.vendor_id,
            kind: self.kind,
            name: self.name,
            price_halalas: self.price_halalas,
            capacity: self.capacity,
            addons,
            policies: self.policies,
            is_active: self.is_active,
            created_at: self.created_at,
        })
    }
}

const ASSET_COLUMNS: &str = r#"
    id, vendor_id, kind, name, price_halalas, capacity,
    addons, policies, is_active, created_at
"#;

/// Repository for asset database operations.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: SqlitePool,
}

impl AssetRepository {
    /// Creates a new AssetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AssetRepository { pool }
    }

    /// Inserts an asset.
    pub async fn insert(&self, asset: &Asset) -> DbResult<()> {
        debug!(id = %asset.id, kind = ?asset.kind, "Inserting asset");

        let addons = serde_json::to_string(&asset.addons)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO assets (
                id, vendor_id, kind, name, price_halalas, capacity,
                addons, policies, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&asset.id)
        .bind(&asset.vendor_id)
        .bind(asset.kind)
        .bind(&asset.name)
        .bind(asset.price_halalas)
        .bind(asset.capacity)
        .bind(addons)
        .bind(&asset.policies)
        .bind(asset.is_active)
        .bind(asset.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an asset by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Asset>> {
        let row = sqlx::query_as::<_, AssetRow>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AssetRow::into_asset).transpose()
    }

    /// Lists a vendor's assets, newest first.
    pub async fn list_for_vendor(&self, vendor_id: &str) -> DbResult<Vec<Asset>> {
        let rows = sqlx::query_as::<_, AssetRow>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE vendor_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(vendor_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AssetRow::into_asset).collect()
    }

    /// Updates the base price of an asset. Existing bookings keep their
    /// frozen amounts.
    pub async fn update_price(&self, id: &str, price_halalas: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE assets SET price_halalas = ?2 WHERE id = ?1")
            .bind(id)
            .bind(price_halalas)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Asset", id));
        }
        Ok(())
    }

    /// Deactivates an asset so it stops accepting new bookings.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE assets SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Asset", id));
        }
        Ok(())
    }
}
