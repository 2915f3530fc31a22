//! # Repository Module
//!
//! Repository implementations for database entities.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Service / caller                                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Repository (this module) ── SQL lives here, nowhere else           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SqlitePool                                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository owns a pool clone (pools are cheap `Arc` handles) and
//! exposes typed async methods. Business rules stay in reserva-core; the
//! one exception is SQL-level guards (status-conditional UPDATEs, the
//! single-day uniqueness index) that close race windows the pure checks
//! cannot.

pub mod asset;
pub mod booking;
pub mod coupon;
pub mod payment_log;

use uuid::Uuid;

/// Generates a fresh entity id (UUID v4 string).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
