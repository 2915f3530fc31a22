//! # Reserva DB
//!
//! SQLite persistence layer for the Reserva booking marketplace.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        reserva-db Crate                             │
//! │                                                                     │
//! │  ┌────────────────────────────────────────────────────────────┐    │
//! │  │  BookingService - creation paths, lifecycle, checkout      │    │
//! │  └───────────────┬────────────────────────────────────────────┘    │
//! │                  │                                                 │
//! │  ┌───────────────▼───────────────┐  ┌─────────────────────────┐    │
//! │  │  Repositories (read/query)    │  │  PaymentLedger (write)  │    │
//! │  │  bookings / assets / coupons  │  │  log + aggregate, 1 tx  │    │
//! │  │  payment_logs                 │  └───────────┬─────────────┘    │
//! │  └───────────────┬───────────────┘              │                  │
//! │                  └──────────┬───────────────────┘                  │
//! │                  ┌──────────▼──────────┐                           │
//! │                  │  SqlitePool (WAL)   │                           │
//! │                  └─────────────────────┘                           │
//! │                                                                     │
//! │  Domain rules live in reserva-core; this crate owns SQL, pools,    │
//! │  migrations and the transaction boundaries.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// Re-export main types for convenience
pub use error::{DbError, DbResult};
pub use ledger::{LedgerTotals, PaymentLedger};
pub use pool::{Database, DbConfig};
pub use repository::asset::AssetRepository;
pub use repository::booking::BookingRepository;
pub use repository::coupon::CouponRepository;
pub use repository::payment_log::PaymentLogRepository;
pub use service::{BookingService, GuestBookingRequest, LogNotifier, VendorBookingRequest};

// Re-export the domain crate so callers depend on one crate
pub use reserva_core;
