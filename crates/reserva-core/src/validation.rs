//! # Validation Module
//!
//! Input validation for booking and payment forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Web UI                                                    │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (shared by both creation paths)               │
//! │  ├── Amount / date-range / time-slot rules                          │
//! │  └── Runs before any business logic                                 │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL / UNIQUE constraints                                  │
//! │  └── (asset_id, booking_date) uniqueness for single-day bookings    │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::DiscountKind;
use crate::MAX_BOOKING_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Monetary Validators
// =============================================================================

/// Validates a payment amount.
///
/// ## Rules
/// - Must be strictly positive; zero or negative payments are rejected
///   before they reach the ledger
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a price in halalas.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (free add-ons exist)
pub fn validate_price_halalas(halalas: i64) -> ValidationResult<()> {
    if halalas < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a VAT rate in basis points (0% to 100%).
pub fn validate_vat_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }
    Ok(())
}

// =============================================================================
// Scheduling Validators
// =============================================================================

/// Validates an intra-day time slot.
///
/// ## Rules
/// - Both ends present or both absent
/// - start must be strictly before end
pub fn validate_time_slot(
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
) -> ValidationResult<()> {
    match (start, end) {
        (None, None) => Ok(()),
        (Some(s), Some(e)) if s < e => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::EmptyTimeSlot),
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::Required {
            field: "time slot end".to_string(),
        }),
    }
}

// =============================================================================
// Guest Contact Validators
// =============================================================================

/// Validates guest contact details for an accountless booking.
///
/// ## Rules
/// - Name required, at most 200 characters
/// - Phone required, digits with optional leading `+`
/// - Email optional, but must contain a plausible `@` when present
pub fn validate_guest_contact(
    name: &str,
    phone: &str,
    email: Option<&str>,
) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "guest_name".to_string(),
        });
    }
    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "guest_name".to_string(),
            max: 200,
        });
    }

    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "guest_phone".to_string(),
        });
    }
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "guest_phone".to_string(),
            reason: "must contain only digits, with an optional leading +".to_string(),
        });
    }

    if let Some(email) = email {
        let email = email.trim();
        // Light check; real verification happens via the OTP flow outside
        // this core
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(ValidationError::InvalidFormat {
                field: "guest_email".to_string(),
                reason: "must be an email address".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Coupon / Collection Validators
// =============================================================================

/// Validates a coupon code's shape before lookup.
///
/// ## Rules
/// - Not empty, at most 50 characters
/// - Alphanumeric plus hyphen/underscore
///
/// ## Example
/// ```rust
/// use reserva_core::validation::validate_coupon_code;
///
/// assert!(validate_coupon_code("EID10").is_ok());
/// assert!(validate_coupon_code("").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }
    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: 50,
        });
    }
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a coupon's discount value before it is persisted.
///
/// ## Rules
/// - Percentage coupons: 0 to 10000 basis points (at most 100%)
/// - Fixed coupons: non-negative halalas
///
/// [`crate::types::Coupon::discount`] clamps on read as well, so rows
/// written before this check existed stay harmless.
pub fn validate_coupon_discount(kind: DiscountKind, value: i64) -> ValidationResult<()> {
    match kind {
        DiscountKind::Percentage => {
            if !(0..=10_000).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: "discount_value".to_string(),
                    min: 0,
                    max: 10_000,
                });
            }
        }
        DiscountKind::Fixed => {
            if value < 0 {
                return Err(ValidationError::MustBePositive {
                    field: "discount_value".to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Validates the number of add-on items on a booking.
pub fn validate_item_count(count: usize) -> ValidationResult<()> {
    if count > MAX_BOOKING_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "booking items".to_string(),
            min: 0,
            max: MAX_BOOKING_ITEMS as i64,
        });
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
