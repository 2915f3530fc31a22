//! Checkout gateway payloads.
//!
//! The external card processor is out of scope: the core computes the
//! total, hands these typed payloads to the UI's checkout redirect, and
//! never sees card data. This module is the only wire contract in the
//! system.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::types::Booking;
use crate::DEFAULT_CURRENCY;

/// Checkout-session creation request, as the processor expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutSessionRequest {
    /// Amount in minor units; the processor is configured for the same
    /// currency.
    pub amount_halalas: i64,
    pub currency: String,
    /// Our booking id, echoed back in the processor's webhooks.
    pub merchant_transaction_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub billing_city: String,
    pub billing_country: String,
}

impl CheckoutSessionRequest {
    /// Builds a session request for a booking's remaining balance.
    ///
    /// Requires a guest email: the processor refuses sessions without one,
    /// so we reject early with a specific message.
    pub fn for_booking(booking: &Booking, city: &str, country: &str) -> CoreResult<Self> {
        let email = booking
            .guest_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ValidationError::Required {
                field: "guest_email".to_string(),
            })?;

        Ok(CheckoutSessionRequest {
            amount_halalas: booking.remaining().halalas(),
            currency: DEFAULT_CURRENCY.to_string(),
            merchant_transaction_id: booking.id.clone(),
            customer_email: email.to_string(),
            customer_name: booking.guest_name.clone().unwrap_or_default(),
            billing_city: city.to_string(),
            billing_country: country.to_string(),
        })
    }
}

/// Successful session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutSession {
    pub checkout_id: String,
}

/// Processor-reported failure; `code` is the processor's error code,
/// logged for diagnostics while the user sees a generic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutFailure {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetKind, BookingStatus, PaymentStatus};
    use chrono::Utc;

    fn booking_with_email(email: Option<&str>) -> Booking {
        Booking {
            id: "b1".into(),
            vendor_id: "v1".into(),
            asset_kind: AssetKind::Hall,
            asset_id: "h1".into(),
            user_id: None,
            guest_name: Some("Huda".into()),
            guest_phone: Some("0501234567".into()),
            guest_email: email.map(Into::into),
            booking_date: "2025-06-01".parse().unwrap(),
            check_out_date: None,
            start_time: None,
            end_time: None,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Partial,
            subtotal_halalas: 200_000,
            discount_halalas: 0,
            vat_halalas: 30_000,
            total_halalas: 230_000,
            paid_halalas: 50_000,
            applied_coupon: None,
            notes: None,
            is_read: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_request_charges_remaining_balance() {
        let booking = booking_with_email(Some("huda@example.com"));
        let req = CheckoutSessionRequest::for_booking(&booking, "Riyadh", "SA").unwrap();

        assert_eq!(req.amount_halalas, 180_000);
        assert_eq!(req.currency, "SAR");
        assert_eq!(req.merchant_transaction_id, "b1");
        assert_eq!(req.customer_email, "huda@example.com");
    }

    #[test]
    fn test_missing_email_rejected() {
        let booking = booking_with_email(None);
        assert!(CheckoutSessionRequest::for_booking(&booking, "Riyadh", "SA").is_err());

        let booking = booking_with_email(Some("  "));
        assert!(CheckoutSessionRequest::for_booking(&booking, "Riyadh", "SA").is_err());
    }
}
