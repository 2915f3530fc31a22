//! # Booking Service
//!
//! Orchestrates the two booking creation paths and every lifecycle edit.
//!
//! ## Creation Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Guest wizard                     Vendor manual entry               │
//! │  ────────────                     ────────────────────              │
//! │  validate contact + slot          validate contact + slot           │
//! │  availability gate                availability gate                 │
//! │  coupon resolution                manual discount (optional)        │
//! │  price_booking()                  price_booking()                   │
//! │  initial_state(checkout mode)     normalize_manual_entry()          │
//! │       │                                │                            │
//! │       └──────────── insert ────────────┘                            │
//! │                       │                                             │
//! │         nonzero paid? → PaymentLedger::add_payment                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths price through the same pricing function and settle through
//! the same ledger, so `paid_halalas` always equals the payment log sum
//! no matter which door a booking came in through.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::{info, instrument, warn};

use crate::error::{DbError, DbResult};
use crate::ledger::LedgerTotals;
use crate::pool::Database;
use crate::repository::generate_id;
use reserva_core::availability::{check_availability, DateSpan};
use reserva_core::checkout::CheckoutSessionRequest;
use reserva_core::coupon::resolve_coupon;
use reserva_core::lifecycle;
use reserva_core::notify::{NoticeKind, Notifier, NullNotifier};
use reserva_core::pricing::{price_booking, Quote};
use reserva_core::validation;
use reserva_core::{
    Asset, Booking, BookingItem, BookingStatus, CheckoutMode, CoreError, Discount, LedgerAccess,
    Money, PaymentMethod, PaymentStatus, VatRate, HOLD_EXPIRY_HOURS,
};

// =============================================================================
// Requests
// =============================================================================

/// A booking submitted through the guest-facing wizard.
#[derive(Debug, Clone)]
pub struct GuestBookingRequest {
    pub asset_id: String,
    /// Registered user, when the guest is logged in.
    pub user_id: Option<String>,
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: Option<String>,
    pub booking_date: NaiveDate,
    /// Inclusive check-out for chalet stays.
    pub check_out_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// Names of add-ons picked from the asset's catalog.
    pub addons: Vec<String>,
    pub coupon_code: Option<String>,
    pub mode: CheckoutMode,
    pub notes: Option<String>,
}

/// A booking entered by the vendor on behalf of a walk-in customer.
#[derive(Debug, Clone)]
pub struct VendorBookingRequest {
    pub asset_id: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub guest_email: Option<String>,
    pub booking_date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub addons: Vec<String>,
    /// Manual discount; vendors can grant one without a coupon.
    pub discount: Option<Discount>,
    /// Amount already collected from the customer.
    pub paid: Money,
    /// The payment status the vendor picked in the form; normalized
    /// against `paid` before persisting.
    pub requested_payment_status: PaymentStatus,
    pub method: PaymentMethod,
    /// Manual entries are usually confirmed on the spot.
    pub confirmed: bool,
    pub notes: Option<String>,
}

// =============================================================================
// Service
// =============================================================================

/// High-level booking operations over a [`Database`].
///
/// Clone-cheap: the database is a pool handle and the notifier is shared.
#[derive(Clone)]
pub struct BookingService {
    db: Database,
    notifier: Arc<dyn Notifier>,
    vat_rate: VatRate,
}

impl BookingService {
    /// Creates a service with no notification sink.
    pub fn new(db: Database) -> Self {
        BookingService {
            db,
            notifier: Arc::new(NullNotifier),
            vat_rate: VatRate::default(),
        }
    }

    /// Attaches a notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Overrides the VAT rate (the default is the KSA standard rate).
    pub fn with_vat_rate(mut self, vat_rate: VatRate) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates a booking from the guest wizard.
    ///
    /// `today` is the guest's booking-form date; it drives the past-date
    /// check and the coupon validity window.
    #[instrument(skip(self, request), fields(asset_id = %request.asset_id))]
    pub async fn guest_booking(
        &self,
        request: GuestBookingRequest,
        today: NaiveDate,
    ) -> DbResult<Booking> {
        validation::validate_guest_contact(
            &request.guest_name,
            &request.guest_phone,
            request.guest_email.as_deref(),
        )?;
        validation::validate_time_slot(request.start_time, request.end_time)?;
        validation::validate_item_count(request.addons.len())?;

        let asset = self.bookable_asset(&request.asset_id).await?;
        let span = span_for(request.booking_date, request.check_out_date)?;
        self.availability_gate(&asset.id, span, today).await?;

        // Coupon resolution against the vendor's active set
        let (discount, applied_coupon) = match &request.coupon_code {
            Some(code) => {
                validation::validate_coupon_code(code)?;
                let coupons = self.db.coupons().active_for_vendor(&asset.vendor_id).await?;
                let coupon = resolve_coupon(code, &asset.id, &coupons, today)
                    .map_err(|r| DbError::Domain(r.into()))?;
                (Some(coupon.discount()), Some(coupon.code.clone()))
            }
            None => (None, None),
        };

        let picked = picked_addons(&asset, &request.addons)?;
        let extras: Vec<Money> = picked.iter().map(|(_, price)| *price).collect();
        let quote = price_booking(asset.base_price(span), &extras, discount, self.vat_rate)
            .map_err(DbError::Domain)?;

        let (status, _, initial_paid) = lifecycle::initial_state(request.mode, quote.total);

        let booking = new_booking(
            &asset,
            span,
            request.start_time,
            request.end_time,
            status,
            quote,
            applied_coupon,
            BookingContact {
                user_id: request.user_id,
                guest_name: Some(request.guest_name),
                guest_phone: Some(request.guest_phone),
                guest_email: request.guest_email,
                notes: request.notes,
            },
        );
        let items = frozen_items(&booking.id, &picked);

        self.db.bookings().insert_with_items(&booking, &items).await?;

        // The insert lands unpaid; the ledger is the only writer of paid
        // amounts, so deposits and pay-now amounts go through it
        if initial_paid.is_positive() {
            self.db
                .ledger()
                .add_payment(
                    &booking.id,
                    initial_paid,
                    PaymentMethod::Card,
                    None,
                    LedgerAccess::ReadWrite,
                )
                .await?;
        }

        info!(booking_id = %booking.id, total = %booking.total(), "Guest booking created");
        self.notifier
            .notify(NoticeKind::Success, "Booking request received");

        self.require_booking(&booking.id).await
    }

    /// Creates a booking entered manually by the vendor.
    #[instrument(skip(self, request), fields(asset_id = %request.asset_id))]
    pub async fn vendor_booking(
        &self,
        request: VendorBookingRequest,
        today: NaiveDate,
    ) -> DbResult<Booking> {
        validation::validate_guest_contact(
            &request.guest_name,
            &request.guest_phone,
            request.guest_email.as_deref(),
        )?;
        validation::validate_time_slot(request.start_time, request.end_time)?;
        validation::validate_item_count(request.addons.len())?;

        let asset = self.bookable_asset(&request.asset_id).await?;
        let span = span_for(request.booking_date, request.check_out_date)?;
        self.availability_gate(&asset.id, span, today).await?;

        let picked = picked_addons(&asset, &request.addons)?;
        let extras: Vec<Money> = picked.iter().map(|(_, price)| *price).collect();
        let quote = price_booking(
            asset.base_price(span),
            &extras,
            request.discount,
            self.vat_rate,
        )
        .map_err(DbError::Domain)?;

        // Normalization rejects paid > total and partial-with-zero before
        // anything is persisted
        lifecycle::normalize_manual_entry(request.requested_payment_status, request.paid, quote.total)
            .map_err(DbError::Domain)?;

        let status = if request.confirmed {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let booking = new_booking(
            &asset,
            span,
            request.start_time,
            request.end_time,
            status,
            quote,
            None,
            BookingContact {
                user_id: None,
                guest_name: Some(request.guest_name),
                guest_phone: Some(request.guest_phone),
                guest_email: request.guest_email,
                notes: request.notes,
            },
        );
        let items = frozen_items(&booking.id, &picked);

        self.db.bookings().insert_with_items(&booking, &items).await?;

        if request.paid.is_positive() {
            self.db
                .ledger()
                .add_payment(
                    &booking.id,
                    request.paid,
                    request.method,
                    Some("collected at booking"),
                    LedgerAccess::ReadWrite,
                )
                .await?;
        }

        info!(booking_id = %booking.id, total = %booking.total(), "Vendor booking created");
        self.notifier.notify(NoticeKind::Success, "Booking saved");

        self.require_booking(&booking.id).await
    }

    /// Blocks a date (or range) without a customer. The block occupies the
    /// calendar exactly like a booking and is terminal.
    #[instrument(skip(self))]
    pub async fn block_dates(
        &self,
        asset_id: &str,
        span: DateSpan,
        today: NaiveDate,
        notes: Option<&str>,
    ) -> DbResult<Booking> {
        let asset = self.bookable_asset(asset_id).await?;
        self.availability_gate(&asset.id, span, today).await?;

        let booking = new_booking(
            &asset,
            span,
            None,
            None,
            BookingStatus::Blocked,
            Quote {
                subtotal: Money::zero(),
                discount: Money::zero(),
                vat: Money::zero(),
                total: Money::zero(),
            },
            None,
            BookingContact {
                user_id: None,
                guest_name: None,
                guest_phone: None,
                guest_email: None,
                notes: notes.map(str::to_string),
            },
        );

        self.db.bookings().insert_with_items(&booking, &[]).await?;
        info!(booking_id = %booking.id, asset_id = %asset_id, "Dates blocked");
        Ok(booking)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Loads a booking, lazily expiring a stale hold first.
    ///
    /// An on-hold booking past its window reads as cancelled even if the
    /// sweep has not run yet.
    pub async fn booking(&self, id: &str, now: DateTime<Utc>) -> DbResult<Booking> {
        let booking = self.require_booking(id).await?;

        if booking.status == BookingStatus::OnHold
            && lifecycle::hold_expired(booking.created_at, now)
        {
            self.db
                .bookings()
                .transition_status(id, BookingStatus::OnHold, BookingStatus::Cancelled)
                .await?;
            warn!(booking_id = %id, "Hold expired on read");
            return self.require_booking(id).await;
        }

        Ok(booking)
    }

    /// Transitions a booking's status.
    ///
    /// Checks the lifecycle matrix and the financial guard first, then
    /// applies the guarded UPDATE so a racing operator cannot be clobbered.
    #[instrument(skip(self))]
    pub async fn transition(&self, id: &str, to: BookingStatus) -> DbResult<Booking> {
        let booking = self.require_booking(id).await?;

        lifecycle::check_transition(booking.status, to).map_err(DbError::Domain)?;
        lifecycle::check_financials(booking.paid(), booking.total()).map_err(DbError::Domain)?;

        self.db
            .bookings()
            .transition_status(id, booking.status, to)
            .await?;

        self.require_booking(id).await
    }

    /// Cancels every on-hold booking older than the hold window.
    /// Returns the number of holds released.
    pub async fn expire_stale_holds(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let cutoff = now - Duration::hours(HOLD_EXPIRY_HOURS);
        let released = self.db.bookings().expire_stale_holds(cutoff).await?;
        if released > 0 {
            info!(released, "Stale holds expired");
        }
        Ok(released)
    }

    /// Marks a booking read/unread in the vendor inbox.
    pub async fn mark_read(&self, id: &str, is_read: bool) -> DbResult<()> {
        self.db.bookings().set_read(id, is_read).await
    }

    /// Updates guest contact details on an existing booking.
    pub async fn update_guest_contact(
        &self,
        id: &str,
        guest_name: &str,
        guest_phone: &str,
        guest_email: Option<&str>,
        notes: Option<&str>,
    ) -> DbResult<()> {
        validation::validate_guest_contact(guest_name, guest_phone, guest_email)?;
        self.db
            .bookings()
            .update_guest_contact(id, Some(guest_name), Some(guest_phone), guest_email, notes)
            .await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Registers a payment against a booking.
    #[instrument(skip(self))]
    pub async fn register_payment(
        &self,
        booking_id: &str,
        amount: Money,
        method: PaymentMethod,
        notes: Option<&str>,
        access: LedgerAccess,
    ) -> DbResult<LedgerTotals> {
        let totals = self
            .db
            .ledger()
            .add_payment(booking_id, amount, method, notes, access)
            .await?;

        self.notifier
            .notify(NoticeKind::Success, "Payment registered");
        Ok(totals)
    }

    /// Reverses a payment. Requires explicit operator confirmation; the UI
    /// shows a "really delete this payment?" dialog and passes the answer.
    #[instrument(skip(self))]
    pub async fn reverse_payment(
        &self,
        log_id: &str,
        confirmed: bool,
        access: LedgerAccess,
    ) -> DbResult<LedgerTotals> {
        if !confirmed {
            return Err(DbError::Domain(CoreError::ReversalNotConfirmed));
        }
        self.db.ledger().remove_payment(log_id, access).await
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Builds the card-processor session request for a booking's remaining
    /// balance.
    pub async fn checkout_request(
        &self,
        booking_id: &str,
        city: &str,
        country: &str,
    ) -> DbResult<CheckoutSessionRequest> {
        let booking = self.require_booking(booking_id).await?;
        CheckoutSessionRequest::for_booking(&booking, city, country).map_err(DbError::Domain)
    }

    /// Settles a successful gateway charge: registers the card payment and
    /// confirms the booking if it was still pending or on hold.
    #[instrument(skip(self))]
    pub async fn complete_checkout(&self, booking_id: &str, amount: Money) -> DbResult<Booking> {
        self.db
            .ledger()
            .add_payment(
                booking_id,
                amount,
                PaymentMethod::Card,
                Some("gateway checkout"),
                LedgerAccess::ReadWrite,
            )
            .await?;

        let booking = self.require_booking(booking_id).await?;
        if matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::OnHold
        ) {
            self.db
                .bookings()
                .transition_status(booking_id, booking.status, BookingStatus::Confirmed)
                .await?;
        }

        self.notifier
            .notify(NoticeKind::Success, "Payment received, booking confirmed");
        self.require_booking(booking_id).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn require_booking(&self, id: &str) -> DbResult<Booking> {
        self.db
            .bookings()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))
    }

    /// Loads an asset that can accept new bookings.
    async fn bookable_asset(&self, asset_id: &str) -> DbResult<Asset> {
        let asset = self
            .db
            .assets()
            .get_by_id(asset_id)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| DbError::Domain(CoreError::AssetNotFound(asset_id.to_string())))?;
        Ok(asset)
    }

    /// The availability check over a fresh snapshot of the asset's
    /// bookings. The storage-level uniqueness index backs this up for
    /// single-day bookings.
    async fn availability_gate(
        &self,
        asset_id: &str,
        span: DateSpan,
        today: NaiveDate,
    ) -> DbResult<()> {
        let snapshot = self.db.bookings().active_for_asset(asset_id).await?;
        check_availability(span, &snapshot, today).map_err(|u| DbError::Domain(u.into()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

struct BookingContact {
    user_id: Option<String>,
    guest_name: Option<String>,
    guest_phone: Option<String>,
    guest_email: Option<String>,
    notes: Option<String>,
}

fn span_for(from: NaiveDate, to: Option<NaiveDate>) -> DbResult<DateSpan> {
    match to {
        Some(to) => DateSpan::range(from, to).map_err(|e| DbError::Domain(e.into())),
        None => Ok(DateSpan::single(from)),
    }
}

/// Resolves the requested add-on names against the asset's catalog.
fn picked_addons(asset: &Asset, names: &[String]) -> DbResult<Vec<(String, Money)>> {
    names
        .iter()
        .map(|name| {
            asset
                .addons
                .iter()
                .find(|a| a.name == *name)
                .map(|a| (a.name.clone(), a.price()))
                .ok_or_else(|| {
                    DbError::Domain(
                        reserva_core::ValidationError::InvalidFormat {
                            field: "addons".to_string(),
                            reason: format!("unknown add-on: {name}"),
                        }
                        .into(),
                    )
                })
        })
        .collect()
}

/// Freezes the picked add-ons into line items (snapshot pattern).
fn frozen_items(booking_id: &str, picked: &[(String, Money)]) -> Vec<BookingItem> {
    let now = Utc::now();
    picked
        .iter()
        .map(|(name, price)| BookingItem {
            id: generate_id(),
            booking_id: booking_id.to_string(),
            name: name.clone(),
            price_halalas: price.halalas(),
            quantity: 1,
            kind: "addon".to_string(),
            created_at: now,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn new_booking(
    asset: &Asset,
    span: DateSpan,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    status: BookingStatus,
    quote: Quote,
    applied_coupon: Option<String>,
    contact: BookingContact,
) -> Booking {
    let now = Utc::now();
    let check_out_date = (span.to != span.from).then_some(span.to);

    Booking {
        id: generate_id(),
        vendor_id: asset.vendor_id.clone(),
        asset_kind: asset.kind,
        asset_id: asset.id.clone(),
        user_id: contact.user_id,
        guest_name: contact.guest_name,
        guest_phone: contact.guest_phone,
        guest_email: contact.guest_email,
        booking_date: span.from,
        check_out_date,
        start_time,
        end_time,
        status,
        // Paid amounts flow exclusively through the ledger; a fresh insert
        // is always unpaid
        payment_status: PaymentStatus::Unpaid,
        subtotal_halalas: quote.subtotal.halalas(),
        discount_halalas: quote.discount.halalas(),
        vat_halalas: quote.vat.halalas(),
        total_halalas: quote.total.halalas(),
        paid_halalas: 0,
        applied_coupon,
        notes: contact.notes,
        is_read: false,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Log Notifier
// =============================================================================

/// Routes notices into the tracing pipeline. The default sink for headless
/// deployments without a toast UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => info!(notice = message, "notice"),
            NoticeKind::Error => warn!(notice = message, "notice"),
        }
    }
}

// =============================================================================
// Integration Tests
// =============================================================================
