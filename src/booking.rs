// Booking: validates the guest's request, prices the stay and submits a pending reservation

use crate::error::ErrorKind;
use crate::models::{
    NewReservation, PaymentStatus, Reservation, ReservationStatus, Room, User,
};
use crate::services::{DataServices, Repository};
use crate::store::StoreError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Please select check-in and check-out dates")]
    MissingOrInvalidDates,

    #[error("Please enter the guest name and email")]
    MissingGuestInfo,

    #[error("Guest count {requested} is outside 1..={max_occupancy} for this room")]
    GuestCountOutOfRange { requested: u32, max_occupancy: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::MissingOrInvalidDates
            | BookingError::MissingGuestInfo
            | BookingError::GuestCountOutOfRange { .. } => ErrorKind::ValidationFailure,
            BookingError::Store(e) => e.kind(),
        }
    }
}

// What the guest entered on the booking form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guest_count: u32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub special_requests: Option<String>,
}

impl Default for BookingRequest {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            guest_count: 1,
            guest_name: String::new(),
            guest_email: String::new(),
            guest_phone: String::new(),
            special_requests: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BookingQuote {
    pub nights: u32,
    pub price_per_night: f64,
    pub total_price: f64,
}

pub struct BookingCalculator;

impl BookingCalculator {
    // Any partial day counts as a full night; None for non-positive durations
    pub fn nights_for_duration(duration: Duration) -> Option<u32> {
        let seconds = duration.num_seconds();
        if seconds <= 0 {
            return None;
        }
        let nights = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        u32::try_from(nights).ok()
    }

    // No taxes, fees or proration
    pub fn quote(
        room: &Room,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<BookingQuote, BookingError> {
        let nights = Self::nights_for_duration(check_out - check_in)
            .ok_or(BookingError::MissingOrInvalidDates)?;
        Ok(BookingQuote {
            nights,
            price_per_night: room.price_per_night,
            total_price: f64::from(nights) * room.price_per_night,
        })
    }

    // Checks run in form order and stop at the first failure
    pub fn validate(
        room: &Room,
        request: &BookingRequest,
    ) -> Result<(NaiveDate, NaiveDate), BookingError> {
        let (check_in, check_out) = match (request.check_in, request.check_out) {
            (Some(check_in), Some(check_out)) if check_out > check_in => (check_in, check_out),
            _ => return Err(BookingError::MissingOrInvalidDates),
        };

        if request.guest_name.trim().is_empty() || request.guest_email.trim().is_empty() {
            return Err(BookingError::MissingGuestInfo);
        }

        if request.guest_count == 0 || request.guest_count > room.max_occupancy {
            return Err(BookingError::GuestCountOutOfRange {
                requested: request.guest_count,
                max_occupancy: room.max_occupancy,
            });
        }

        Ok((check_in, check_out))
    }
}

#[derive(Clone)]
pub struct BookingService {
    reservations: Repository<Reservation>,
}

impl BookingService {
    pub fn new(services: &DataServices) -> Self {
        Self {
            reservations: services.reservations.clone(),
        }
    }

    // Nothing is written unless every check passes; no overlap check against other bookings
    #[instrument(skip(self, user, room, request), fields(user_id = %user.id, room_id = %room.id))]
    pub async fn submit(
        &self,
        user: &User,
        room: &Room,
        request: &BookingRequest,
    ) -> Result<Reservation, BookingError> {
        let (check_in, check_out) = BookingCalculator::validate(room, request).map_err(|e| {
            warn!(error = %e, "Booking rejected");
            e
        })?;
        let quote = BookingCalculator::quote(room, check_in, check_out)?;

        let special_requests = request
            .special_requests
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let draft = NewReservation {
            user_id: user.id.clone(),
            hotel_id: room.hotel_id.clone(),
            room_id: room.id.clone(),
            check_in_date: check_in,
            check_out_date: check_out,
            guest_count: request.guest_count,
            guest_name: request.guest_name.trim().to_string(),
            guest_email: request.guest_email.trim().to_string(),
            guest_phone: request.guest_phone.trim().to_string(),
            total_price: quote.total_price,
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::Pending,
            special_requests,
        };

        let reservation = self.reservations.create(draft).await?;
        info!(
            reservation_id = %reservation.id,
            nights = quote.nights,
            total_price = quote.total_price,
            "Booking submitted"
        );
        Ok(reservation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::models::fixtures::{room, user};
    use std::sync::Arc;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> BookingRequest {
        BookingRequest {
            check_in,
            check_out,
            guest_count: 2,
            guest_name: "Ada Lovelace".to_string(),
            guest_email: "ada@example.com".to_string(),
            guest_phone: "+1 555 0100".to_string(),
            special_requests: None,
        }
    }

    fn setup() -> (Arc<MemoryStore>, BookingService) {
        let store = Arc::new(MemoryStore::new());
        let services = DataServices::new(store.clone());
        (store, BookingService::new(&services))
    }

    #[test_case(Duration::days(3), Some(3); "#1 whole days")]
    #[test_case(Duration::hours(1), Some(1); "#2 partial day rounds up")]
    #[test_case(Duration::hours(49), Some(3); "#3 fraction past whole days")]
    #[test_case(Duration::zero(), None; "#4 zero length")]
    #[test_case(Duration::days(-2), None; "#5 backwards")]
    fn test_nights_for_duration(duration: Duration, expected: Option<u32>) {
        assert_eq!(BookingCalculator::nights_for_duration(duration), expected);
    }

    #[test_case(100.0, date(2024, 3, 1), date(2024, 3, 4), 3, 300.0; "#1 three nights")]
    #[test_case(89.5, date(2024, 2, 28), date(2024, 3, 1), 2, 179.0; "#2 across leap day")]
    #[test_case(250.0, date(2024, 12, 31), date(2025, 1, 1), 1, 250.0; "#3 across new year")]
    fn test_quote(price: f64, check_in: NaiveDate, check_out: NaiveDate, nights: u32, total: f64) {
        let r = room("r1", "h1", price, 2);
        let quote = BookingCalculator::quote(&r, check_in, check_out).unwrap();
        assert_eq!(quote.nights, nights);
        assert_eq!(quote.price_per_night, price);
        assert_eq!(quote.total_price, total);
    }

    #[tokio::test]
    async fn test_submit_creates_pending_reservation() {
        let (store, service) = setup();
        let r = room("r1", "h1", 100.0, 2);
        let mut req = request(Some(date(2024, 3, 1)), Some(date(2024, 3, 4)));
        req.special_requests = Some("  late arrival ".to_string());

        let reservation = service.submit(&user("u1"), &r, &req).await.unwrap();
        assert_eq!(reservation.total_price, 300.0);
        assert_eq!(reservation.nights(), 3);
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.payment_status, PaymentStatus::Pending);
        assert_eq!(reservation.user_id, "u1");
        assert_eq!(reservation.hotel_id, "h1");
        assert_eq!(reservation.room_id, "r1");
        assert_eq!(reservation.special_requests.as_deref(), Some("late arrival"));
        assert_eq!(reservation.created_at, reservation.updated_at);
        assert_eq!(store.len(crate::store::Table::Reservations), 1);
    }

    #[test_case(request(None, Some(date(2024, 3, 4))), ErrorKind::ValidationFailure; "#1 missing check-in")]
    #[test_case(request(Some(date(2024, 3, 4)), Some(date(2024, 3, 4))), ErrorKind::ValidationFailure; "#2 same day")]
    #[test_case(request(Some(date(2024, 3, 5)), Some(date(2024, 3, 4))), ErrorKind::ValidationFailure; "#3 reversed dates")]
    #[test_case(BookingRequest { guest_email: "  ".to_string(), ..request(Some(date(2024, 3, 1)), Some(date(2024, 3, 4))) }, ErrorKind::ValidationFailure; "#4 blank email")]
    #[test_case(BookingRequest { guest_count: 0, ..request(Some(date(2024, 3, 1)), Some(date(2024, 3, 4))) }, ErrorKind::ValidationFailure; "#5 no guests")]
    #[test_case(BookingRequest { guest_count: 3, ..request(Some(date(2024, 3, 1)), Some(date(2024, 3, 4))) }, ErrorKind::ValidationFailure; "#6 over occupancy")]
    fn test_rejected_requests_write_nothing(req: BookingRequest, kind: ErrorKind) {
        tokio_test::block_on(async {
            let (store, service) = setup();
            let r = room("r1", "h1", 100.0, 2);

            let err = service.submit(&user("u1"), &r, &req).await.unwrap_err();
            assert_eq!(err.kind(), kind);
            assert_eq!(store.request_count(), 0);
        });
    }

    #[test]
    fn test_dates_are_checked_before_guest_info() {
        let r = room("r1", "h1", 100.0, 2);
        let req = BookingRequest::default();
        assert!(matches!(
            BookingCalculator::validate(&r, &req),
            Err(BookingError::MissingOrInvalidDates)
        ));
    }

    #[tokio::test]
    async fn test_unavailable_room_is_still_bookable() {
        let (_store, service) = setup();
        let mut r = room("r1", "h1", 100.0, 2);
        r.is_available = false;
        let req = request(Some(date(2024, 3, 1)), Some(date(2024, 3, 2)));

        let reservation = service.submit(&user("u1"), &r, &req).await.unwrap();
        assert_eq!(reservation.total_price, 100.0);
    }

    #[tokio::test]
    async fn test_overlapping_bookings_are_accepted() {
        let (store, service) = setup();
        let r = room("r1", "h1", 100.0, 2);
        let req = request(Some(date(2024, 3, 1)), Some(date(2024, 3, 4)));

        service.submit(&user("u1"), &r, &req).await.unwrap();
        service.submit(&user("u2"), &r, &req).await.unwrap();
        assert_eq!(store.len(crate::store::Table::Reservations), 2);
    }

    #[tokio::test]
    async fn test_store_failure_is_io_failure() {
        let (store, service) = setup();
        store.fail_next_requests(1);
        let r = room("r1", "h1", 100.0, 2);
        let req = request(Some(date(2024, 3, 1)), Some(date(2024, 3, 4)));

        let err = service.submit(&user("u1"), &r, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert_eq!(store.len(crate::store::Table::Reservations), 0);
    }
}
