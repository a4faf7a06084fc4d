// Back-office operations: reservation status changes, table views and dashboard counts

use crate::config::{AdminConfig, TransitionPolicy};
use crate::error::ErrorKind;
use crate::models::{Hotel, Reservation, ReservationPatch, ReservationStatus, Review, Room};
use crate::services::DataServices;
use crate::store::StoreError;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, instrument, warn};

// Shown in place of a hotel or room that no longer exists
pub const UNKNOWN: &str = "Unknown";

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Reservation {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AdminError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::InvalidTransition { .. } => ErrorKind::ValidationFailure,
            AdminError::Store(e) => e.kind(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardCounts {
    pub hotels: usize,
    pub rooms: usize,
    pub reservations: usize,
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelRow {
    pub hotel: Hotel,
    pub room_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRow {
    pub room: Room,
    pub hotel_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationRow {
    pub reservation: Reservation,
    pub hotel_name: String,
    pub room_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRow {
    pub review: Review,
    pub hotel_name: String,
}

// Every admin table, joined for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminTables {
    pub hotels: Vec<HotelRow>,
    pub rooms: Vec<RoomRow>,
    pub reservations: Vec<ReservationRow>,
    pub reviews: Vec<ReviewRow>,
}

impl AdminTables {
    pub fn counts(&self) -> DashboardCounts {
        DashboardCounts {
            hotels: self.hotels.len(),
            rooms: self.rooms.len(),
            reservations: self.reservations.len(),
            reviews: self.reviews.len(),
        }
    }
}

fn hotel_names(hotels: &[Hotel]) -> HashMap<&str, &str> {
    hotels
        .iter()
        .map(|hotel| (hotel.id.as_str(), hotel.name.as_str()))
        .collect()
}

fn name_or_unknown(names: &HashMap<&str, &str>, id: &str) -> String {
    names.get(id).copied().unwrap_or(UNKNOWN).to_string()
}

pub fn hotel_rows(hotels: &[Hotel], rooms: &[Room]) -> Vec<HotelRow> {
    let mut room_counts: HashMap<&str, usize> = HashMap::new();
    for room in rooms {
        *room_counts.entry(room.hotel_id.as_str()).or_default() += 1;
    }
    hotels
        .iter()
        .map(|hotel| HotelRow {
            room_count: room_counts.get(hotel.id.as_str()).copied().unwrap_or(0),
            hotel: hotel.clone(),
        })
        .collect()
}

pub fn room_rows(rooms: &[Room], hotels: &[Hotel]) -> Vec<RoomRow> {
    let names = hotel_names(hotels);
    rooms
        .iter()
        .map(|room| RoomRow {
            hotel_name: name_or_unknown(&names, &room.hotel_id),
            room: room.clone(),
        })
        .collect()
}

// Older reservations carry no hotel_id; the hotel is then found through the room
pub fn reservation_rows(
    reservations: &[Reservation],
    hotels: &[Hotel],
    rooms: &[Room],
) -> Vec<ReservationRow> {
    let names = hotel_names(hotels);
    let rooms_by_id: HashMap<&str, &Room> =
        rooms.iter().map(|room| (room.id.as_str(), room)).collect();

    reservations
        .iter()
        .map(|reservation| {
            let room = rooms_by_id.get(reservation.room_id.as_str());
            let hotel_id = if reservation.hotel_id.is_empty() {
                room.map_or("", |room| room.hotel_id.as_str())
            } else {
                reservation.hotel_id.as_str()
            };
            ReservationRow {
                hotel_name: name_or_unknown(&names, hotel_id),
                room_type: room.map_or_else(|| UNKNOWN.to_string(), |room| room.room_type.clone()),
                reservation: reservation.clone(),
            }
        })
        .collect()
}

pub fn review_rows(reviews: &[Review], hotels: &[Hotel]) -> Vec<ReviewRow> {
    let names = hotel_names(hotels);
    reviews
        .iter()
        .map(|review| ReviewRow {
            hotel_name: name_or_unknown(&names, &review.hotel_id),
            review: review.clone(),
        })
        .collect()
}

// Comma-separated form input, e.g. amenities or image URLs
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone)]
pub struct AdminConsole {
    services: DataServices,
    policy: TransitionPolicy,
}

impl AdminConsole {
    pub fn new(services: DataServices, config: &AdminConfig) -> Self {
        Self {
            services,
            policy: config.transition_policy,
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn services(&self) -> &DataServices {
        &self.services
    }

    #[instrument(skip(self), fields(policy = ?self.policy))]
    pub async fn update_reservation_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> Result<(), AdminError> {
        if self.policy == TransitionPolicy::Guarded {
            let current = self.services.reservations.require(id).await?.status;
            if current == status {
                return Ok(());
            }
            if !current.can_transition_to(status) {
                warn!(id, from = %current, to = %status, "Status change refused");
                return Err(AdminError::InvalidTransition {
                    id: id.to_string(),
                    from: current,
                    to: status,
                });
            }
        }

        self.services
            .reservations
            .update(id, ReservationPatch::status(status))
            .await?;
        info!(id, status = %status, "Reservation status updated");
        Ok(())
    }

    pub async fn confirm_reservation(&self, id: &str) -> Result<(), AdminError> {
        self.update_reservation_status(id, ReservationStatus::Confirmed)
            .await
    }

    pub async fn cancel_reservation(&self, id: &str) -> Result<(), AdminError> {
        self.update_reservation_status(id, ReservationStatus::Cancelled)
            .await
    }

    #[instrument(skip(self))]
    pub async fn load_tables(&self) -> Result<AdminTables, AdminError> {
        let (hotels, rooms, reservations, reviews) = futures::try_join!(
            self.services.hotels.get_all(),
            self.services.rooms.get_all(),
            self.services.reservations.get_all(),
            self.services.reviews.get_all()
        )?;

        Ok(AdminTables {
            hotels: hotel_rows(&hotels, &rooms),
            rooms: room_rows(&rooms, &hotels),
            reservations: reservation_rows(&reservations, &hotels, &rooms),
            reviews: review_rows(&reviews, &hotels),
        })
    }

    pub async fn dashboard_counts(&self) -> Result<DashboardCounts, AdminError> {
        let (hotels, rooms, reservations, reviews) = futures::try_join!(
            self.services.hotels.get_all(),
            self.services.rooms.get_all(),
            self.services.reservations.get_all(),
            self.services.reviews.get_all()
        )?;

        Ok(DashboardCounts {
            hotels: hotels.len(),
            rooms: rooms.len(),
            reservations: reservations.len(),
            reviews: reviews.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::models::fixtures::{hotel, review, room, timestamp};
    use crate::models::{NewReservation, PaymentStatus};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;
    use test_case::test_case;

    fn console(policy: TransitionPolicy) -> (Arc<MemoryStore>, AdminConsole) {
        let store = Arc::new(MemoryStore::new());
        let services = DataServices::new(store.clone());
        let config = AdminConfig {
            transition_policy: policy,
        };
        (store, AdminConsole::new(services, &config))
    }

    fn draft(status: ReservationStatus) -> NewReservation {
        NewReservation {
            user_id: "u1".to_string(),
            hotel_id: "h1".to_string(),
            room_id: "r1".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            guest_count: 2,
            guest_name: "Ada Lovelace".to_string(),
            guest_email: "ada@example.com".to_string(),
            guest_phone: String::new(),
            total_price: 300.0,
            status,
            payment_status: PaymentStatus::Pending,
            special_requests: None,
        }
    }

    fn reservation(id: &str, hotel_id: &str, room_id: &str) -> Reservation {
        Reservation {
            id: id.to_string(),
            user_id: "u1".to_string(),
            hotel_id: hotel_id.to_string(),
            room_id: room_id.to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            guest_count: 2,
            guest_name: "Ada Lovelace".to_string(),
            guest_email: "ada@example.com".to_string(),
            guest_phone: String::new(),
            total_price: 300.0,
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::Pending,
            special_requests: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[tokio::test]
    async fn test_unrestricted_status_change_bumps_updated_at() {
        let (_store, console) = console(TransitionPolicy::Unrestricted);
        let created = console
            .services()
            .reservations
            .create(draft(ReservationStatus::Completed))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        console
            .update_reservation_status(&created.id, ReservationStatus::Pending)
            .await
            .unwrap();

        let updated = console.services().reservations.require(&created.id).await.unwrap();
        assert_eq!(updated.status, ReservationStatus::Pending);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test_case(ReservationStatus::Pending, ReservationStatus::Confirmed, true; "#1 pending to confirmed")]
    #[test_case(ReservationStatus::Pending, ReservationStatus::Cancelled, true; "#2 pending to cancelled")]
    #[test_case(ReservationStatus::Confirmed, ReservationStatus::Completed, true; "#3 confirmed to completed")]
    #[test_case(ReservationStatus::Completed, ReservationStatus::Pending, false; "#4 completed is terminal")]
    #[test_case(ReservationStatus::Cancelled, ReservationStatus::Confirmed, false; "#5 cancelled is terminal")]
    #[test_case(ReservationStatus::Pending, ReservationStatus::Completed, false; "#6 skipping confirmation")]
    fn test_guarded_transitions(from: ReservationStatus, to: ReservationStatus, allowed: bool) {
        tokio_test::block_on(async {
            let (_store, console) = console(TransitionPolicy::Guarded);
            let created = console
                .services()
                .reservations
                .create(draft(from))
                .await
                .unwrap();

            let result = console.update_reservation_status(&created.id, to).await;
            let stored = console.services().reservations.require(&created.id).await.unwrap();
            if allowed {
                assert!(result.is_ok());
                assert_eq!(stored.status, to);
            } else {
                assert_eq!(result.unwrap_err().kind(), ErrorKind::ValidationFailure);
                assert_eq!(stored.status, from);
            }
        });
    }

    #[tokio::test]
    async fn test_guarded_same_status_skips_the_write() {
        let (store, console) = console(TransitionPolicy::Guarded);
        let created = console
            .services()
            .reservations
            .create(draft(ReservationStatus::Confirmed))
            .await
            .unwrap();
        let before = store.request_count();

        console.confirm_reservation(&created.id).await.unwrap();
        // Only the lookup reaches the store
        assert_eq!(store.request_count(), before + 1);
    }

    #[tokio::test]
    async fn test_missing_reservation_is_not_found() {
        for policy in [TransitionPolicy::Unrestricted, TransitionPolicy::Guarded] {
            let (_store, console) = console(policy);
            let err = console.cancel_reservation("res_missing").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn test_rows_render_unknown_for_missing_references() {
        let hotels = vec![hotel("h1", "Harbor View", 4), hotel("h2", "Budget Inn", 2)];
        let rooms = vec![
            room("r1", "h1", 120.0, 2),
            room("r2", "h1", 180.0, 3),
            room("r3", "gone", 90.0, 2),
        ];
        let reservations = vec![
            reservation("res1", "h1", "r1"),
            reservation("res2", "gone", "missing"),
            reservation("res3", "", "r2"),
        ];
        let reviews = vec![review("v1", "h2", 7), review("v2", "gone", 9)];

        let hotel_table = hotel_rows(&hotels, &rooms);
        assert_eq!(hotel_table[0].room_count, 2);
        assert_eq!(hotel_table[1].room_count, 0);

        let room_table = room_rows(&rooms, &hotels);
        assert_eq!(room_table[0].hotel_name, "Harbor View");
        assert_eq!(room_table[2].hotel_name, UNKNOWN);

        let reservation_table = reservation_rows(&reservations, &hotels, &rooms);
        assert_eq!(reservation_table[0].hotel_name, "Harbor View");
        assert_eq!(reservation_table[0].room_type, "Double");
        assert_eq!(reservation_table[1].hotel_name, UNKNOWN);
        assert_eq!(reservation_table[1].room_type, UNKNOWN);
        assert_eq!(reservation_table[2].hotel_name, "Harbor View");

        let review_table = review_rows(&reviews, &hotels);
        assert_eq!(review_table[0].hotel_name, "Budget Inn");
        assert_eq!(review_table[1].hotel_name, UNKNOWN);
    }

    #[test_case("Free WiFi, Parking, Spa", vec!["Free WiFi", "Parking", "Spa"]; "#1 plain list")]
    #[test_case("a, b,,c", vec!["a", "b", "c"]; "#2 empty items dropped")]
    #[test_case("  ", vec![]; "#3 blank input")]
    fn test_parse_list(input: &str, expected: Vec<&str>) {
        assert_eq!(parse_list(input), expected);
    }

    #[tokio::test]
    async fn test_dashboard_counts_match_tables() {
        let (_store, console) = console(TransitionPolicy::Unrestricted);
        let services = console.services().clone();
        services
            .hotels
            .create(crate::models::NewHotel {
                name: "Harbor View".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        services
            .reservations
            .create(draft(ReservationStatus::Pending))
            .await
            .unwrap();

        let counts = console.dashboard_counts().await.unwrap();
        assert_eq!(
            counts,
            DashboardCounts {
                hotels: 1,
                rooms: 0,
                reservations: 1,
                reviews: 0,
            }
        );

        let tables = console.load_tables().await.unwrap();
        assert_eq!(tables.counts(), counts);
        assert_eq!(tables.reservations[0].hotel_name, UNKNOWN);
    }

    #[tokio::test]
    async fn test_dashboard_surfaces_store_failure() {
        let (store, console) = console(TransitionPolicy::Unrestricted);
        store.fail_next_requests(4);
        let err = console.dashboard_counts().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }
}
