// Records exchanged with the hosted backend, their creation drafts and partial updates

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_STAR_RATING: u8 = 1;
pub const MAX_STAR_RATING: u8 = 5;
pub const MIN_REVIEW_RATING: u8 = 1;
pub const MAX_REVIEW_RATING: u8 = 10;

pub const DEFAULT_PROPERTY_TYPE: &str = "Hotels";

fn default_property_type() -> String {
    DEFAULT_PROPERTY_TYPE.to_string()
}

// Field-level checks run before a draft or patch leaves the process
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn check_star_rating(star_rating: u8) -> Result<(), String> {
    if (MIN_STAR_RATING..=MAX_STAR_RATING).contains(&star_rating) {
        Ok(())
    } else {
        Err(format!(
            "star_rating must be between {} and {}, got {}",
            MIN_STAR_RATING, MAX_STAR_RATING, star_rating
        ))
    }
}

fn check_price(price_per_night: f64) -> Result<(), String> {
    if price_per_night.is_finite() && price_per_night >= 0.0 {
        Ok(())
    } else {
        Err(format!(
            "price_per_night must be a non-negative amount, got {}",
            price_per_night
        ))
    }
}

fn check_occupancy(max_occupancy: u32) -> Result<(), String> {
    if max_occupancy >= 1 {
        Ok(())
    } else {
        Err("max_occupancy must be at least 1".to_string())
    }
}

fn check_review_rating(rating: u8) -> Result<(), String> {
    if (MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(format!(
            "rating must be between {} and {}, got {}",
            MIN_REVIEW_RATING, MAX_REVIEW_RATING, rating
        ))
    }
}

// ============================================================================
// Hotel
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub star_rating: u8,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub check_in_time: String,
    #[serde(default)]
    pub check_out_time: String,
    #[serde(default)]
    pub policies: String,
    #[serde(default = "default_property_type")]
    pub property_type: String,
    #[serde(default)]
    pub free_cancellation: bool,
    #[serde(default)]
    pub breakfast_included: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHotel {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub star_rating: u8,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub check_in_time: String,
    pub check_out_time: String,
    pub policies: String,
    pub property_type: String,
    pub free_cancellation: bool,
    pub breakfast_included: bool,
}

impl Default for NewHotel {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            address: String::new(),
            city: String::new(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            star_rating: 3,
            amenities: Vec::new(),
            images: Vec::new(),
            phone: String::new(),
            email: String::new(),
            website: None,
            check_in_time: "15:00".to_string(),
            check_out_time: "11:00".to_string(),
            policies: String::new(),
            property_type: default_property_type(),
            free_cancellation: false,
            breakfast_included: false,
        }
    }
}

impl Validate for NewHotel {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("hotel name must not be empty".to_string());
        }
        check_star_rating(self.star_rating)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_cancellation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast_included: Option<bool>,
}

impl Validate for HotelPatch {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("hotel name must not be empty".to_string());
            }
        }
        self.star_rating.map_or(Ok(()), check_star_rating)
    }
}

// ============================================================================
// Room
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub room_type: String,
    #[serde(default)]
    pub description: String,
    pub price_per_night: f64,
    pub max_occupancy: u32,
    #[serde(default)]
    pub bed_type: String,
    #[serde(default)]
    pub room_size: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub hotel_id: String,
    pub room_type: String,
    pub description: String,
    pub price_per_night: f64,
    pub max_occupancy: u32,
    pub bed_type: String,
    pub room_size: u32,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub is_available: bool,
}

impl Default for NewRoom {
    fn default() -> Self {
        Self {
            hotel_id: String::new(),
            room_type: String::new(),
            description: String::new(),
            price_per_night: 0.0,
            max_occupancy: 2,
            bed_type: String::new(),
            room_size: 0,
            amenities: Vec::new(),
            images: Vec::new(),
            is_available: true,
        }
    }
}

impl Validate for NewRoom {
    fn validate(&self) -> Result<(), String> {
        if self.hotel_id.trim().is_empty() {
            return Err("room must reference a hotel".to_string());
        }
        check_price(self.price_per_night)?;
        check_occupancy(self.max_occupancy)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_occupancy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl Validate for RoomPatch {
    fn validate(&self) -> Result<(), String> {
        if let Some(price) = self.price_per_night {
            check_price(price)?;
        }
        self.max_occupancy.map_or(Ok(()), check_occupancy)
    }
}

// ============================================================================
// Reservation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
        ReservationStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Cancelled | ReservationStatus::Completed
        )
    }

    // Edges of the hardened lifecycle; staying in place is always allowed
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        if *self == next {
            return true;
        }
        matches!(
            (*self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReservationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown reservation status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub hotel_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guest_count: u32,
    pub guest_name: String,
    pub guest_email: String,
    #[serde(default)]
    pub guest_phone: String,
    pub total_price: f64,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    pub user_id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guest_count: u32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub total_price: f64,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl Validate for NewReservation {
    fn validate(&self) -> Result<(), String> {
        if self.check_out_date <= self.check_in_date {
            return Err("check_out_date must be after check_in_date".to_string());
        }
        if self.guest_count == 0 {
            return Err("guest_count must be at least 1".to_string());
        }
        if !self.total_price.is_finite() || self.total_price < 0.0 {
            return Err(format!("invalid total_price: {}", self.total_price));
        }
        Ok(())
    }
}

// Dates, guest count and total_price are fixed once the booking is priced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

impl ReservationPatch {
    pub fn status(status: ReservationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Validate for ReservationPatch {
    fn validate(&self) -> Result<(), String> {
        let blank = |field: &Option<String>| field.as_ref().is_some_and(|v| v.trim().is_empty());
        if blank(&self.guest_name) || blank(&self.guest_email) {
            return Err("guest name and email must not be blank".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Review
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub hotel_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_country: Option<String>,
    pub stay_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub helpful_votes: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub hotel_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub reviewer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_country: Option<String>,
    pub stay_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    pub is_verified: bool,
    pub helpful_votes: u32,
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), String> {
        if self.hotel_id.trim().is_empty() {
            return Err("review must reference a hotel".to_string());
        }
        check_review_rating(self.rating)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpful_votes: Option<u32>,
}

impl Validate for ReviewPatch {
    fn validate(&self) -> Result<(), String> {
        self.rating.map_or(Ok(()), check_review_rating)
    }
}

// ============================================================================
// Manager
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerRole {
    Owner,
    Manager,
    Staff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manager {
    pub id: String,
    pub hotel_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: ManagerRole,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewManager {
    pub hotel_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: ManagerRole,
    pub permissions: Vec<String>,
}

impl Validate for NewManager {
    fn validate(&self) -> Result<(), String> {
        if self.hotel_id.trim().is_empty() || self.user_id.trim().is_empty() {
            return Err("manager must reference a hotel and a user".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ManagerRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Validate for ManagerPatch {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
