// Catalog assembly: joins hotels with their rooms and derives nightly price bounds
// Rebuilt from scratch on every load, nothing is cached

use crate::models::{Hotel, Review, Room};
use crate::services::{DataServices, Repository};
use crate::store::StoreError;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

// A hotel with its rooms, as shown on the results page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyWithRooms {
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
    pub min_price: f64,
    pub max_price: f64,
}

impl PropertyWithRooms {
    pub fn new(hotel: Hotel, rooms: Vec<Room>) -> Self {
        let (min_price, max_price) = price_bounds(&rooms);
        Self {
            hotel,
            rooms,
            min_price,
            max_price,
        }
    }

    pub fn id(&self) -> &str {
        &self.hotel.id
    }

    pub fn name(&self) -> &str {
        &self.hotel.name
    }

    pub fn has_rooms(&self) -> bool {
        !self.rooms.is_empty()
    }
}

// (min, max) of price_per_night, (0, 0) without rooms
pub fn price_bounds(rooms: &[Room]) -> (f64, f64) {
    let mut prices = rooms.iter().map(|room| room.price_per_night);
    match prices.next() {
        None => (0.0, 0.0),
        Some(first) => prices.fold((first, first), |(min, max), price| {
            (min.min(price), max.max(price))
        }),
    }
}

// Every hotel appears exactly once, in input order; rooms keep their input order
pub fn assemble(hotels: Vec<Hotel>, rooms: Vec<Room>) -> Vec<PropertyWithRooms> {
    let mut rooms_by_hotel: HashMap<String, Vec<Room>> = HashMap::new();
    for room in rooms {
        rooms_by_hotel
            .entry(room.hotel_id.clone())
            .or_default()
            .push(room);
    }

    let properties: Vec<PropertyWithRooms> = hotels
        .into_iter()
        .map(|hotel| {
            let rooms = rooms_by_hotel.remove(&hotel.id).unwrap_or_default();
            PropertyWithRooms::new(hotel, rooms)
        })
        .collect();

    let orphaned: usize = rooms_by_hotel.values().map(Vec::len).sum();
    if orphaned > 0 {
        debug!(orphaned, "Rooms reference hotels that are not in the catalog");
    }

    properties
}

// Loads hotels and rooms concurrently and assembles the catalog
#[derive(Clone)]
pub struct CatalogLoader {
    hotels: Repository<Hotel>,
    rooms: Repository<Room>,
}

impl CatalogLoader {
    pub fn new(services: &DataServices) -> Self {
        Self {
            hotels: services.hotels.clone(),
            rooms: services.rooms.clone(),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Vec<PropertyWithRooms>, StoreError> {
        let (hotels, rooms) = futures::try_join!(self.hotels.get_all(), self.rooms.get_all())?;
        let properties = assemble(hotels, rooms);
        info!(properties = properties.len(), "Catalog loaded");
        Ok(properties)
    }
}

// Guest rating on the 10-point review scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub review_count: usize,
    // False when no reviews exist and the star rating stands in
    pub from_reviews: bool,
}

pub fn rating_summary(hotel: &Hotel, reviews: &[Review]) -> RatingSummary {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter(|review| review.hotel_id == hotel.id)
        .map(|review| f64::from(review.rating))
        .collect();

    if ratings.is_empty() {
        return RatingSummary {
            average: f64::from(hotel.star_rating) * 2.0,
            review_count: 0,
            from_reviews: false,
        };
    }

    let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
    RatingSummary {
        // One decimal, as displayed
        average: (average * 10.0).round() / 10.0,
        review_count: ratings.len(),
        from_reviews: true,
    }
}
