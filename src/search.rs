// Filter and sort pipeline over the assembled catalog
// Filters are AND-combined; sorting is stable so ties keep their prior order

use crate::catalog::PropertyWithRooms;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self {
            min: 0.0,
            max: f64::MAX,
        }
    }

    // Inclusive on both ends
    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

// Guest-selected filters; field names follow the storefront's filter panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub price_range: PriceRange,
    // Empty set means any rating
    pub star_rating: BTreeSet<u8>,
    // Empty set means any category
    pub property_type: BTreeSet<String>,
    // Every label must be found, case-insensitively, inside some amenity
    pub amenities: Vec<String>,
    pub free_cancellation: bool,
    pub breakfast_included: bool,
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

impl FilterSpec {
    // Initial state of the filter panel: price slider spans [0, ceiling]
    pub fn storefront_default(price_ceiling: f64) -> Self {
        Self {
            price_range: PriceRange::new(0.0, price_ceiling),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn toggle_star_rating(&mut self, stars: u8) {
        toggle(&mut self.star_rating, stars);
    }

    pub fn toggle_property_type(&mut self, property_type: &str) {
        toggle(&mut self.property_type, property_type.to_string());
    }

    pub fn toggle_amenity(&mut self, amenity: &str) {
        if let Some(pos) = self.amenities.iter().position(|a| a == amenity) {
            self.amenities.remove(pos);
        } else {
            self.amenities.push(amenity.to_string());
        }
    }

    // A property without rooms is never excluded by price
    fn matches_price(&self, property: &PropertyWithRooms) -> bool {
        !property.has_rooms()
            || property
                .rooms
                .iter()
                .any(|room| self.price_range.contains(room.price_per_night))
    }

    fn matches_amenities(&self, property: &PropertyWithRooms) -> bool {
        let offered: Vec<String> = property
            .hotel
            .amenities
            .iter()
            .map(|a| a.to_lowercase())
            .collect();
        self.amenities.iter().all(|wanted| {
            let wanted = wanted.trim().to_lowercase();
            offered.iter().any(|a| a.contains(&wanted))
        })
    }

    pub fn matches(&self, property: &PropertyWithRooms) -> bool {
        let hotel = &property.hotel;

        if !self.matches_price(property) {
            return false;
        }

        if !self.star_rating.is_empty() && !self.star_rating.contains(&hotel.star_rating) {
            return false;
        }

        if !self.property_type.is_empty() && !self.property_type.contains(&hotel.property_type) {
            return false;
        }

        if !self.matches_amenities(property) {
            return false;
        }

        if self.free_cancellation && !hotel.free_cancellation {
            return false;
        }

        if self.breakfast_included && !hotel.breakfast_included {
            return false;
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    // Store order
    #[default]
    Recommended,
    // Ascending by cheapest room
    PriceLow,
    // Descending by most expensive room
    PriceHigh,
    // Descending by star rating
    Rating,
    // No distance data exists; orders by name
    Distance,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recommended => "recommended",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Distance => "distance",
        }
    }

    // Unknown labels fall back to the store order
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recommended" | "" => Ok(SortKey::Recommended),
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            "rating" => Ok(SortKey::Rating),
            "distance" => Ok(SortKey::Distance),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Keeps matching properties in their input order
pub fn filter_properties(
    properties: &[PropertyWithRooms],
    filter: &FilterSpec,
) -> Vec<PropertyWithRooms> {
    properties
        .iter()
        .filter(|property| filter.matches(property))
        .cloned()
        .collect()
}

pub fn sort_properties(properties: &mut [PropertyWithRooms], key: SortKey) {
    match key {
        SortKey::Recommended => {}
        SortKey::PriceLow => properties.sort_by(|a, b| a.min_price.total_cmp(&b.min_price)),
        SortKey::PriceHigh => properties.sort_by(|a, b| b.max_price.total_cmp(&a.max_price)),
        SortKey::Rating => {
            properties.sort_by(|a, b| b.hotel.star_rating.cmp(&a.hotel.star_rating))
        }
        SortKey::Distance => properties.sort_by(|a, b| a.hotel.name.cmp(&b.hotel.name)),
    }
}

// Filter, then sort; an empty result is valid
pub fn search(
    properties: &[PropertyWithRooms],
    filter: &FilterSpec,
    key: SortKey,
) -> Vec<PropertyWithRooms> {
    let mut results = filter_properties(properties, filter);
    sort_properties(&mut results, key);
    debug!(
        candidates = properties.len(),
        matched = results.len(),
        sort = %key,
        "Catalog search"
    );
    results
}
