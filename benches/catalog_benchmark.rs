use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{seq::SliceRandom, thread_rng, Rng};
use stay_storefront::catalog::assemble;
use stay_storefront::models::{Hotel, Room};
use stay_storefront::search::{search, FilterSpec, PriceRange, SortKey};

const AMENITIES: [&str; 8] = [
    "Free WiFi",
    "Parking",
    "Swimming pool",
    "Spa",
    "Restaurant",
    "Fitness center",
    "Kitchen",
    "Breakfast included",
];

const PROPERTY_TYPES: [&str; 5] = ["Hotels", "Apartments", "Resorts", "B&Bs", "Hostels"];

// Random hotels with 0-6 rooms each
fn generate_catalog(hotel_count: usize) -> (Vec<Hotel>, Vec<Room>) {
    let mut rng = thread_rng();
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut hotels = Vec::with_capacity(hotel_count);
    let mut rooms = Vec::new();
    for i in 0..hotel_count {
        let id = format!("hotel_{}", i);
        let amenity_count = rng.gen_range(1..=AMENITIES.len());
        let amenities = AMENITIES
            .choose_multiple(&mut rng, amenity_count)
            .map(|a| a.to_string())
            .collect();

        hotels.push(Hotel {
            id: id.clone(),
            name: format!("Hotel {}", rng.gen::<u32>()),
            description: String::new(),
            address: String::new(),
            city: "New York".to_string(),
            country: "US".to_string(),
            latitude: 40.7,
            longitude: -74.0,
            star_rating: rng.gen_range(1..=5),
            amenities,
            images: Vec::new(),
            phone: String::new(),
            email: String::new(),
            website: None,
            check_in_time: "15:00".to_string(),
            check_out_time: "11:00".to_string(),
            policies: String::new(),
            property_type: PROPERTY_TYPES.choose(&mut rng).unwrap().to_string(),
            free_cancellation: rng.gen_bool(0.5),
            breakfast_included: rng.gen_bool(0.3),
            created_at: created,
            updated_at: created,
        });

        for j in 0..rng.gen_range(0..=6) {
            rooms.push(Room {
                id: format!("room_{}_{}", i, j),
                hotel_id: id.clone(),
                room_type: "Double".to_string(),
                description: String::new(),
                price_per_night: rng.gen_range(40.0..800.0),
                max_occupancy: rng.gen_range(1..=6),
                bed_type: "Queen".to_string(),
                room_size: 25,
                amenities: Vec::new(),
                images: Vec::new(),
                is_available: true,
                created_at: created,
                updated_at: created,
            });
        }
    }

    // Store order is not grouped by hotel
    rooms.shuffle(&mut rng);
    (hotels, rooms)
}

pub fn catalog_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_search");

    let filter = FilterSpec {
        price_range: PriceRange::new(0.0, 500.0),
        star_rating: [4, 5].into_iter().collect(),
        amenities: vec!["wifi".to_string()],
        free_cancellation: true,
        ..Default::default()
    };

    for hotel_count in [100, 1_000, 10_000].iter() {
        let (hotels, rooms) = generate_catalog(*hotel_count);

        group.bench_with_input(
            BenchmarkId::new("assemble", hotel_count),
            hotel_count,
            |b, _| b.iter(|| assemble(black_box(hotels.clone()), black_box(rooms.clone()))),
        );

        let catalog = assemble(hotels, rooms);
        for key in [SortKey::Recommended, SortKey::PriceLow, SortKey::Rating] {
            group.bench_with_input(
                BenchmarkId::new(format!("search/{}", key), hotel_count),
                hotel_count,
                |b, _| b.iter(|| search(black_box(&catalog), black_box(&filter), key)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, catalog_benchmark);
criterion_main!(benches);
