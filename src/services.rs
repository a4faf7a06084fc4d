// Typed data-access layer: one repository per entity over the shared store
// Adds creation/update timestamps, never retries

use crate::models::{
    Hotel, HotelPatch, Manager, ManagerPatch, NewHotel, NewManager, NewReservation, NewReview,
    NewRoom, Reservation, ReservationPatch, Review, ReviewPatch, Room, RoomPatch, Validate,
};
use crate::store::{ListQuery, Record, SortDirection, Store, StoreError, Table};
use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{error, info, instrument};

// A persisted record type together with its draft and patch shapes
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Serialize + Validate + Send + Sync;
    type Patch: Serialize + Validate + Send + Sync;

    const TABLE: Table;

    fn id(&self) -> &str;
}

impl Entity for Hotel {
    type Draft = NewHotel;
    type Patch = HotelPatch;
    const TABLE: Table = Table::Hotels;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Room {
    type Draft = NewRoom;
    type Patch = RoomPatch;
    const TABLE: Table = Table::Rooms;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Reservation {
    type Draft = NewReservation;
    type Patch = ReservationPatch;
    const TABLE: Table = Table::Reservations;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Review {
    type Draft = NewReview;
    type Patch = ReviewPatch;
    const TABLE: Table = Table::Reviews;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Manager {
    type Draft = NewManager;
    type Patch = ManagerPatch;
    const TABLE: Table = Table::Managers;

    fn id(&self) -> &str {
        &self.id
    }
}

// Fixed-width UTC timestamp, sorts lexicographically in creation order
pub fn timestamp_now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(record) => Ok(record),
        other => Err(StoreError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn from_record<E: Entity>(record: Record) -> Result<E, StoreError> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

pub struct Repository<E> {
    store: Arc<dyn Store>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    async fn list(&self, operation: &str, query: ListQuery) -> Result<Vec<E>, StoreError> {
        let records = self
            .store
            .list(E::TABLE, query)
            .await
            .map_err(|e| {
                error!(table = E::TABLE.name(), operation, error = %e, "Store list failed");
                e
            })?;
        records.into_iter().map(from_record::<E>).collect()
    }

    // Newest-created first
    #[instrument(skip(self), fields(table = E::TABLE.name()))]
    pub async fn get_all(&self) -> Result<Vec<E>, StoreError> {
        self.list(
            "get_all",
            ListQuery::new().order_by("created_at", SortDirection::Desc),
        )
        .await
    }

    #[instrument(skip(self), fields(table = E::TABLE.name()))]
    pub async fn get_by_id(&self, id: &str) -> Result<Option<E>, StoreError> {
        let mut found = self
            .list("get_by_id", ListQuery::new().where_eq("id", id).limit(1))
            .await?;
        Ok(found.pop())
    }

    // Like get_by_id, but a missing record is an error
    pub async fn require(&self, id: &str) -> Result<E, StoreError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                table: E::TABLE,
                id: id.to_string(),
            })
    }

    #[instrument(skip(self, draft), fields(table = E::TABLE.name()))]
    pub async fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        draft.validate().map_err(StoreError::InvalidRecord)?;

        let mut record = to_record(&draft)?;
        let now = timestamp_now();
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);

        let created = self
            .store
            .create(E::TABLE, record)
            .await
            .map_err(|e| {
                error!(table = E::TABLE.name(), error = %e, "Store create failed");
                e
            })?;
        let entity: E = from_record(created)?;
        info!(table = E::TABLE.name(), id = %entity.id(), "Record created");
        Ok(entity)
    }

    // Bumps updated_at; created_at is never sent
    #[instrument(skip(self, patch), fields(table = E::TABLE.name()))]
    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<(), StoreError> {
        patch.validate().map_err(StoreError::InvalidRecord)?;

        let mut record = to_record(&patch)?;
        record.remove("id");
        record.remove("created_at");
        record.insert("updated_at".to_string(), timestamp_now());

        self.store
            .update(E::TABLE, id, record)
            .await
            .map_err(|e| {
                error!(table = E::TABLE.name(), id, error = %e, "Store update failed");
                e
            })?;
        info!(table = E::TABLE.name(), id, "Record updated");
        Ok(())
    }

    #[instrument(skip(self), fields(table = E::TABLE.name()))]
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(E::TABLE, id).await.map_err(|e| {
            error!(table = E::TABLE.name(), id, error = %e, "Store delete failed");
            e
        })?;
        info!(table = E::TABLE.name(), id, "Record deleted");
        Ok(())
    }
}

impl Repository<Room> {
    // Cheapest first
    pub async fn get_by_hotel_id(&self, hotel_id: &str) -> Result<Vec<Room>, StoreError> {
        self.list(
            "get_by_hotel_id",
            ListQuery::new()
                .where_eq("hotel_id", hotel_id)
                .order_by("price_per_night", SortDirection::Asc),
        )
        .await
    }
}

impl Repository<Reservation> {
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<Reservation>, StoreError> {
        self.list(
            "get_by_user_id",
            ListQuery::new()
                .where_eq("user_id", user_id)
                .order_by("created_at", SortDirection::Desc),
        )
        .await
    }
}

impl Repository<Review> {
    pub async fn get_by_hotel_id(&self, hotel_id: &str) -> Result<Vec<Review>, StoreError> {
        self.list(
            "get_by_hotel_id",
            ListQuery::new()
                .where_eq("hotel_id", hotel_id)
                .order_by("created_at", SortDirection::Desc),
        )
        .await
    }
}

impl Repository<Manager> {
    pub async fn get_by_hotel_id(&self, hotel_id: &str) -> Result<Vec<Manager>, StoreError> {
        self.list(
            "get_by_hotel_id",
            ListQuery::new().where_eq("hotel_id", hotel_id),
        )
        .await
    }
}

// Every repository over one store
#[derive(Clone)]
pub struct DataServices {
    pub hotels: Repository<Hotel>,
    pub rooms: Repository<Room>,
    pub reservations: Repository<Reservation>,
    pub reviews: Repository<Review>,
    pub managers: Repository<Manager>,
}

impl DataServices {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            hotels: Repository::new(Arc::clone(&store)),
            rooms: Repository::new(Arc::clone(&store)),
            reservations: Repository::new(Arc::clone(&store)),
            reviews: Repository::new(Arc::clone(&store)),
            managers: Repository::new(store),
        }
    }
}
