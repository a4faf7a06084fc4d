// Boundary to the hosted backend that owns every persisted record
// Records cross this boundary as JSON objects; ids are assigned by the store

use crate::error::ErrorKind;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

// Errors raised by a store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Store error: {status_code} - {message}")]
    ResponseError { status_code: u16, message: String },

    #[error("Record not found: {table}/{id}")]
    NotFound { table: Table, id: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidRecord(_) => ErrorKind::ValidationFailure,
            StoreError::NetworkError(_)
            | StoreError::Timeout(_)
            | StoreError::ResponseError { .. }
            | StoreError::SerializationError(_) => ErrorKind::IoFailure,
        }
    }
}

// Errors raised while building a store client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Collections held by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Hotels,
    Rooms,
    Reservations,
    Reviews,
    Managers,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Hotels,
        Table::Rooms,
        Table::Reservations,
        Table::Reviews,
        Table::Managers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Hotels => "hotels",
            Table::Rooms => "rooms",
            Table::Reservations => "reservations",
            Table::Reviews => "reviews",
            Table::Managers => "managers",
        }
    }

    // Short prefix for store-assigned ids
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Table::Hotels => "hotel",
            Table::Rooms => "room",
            Table::Reservations => "res",
            Table::Reviews => "review",
            Table::Managers => "mgr",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

// Equality filter, ordering and limit understood by every store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Option<(String, Value)>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some((field.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    // Whether a stored record satisfies the equality filter
    pub fn matches(&self, record: &Map<String, Value>) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |(field, value)| record.get(field) == Some(value))
    }
}

pub type Record = Map<String, Value>;

// External store trait; a single best-effort attempt per call, no retries
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn list(&self, table: Table, query: ListQuery) -> Result<Vec<Record>, StoreError>;

    // Insert a record and return it with its assigned id
    async fn create(&self, table: Table, record: Record) -> Result<Record, StoreError>;

    // Merge the given fields into an existing record
    async fn update(&self, table: Table, id: &str, patch: Record) -> Result<(), StoreError>;

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError>;
}
