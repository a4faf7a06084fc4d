// Hotel booking storefront: catalog browsing, booking and back-office operations
// over a hosted record store

// Shared types
pub mod error;
pub mod models;

// Persistence boundary and its implementations
pub mod memory_store;
pub mod remote_store;
pub mod services;
pub mod store;

// Guest-facing and back-office features
pub mod admin;
pub mod booking;
pub mod catalog;
pub mod identity;
pub mod search;
pub mod storefront;

// Setup
pub mod config;
pub mod logging;

// Re-export key types for convenience
pub use admin::{AdminConsole, AdminError, AdminTables, DashboardCounts};
pub use booking::{BookingCalculator, BookingError, BookingQuote, BookingRequest, BookingService};
pub use catalog::{assemble, rating_summary, CatalogLoader, PropertyWithRooms, RatingSummary};
pub use config::{StorefrontConfig, TransitionPolicy};
pub use error::ErrorKind;
pub use identity::{AuthSnapshot, IdentityError, IdentityProvider, SessionManager, StaticIdentity};
pub use logging::{init_logging, LogConfig};
pub use memory_store::MemoryStore;
pub use models::{
    Hotel, Manager, PaymentStatus, Reservation, ReservationStatus, Review, Room, User,
};
pub use remote_store::RemoteStore;
pub use search::{search, FilterSpec, PriceRange, SortKey};
pub use services::{DataServices, Entity, Repository};
pub use store::{ClientError, Store, StoreError, Table};
pub use storefront::{PropertyDetails, Storefront};
