// Entry point that wires configuration, the store and every service together

use crate::admin::AdminConsole;
use crate::booking::BookingService;
use crate::catalog::{rating_summary, CatalogLoader, PropertyWithRooms, RatingSummary};
use crate::config::StorefrontConfig;
use crate::memory_store::MemoryStore;
use crate::models::{Reservation, Review, User};
use crate::remote_store::RemoteStore;
use crate::search::{search, FilterSpec, SortKey};
use crate::services::DataServices;
use crate::store::{ClientError, Store, StoreError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

// Everything the property page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDetails {
    pub property: PropertyWithRooms,
    pub reviews: Vec<Review>,
    pub rating: RatingSummary,
}

#[derive(Clone)]
pub struct Storefront {
    config: StorefrontConfig,
    services: DataServices,
    catalog: CatalogLoader,
    booking: BookingService,
    admin: AdminConsole,
}

impl Storefront {
    pub fn new(config: StorefrontConfig, store: Arc<dyn Store>) -> Self {
        let services = DataServices::new(store);
        Self {
            catalog: CatalogLoader::new(&services),
            booking: BookingService::new(&services),
            admin: AdminConsole::new(services.clone(), &config.admin),
            services,
            config,
        }
    }

    // Backed by the hosted store at config.store.base_url
    pub fn connect(config: StorefrontConfig) -> Result<Self, ClientError> {
        let store = RemoteStore::new(&config.store)?;
        info!(base_url = %config.store.base_url, "Storefront connected");
        Ok(Self::new(config, Arc::new(store)))
    }

    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn services(&self) -> &DataServices {
        &self.services
    }

    pub fn booking(&self) -> &BookingService {
        &self.booking
    }

    pub fn admin(&self) -> &AdminConsole {
        &self.admin
    }

    // Filter panel state before the guest touches anything
    pub fn default_filter(&self) -> FilterSpec {
        FilterSpec::storefront_default(self.config.catalog.price_ceiling)
    }

    // Fresh catalog load, then filter and sort
    #[instrument(skip(self, filter))]
    pub async fn browse(
        &self,
        filter: &FilterSpec,
        sort: SortKey,
    ) -> Result<Vec<PropertyWithRooms>, StoreError> {
        let catalog = self.catalog.load().await?;
        Ok(search(&catalog, filter, sort))
    }

    #[instrument(skip(self))]
    pub async fn property_details(&self, hotel_id: &str) -> Result<PropertyDetails, StoreError> {
        let (hotel, rooms, reviews) = futures::try_join!(
            self.services.hotels.require(hotel_id),
            self.services.rooms.get_by_hotel_id(hotel_id),
            self.services.reviews.get_by_hotel_id(hotel_id)
        )?;

        let rating = rating_summary(&hotel, &reviews);
        Ok(PropertyDetails {
            property: PropertyWithRooms::new(hotel, rooms),
            reviews,
            rating,
        })
    }

    pub async fn my_reservations(&self, user: &User) -> Result<Vec<Reservation>, StoreError> {
        self.services.reservations.get_by_user_id(&user.id).await
    }
}
