//! Business logic services

pub mod availability;
pub mod booking;
pub mod catalog;
pub mod promotions;
pub mod schedules;

use crate::{config::BookingConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub booking: booking::BookingService,
    pub catalog: catalog::CatalogService,
    pub promotions: promotions::PromotionsService,
    pub schedules: schedules::SchedulesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, booking_config: BookingConfig) -> Self {
        let availability =
            availability::AvailabilityService::new(repository.clone(), booking_config.clone());
        Self {
            booking: booking::BookingService::new(
                repository.clone(),
                availability.clone(),
                booking_config,
            ),
            catalog: catalog::CatalogService::new(repository.clone()),
            promotions: promotions::PromotionsService::new(repository.clone()),
            schedules: schedules::SchedulesService::new(repository),
            availability,
        }
    }
}
