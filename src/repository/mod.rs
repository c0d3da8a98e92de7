//! Repository layer for database operations

pub mod appointments;
pub mod clients;
pub mod employees;
pub mod promotions;
pub mod schedules;
pub mod services;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub clients: clients::ClientsRepository,
    pub employees: employees::EmployeesRepository,
    pub services: services::ServicesRepository,
    pub schedules: schedules::SchedulesRepository,
    pub appointments: appointments::AppointmentsRepository,
    pub promotions: promotions::PromotionsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            clients: clients::ClientsRepository::new(pool.clone()),
            employees: employees::EmployeesRepository::new(pool.clone()),
            services: services::ServicesRepository::new(pool.clone()),
            schedules: schedules::SchedulesRepository::new(pool.clone()),
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            promotions: promotions::PromotionsRepository::new(pool.clone()),
            pool,
        }
    }
}
