//! Read-only catalog service (services, employees)

use crate::{
    error::AppResult,
    models::{employee::Employee, service::Service},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.repository.services.list_active().await
    }

    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.repository.employees.list_active().await
    }
}
