//! Read-only catalog endpoints for the excluded UI layer

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{employee::Employee, service::Service},
};

/// List active services
#[utoipa::path(
    get,
    path = "/services",
    tag = "catalog",
    responses(
        (status = 200, description = "Active services", body = Vec<Service>)
    )
)]
pub async fn list_services(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Service>>> {
    let services = state.services.catalog.list_services().await?;
    Ok(Json(services))
}

/// List active employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = "catalog",
    responses(
        (status = 200, description = "Active employees", body = Vec<Employee>)
    )
)]
pub async fn list_employees(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Employee>>> {
    let employees = state.services.catalog.list_employees().await?;
    Ok(Json(employees))
}
