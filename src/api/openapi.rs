//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, availability, catalog, health, payments, promotions, schedules};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Opaline API",
        version = "1.0.0",
        description = "Nail Salon Booking System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Opaline Team", email = "contact@opaline.app")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Availability
        availability::list_slots,
        availability::list_days,
        availability::day_grid,
        // Appointments
        appointments::create_appointment,
        appointments::get_appointment,
        appointments::list_appointments,
        appointments::list_overdue,
        appointments::cancel_appointment,
        appointments::reschedule_appointment,
        appointments::complete_appointment,
        appointments::mark_no_show,
        // Payments
        payments::payment_webhook,
        // Promotions
        promotions::validate_promotion,
        // Schedules
        schedules::list_working_hours,
        schedules::upsert_working_hours,
        schedules::list_blocked_slots,
        schedules::create_blocked_slot,
        schedules::delete_blocked_slot,
        // Catalog
        catalog::list_services,
        catalog::list_employees,
    ),
    components(
        schemas(
            // Appointments
            crate::models::appointment::Appointment,
            crate::models::appointment::AppointmentStatus,
            appointments::CreateAppointmentRequest,
            appointments::CancelRequest,
            appointments::RescheduleRequest,
            // Payments
            payments::PaymentWebhookRequest,
            // Availability
            crate::models::slot::Slot,
            crate::models::slot::SlotStatus,
            // Promotions
            crate::models::promotion::Promotion,
            crate::models::promotion::PromoType,
            promotions::ValidatePromotionRequest,
            crate::services::promotions::PromotionQuote,
            // Schedules
            crate::models::schedule::WorkingInterval,
            crate::models::schedule::UpsertWorkingInterval,
            crate::models::schedule::BlockedSlot,
            crate::models::schedule::CreateBlockedSlot,
            // Catalog
            crate::models::service::Service,
            crate::models::employee::Employee,
            crate::models::client::Client,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "availability", description = "Free slot and day resolution"),
        (name = "appointments", description = "Booking and lifecycle"),
        (name = "payments", description = "Payment collaborator webhook"),
        (name = "promotions", description = "Discount code validation"),
        (name = "schedules", description = "Working hours and blocked slots"),
        (name = "catalog", description = "Read-only services and employees")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
