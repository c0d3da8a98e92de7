//! Opaline Nail Salon Booking System
//!
//! A Rust REST API server for salon appointment booking: turning employee
//! working hours into bookable slots, resolving availability, and driving
//! appointments through their deposit/confirmation lifecycle.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
