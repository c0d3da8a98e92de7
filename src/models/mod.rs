//! Data models for Opaline

pub mod appointment;
pub mod client;
pub mod employee;
pub mod promotion;
pub mod schedule;
pub mod service;
pub mod slot;

// Re-export commonly used types
pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use client::Client;
pub use employee::Employee;
pub use promotion::{PromoType, Promotion};
pub use schedule::{BlockedSlot, WorkingInterval};
pub use service::Service;
pub use slot::{Slot, SlotStatus};
