//! Domain services for the student-status view.
//!
//! All aggregation and reconciliation logic lives here; the REST layer
//! only maps requests onto these services.

pub mod attendance;
pub mod calendar;
pub mod enrollment;
pub mod identity;
pub mod payments;
pub mod statistics;
pub mod status;

#[cfg(test)]
pub mod testing;
