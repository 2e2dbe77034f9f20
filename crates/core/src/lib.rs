//! Domain model and booking workflow logic for the Brightbook cleaning-services
//! dashboard.
//!
//! Everything in this crate is free of I/O: the wizard and roster talk to the
//! outside world only through the [`backend::BookingBackend`] port.

pub mod backend;
pub mod bundle;
pub mod errors;
pub mod hold;
pub mod models;
pub mod pricing;
pub mod roster;
pub mod slots;
pub mod wizard;
