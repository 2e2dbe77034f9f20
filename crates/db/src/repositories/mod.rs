pub mod booking;
pub mod customer;
pub mod reference;
pub mod roster;
pub mod service;
