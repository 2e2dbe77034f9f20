pub mod customer;
pub mod health;
pub mod reference;
pub mod roster;
pub mod wizard;
