//! Pantry domain entities.

pub mod expiry;
pub mod model;

pub use expiry::ExpiryDate;
pub use model::PantryItem;
