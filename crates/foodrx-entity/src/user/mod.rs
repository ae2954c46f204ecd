//! User domain entities.

pub mod model;

pub use model::{User, UserContact};
