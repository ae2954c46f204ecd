//! # foodrx-database
//!
//! State store adapter for FoodRx Notify: the store traits the engines are
//! written against, a lazily connected PostgreSQL pool with concrete
//! repositories, and an in-memory store used by tests and dry runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    AnalyticsSink, NotificationStore, PantryStore, Stores, TrackerStore, UpsertOutcome, UserStore,
};
