//! PostgreSQL implementations of the store traits.

pub mod analytics;
pub mod notification;
pub mod pantry;
pub mod tracker;
pub mod user;

pub use analytics::AnalyticsRepository;
pub use notification::NotificationRepository;
pub use pantry::PantryRepository;
pub use tracker::TrackerRepository;
pub use user::UserRepository;
