//! Core traits defined in `foodrx-core` and implemented by other crates.

pub mod push;

pub use push::{DeliveryId, PlatformHints, PushError, PushGateway, PushMessage, PushPriority};
