//! # foodrx-push
//!
//! Push gateway adapters for FoodRx Notify. [`PushManager`] selects the
//! configured provider at startup; [`MockPushGateway`] records messages for
//! tests.

pub mod dry_run;
pub mod fcm;
pub mod hints;
pub mod manager;
pub mod message;
pub mod mock;

pub use dry_run::DryRunGateway;
pub use fcm::FcmGateway;
pub use hints::platform_hints;
pub use manager::PushManager;
pub use message::build_message;
pub use mock::MockPushGateway;
