//! # foodrx-service
//!
//! The batch notification pipeline. Each engine pages through its input,
//! isolates per-item failures, and returns a report of what it did.
//!
//! Engines follow constructor injection: stores, the push gateway, and
//! pipeline settings are provided at construction time.

pub mod admin;
pub mod delivery;
pub mod digest;
pub mod generation;
pub mod period;
pub mod report;
pub mod reset;

pub use admin::{AdminNotificationRequest, AdminNotificationResult, AdminNotificationService};
pub use delivery::DeliveryEngine;
pub use digest::{DigestContent, compose_expiring_digest};
pub use generation::{GenerationEngine, GenerationTrigger};
pub use period::PeriodCalendar;
pub use report::{DeliveryReport, GenerationReport, ResetReport};
pub use reset::PeriodResetEngine;
