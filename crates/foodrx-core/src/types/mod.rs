//! Core type definitions used across the FoodRx workspace.

pub mod id;
pub mod pagination;
pub mod run;

pub use id::*;
pub use pagination::{KeysetCursor, KeysetPage, OffsetCursor, PageRequest};
pub use run::RunContext;
