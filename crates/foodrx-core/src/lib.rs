//! # foodrx-core
//!
//! Core crate for FoodRx Notify. Contains configuration schemas, typed
//! identifiers, batch cursors, the run context used to bound pipeline
//! passes, the push gateway trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FoodRx crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
