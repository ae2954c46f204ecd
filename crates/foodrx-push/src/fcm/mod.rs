//! Firebase Cloud Messaging HTTP v1 gateway.

mod auth;
mod client;
mod errors;

pub use auth::{AccessTokenSource, ServiceAccountKey};
pub use client::FcmGateway;
pub use errors::classify_error;
