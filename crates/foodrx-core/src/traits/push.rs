//! Push gateway trait for pluggable notification providers.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider-assigned identifier of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryId(pub String);

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery priority requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPriority {
    /// Deliver immediately, waking the device if necessary.
    High,
    /// Deliver when convenient for the device.
    Normal,
}

impl PushPriority {
    /// Wire name used by the Android channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
        }
    }
}

/// Platform-specific presentation hints attached to every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformHints {
    /// Android small icon resource name.
    pub icon: String,
    /// Android accent color (`#RRGGBB`).
    pub color: String,
    /// iOS badge count.
    pub badge: u32,
    /// iOS sound name.
    pub sound: String,
    /// Delivery priority.
    pub priority: PushPriority,
}

/// A fully built message ready for dispatch to a single device token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Recipient device token.
    pub token: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// String-valued data payload delivered alongside the notification.
    pub data: BTreeMap<String, String>,
    /// Presentation hints.
    pub hints: PlatformHints,
}

/// Errors returned by a push provider for a single message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PushError {
    /// The device token is unknown, expired, or malformed.
    #[error("invalid device token: {0}")]
    InvalidToken(String),
    /// The provider is unreachable or overloaded.
    #[error("push provider unavailable: {0}")]
    Unavailable(String),
    /// The provider refused the message (bad payload, quota, auth).
    #[error("push rejected: {0}")]
    Rejected(String),
    /// Any other failure.
    #[error("push failed: {0}")]
    Other(String),
}

impl PushError {
    /// Short machine-readable category, recorded in analytics metadata.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidToken(_) => "invalid_token",
            Self::Unavailable(_) => "unavailable",
            Self::Rejected(_) => "rejected",
            Self::Other(_) => "other",
        }
    }
}

/// Trait for push notification backends.
///
/// Implementations live in `foodrx-push` (FCM, dry-run, mock). A single
/// call delivers to exactly one token; batching is the caller's concern.
#[async_trait]
pub trait PushGateway: Send + Sync + fmt::Debug + 'static {
    /// Return the provider type name (e.g., "fcm", "dry_run").
    fn provider_type(&self) -> &str;

    /// Send one message.
    async fn send(&self, message: &PushMessage) -> Result<DeliveryId, PushError>;
}
