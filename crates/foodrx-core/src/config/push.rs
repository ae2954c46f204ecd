//! Push provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Push gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Provider: `"fcm"` or `"dry_run"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Firebase project id. Falls back to the service account's project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Base64-encoded service account JSON.
    #[serde(default)]
    pub service_account_b64: Option<String>,
    /// Path to a service account JSON file.
    #[serde(default)]
    pub service_account_path: Option<String>,
    /// FCM API base URL.
    #[serde(default = "default_fcm_endpoint")]
    pub fcm_endpoint: String,
    /// Metadata server token URL used when no service account is configured.
    #[serde(default = "default_metadata_token_url")]
    pub metadata_token_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Android notification icon resource name.
    #[serde(default = "default_android_icon")]
    pub android_icon: String,
}

impl PushConfig {
    /// Validate provider selection.
    pub fn validate(&self) -> Result<(), AppError> {
        match self.provider.as_str() {
            "fcm" | "dry_run" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown push provider: '{other}'. Supported: fcm, dry_run"
            ))),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            project_id: None,
            service_account_b64: None,
            service_account_path: None,
            fcm_endpoint: default_fcm_endpoint(),
            metadata_token_url: default_metadata_token_url(),
            request_timeout_seconds: default_request_timeout(),
            android_icon: default_android_icon(),
        }
    }
}

fn default_provider() -> String {
    "fcm".to_string()
}

fn default_fcm_endpoint() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_metadata_token_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_android_icon() -> String {
    "ic_notification".to_string()
}
