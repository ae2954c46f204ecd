//! FCM HTTP v1 send client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use foodrx_core::config::PushConfig;
use foodrx_core::error::{AppError, ErrorKind};
use foodrx_core::traits::push::{DeliveryId, PushError, PushGateway, PushMessage};

use super::auth::{AccessTokenSource, ServiceAccountKey, TokenCache};
use super::errors::classify_error;

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
    android: AndroidConfig<'a>,
    apns: ApnsConfig<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct AndroidConfig<'a> {
    priority: &'a str,
    notification: AndroidNotification<'a>,
}

#[derive(Debug, Serialize)]
struct AndroidNotification<'a> {
    icon: &'a str,
    color: &'a str,
}

#[derive(Debug, Serialize)]
struct ApnsConfig<'a> {
    payload: ApnsPayload<'a>,
}

#[derive(Debug, Serialize)]
struct ApnsPayload<'a> {
    aps: Aps<'a>,
}

#[derive(Debug, Serialize)]
struct Aps<'a> {
    badge: u32,
    sound: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

impl<'a> SendRequest<'a> {
    fn from_message(message: &'a PushMessage) -> Self {
        let hints = &message.hints;
        Self {
            message: FcmMessage {
                token: &message.token,
                notification: FcmNotification {
                    title: &message.title,
                    body: &message.body,
                },
                data: &message.data,
                android: AndroidConfig {
                    priority: hints.priority.as_str(),
                    notification: AndroidNotification {
                        icon: &hints.icon,
                        color: &hints.color,
                    },
                },
                apns: ApnsConfig {
                    payload: ApnsPayload {
                        aps: Aps {
                            badge: hints.badge,
                            sound: &hints.sound,
                        },
                    },
                },
            },
        }
    }
}

/// Push gateway backed by the FCM HTTP v1 API.
#[derive(Debug)]
pub struct FcmGateway {
    http: reqwest::Client,
    send_url: String,
    tokens: TokenCache,
}

impl FcmGateway {
    /// Build a gateway from configuration.
    ///
    /// No network calls are made until the first send.
    pub fn new(config: &PushConfig) -> Result<Self, AppError> {
        let key = ServiceAccountKey::resolve(config)?;
        let project_id = config
            .project_id
            .clone()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| key.as_ref().and_then(|k| k.project_id.clone()))
            .ok_or_else(|| {
                AppError::configuration(
                    "push.project_id must be set when the service account has no project_id",
                )
            })?;

        let source = match key {
            Some(key) => {
                info!(client_email = %key.client_email, "Using service account credentials for FCM");
                AccessTokenSource::ServiceAccount(key)
            }
            None => {
                info!("No service account configured, using metadata server credentials for FCM");
                AccessTokenSource::MetadataServer {
                    url: config.metadata_token_url.clone(),
                }
            }
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        let send_url = format!(
            "{}/v1/projects/{}/messages:send",
            config.fcm_endpoint.trim_end_matches('/'),
            project_id
        );

        Ok(Self {
            tokens: TokenCache::new(source, http.clone()),
            http,
            send_url,
        })
    }
}

#[async_trait]
impl PushGateway for FcmGateway {
    fn provider_type(&self) -> &str {
        "fcm"
    }

    async fn send(&self, message: &PushMessage) -> Result<DeliveryId, PushError> {
        let access_token = self.tokens.access_token().await?;
        let body = SendRequest::from_message(message);

        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PushError::Unavailable(format!("FCM request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, "FCM response received");

        if status.is_success() {
            let parsed: SendResponse = response
                .json()
                .await
                .map_err(|e| PushError::Other(format!("invalid FCM response: {e}")))?;
            return Ok(DeliveryId(parsed.name));
        }

        if status.as_u16() == 401 {
            warn!("FCM rejected the access token, dropping cached token");
            self.tokens.invalidate().await;
        }

        let text = response.text().await.unwrap_or_default();
        Err(classify_error(status.as_u16(), &text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodrx_core::traits::push::{PlatformHints, PushPriority};

    fn message() -> PushMessage {
        let mut data = BTreeMap::new();
        data.insert("notificationId".to_string(), "n-1".to_string());
        data.insert("type".to_string(), "admin".to_string());
        PushMessage {
            token: "tok".into(),
            title: "Hello".into(),
            body: "World".into(),
            data,
            hints: PlatformHints {
                icon: "ic_notification".into(),
                color: "#9E9E9E".into(),
                badge: 1,
                sound: "default".into(),
                priority: PushPriority::High,
            },
        }
    }

    #[test]
    fn test_request_shape() {
        let msg = message();
        let json = serde_json::to_value(SendRequest::from_message(&msg)).unwrap();
        let m = &json["message"];
        assert_eq!(m["token"], "tok");
        assert_eq!(m["notification"]["title"], "Hello");
        assert_eq!(m["data"]["notificationId"], "n-1");
        assert_eq!(m["android"]["priority"], "high");
        assert_eq!(m["android"]["notification"]["icon"], "ic_notification");
        assert_eq!(m["apns"]["payload"]["aps"]["badge"], 1);
        assert_eq!(m["apns"]["payload"]["aps"]["sound"], "default");
    }

    #[tokio::test]
    async fn test_requires_project_id() {
        let config = PushConfig::default();
        if std::env::var("FIREBASE_SERVICE_ACCOUNT_B64").is_err()
            && std::env::var("GOOGLE_APPLICATION_CREDENTIALS").is_err()
        {
            assert!(FcmGateway::new(&config).is_err());
        }
    }

    #[tokio::test]
    async fn test_builds_send_url() {
        let config = PushConfig {
            project_id: Some("foodrx-prod".into()),
            fcm_endpoint: "https://fcm.example.test/".into(),
            ..PushConfig::default()
        };
        if std::env::var("FIREBASE_SERVICE_ACCOUNT_B64").is_err()
            && std::env::var("GOOGLE_APPLICATION_CREDENTIALS").is_err()
        {
            let gateway = FcmGateway::new(&config).unwrap();
            assert_eq!(
                gateway.send_url,
                "https://fcm.example.test/v1/projects/foodrx-prod/messages:send"
            );
        }
    }
}
