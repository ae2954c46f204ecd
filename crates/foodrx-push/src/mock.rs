//! Recording gateway for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use foodrx_core::traits::push::{DeliveryId, PushError, PushGateway, PushMessage};

#[derive(Debug, Default)]
struct MockState {
    sent: Vec<PushMessage>,
    attempts: usize,
    failures: HashMap<String, PushError>,
}

/// Push gateway that records every message and fails on scripted tokens.
#[derive(Debug, Default)]
pub struct MockPushGateway {
    state: Mutex<MockState>,
}

impl MockPushGateway {
    /// Create a gateway that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send to `token` with `error`.
    pub fn fail_token(&self, token: &str, error: PushError) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.insert(token.to_string(), error);
        }
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<PushMessage> {
        self.state.lock().map(|s| s.sent.clone()).unwrap_or_default()
    }

    /// Number of send calls, successful or not.
    pub fn attempts(&self) -> usize {
        self.state.lock().map(|s| s.attempts).unwrap_or_default()
    }
}

#[async_trait]
impl PushGateway for MockPushGateway {
    fn provider_type(&self) -> &str {
        "mock"
    }

    async fn send(&self, message: &PushMessage) -> Result<DeliveryId, PushError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| PushError::Other("mock state poisoned".to_string()))?;
        state.attempts += 1;
        if let Some(error) = state.failures.get(&message.token) {
            return Err(error.clone());
        }
        state.sent.push(message.clone());
        Ok(DeliveryId(format!("mock/{}", state.sent.len())))
    }
}
