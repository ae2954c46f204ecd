//! Mapping of FCM error responses onto [`PushError`].

use serde::Deserialize;

use foodrx_core::traits::push::PushError;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "errorCode")]
    error_code: Option<String>,
}

/// Classify a non-success FCM response.
pub fn classify_error(status: u16, body: &str) -> PushError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));
    let code = parsed.as_ref().and_then(|e| {
        e.error
            .details
            .iter()
            .find_map(|d| d.error_code.clone())
            .or_else(|| Some(e.error.status.clone()).filter(|s| !s.is_empty()))
    });

    match code.as_deref() {
        Some("UNREGISTERED") | Some("SENDER_ID_MISMATCH") => PushError::InvalidToken(message),
        Some("INVALID_ARGUMENT") if message.to_lowercase().contains("token") => {
            PushError::InvalidToken(message)
        }
        Some("UNAVAILABLE") | Some("INTERNAL") | Some("QUOTA_EXCEEDED") => {
            PushError::Unavailable(message)
        }
        _ => match status {
            404 => PushError::InvalidToken(message),
            429 | 500..=599 => PushError::Unavailable(message),
            400..=499 => PushError::Rejected(message),
            _ => PushError::Other(message),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_token() {
        let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND",
            "details":[{"@type":"type.googleapis.com/google.firebase.fcm.v1.FcmError","errorCode":"UNREGISTERED"}]}}"#;
        assert!(matches!(classify_error(404, body), PushError::InvalidToken(_)));
    }

    #[test]
    fn test_invalid_registration_token() {
        let body = r#"{"error":{"code":400,"message":"The registration token is not a valid FCM registration token","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(classify_error(400, body), PushError::InvalidToken(_)));
    }

    #[test]
    fn test_bad_payload_is_rejected() {
        let body = r#"{"error":{"code":400,"message":"Invalid value at 'message.data'","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(classify_error(400, body), PushError::Rejected(_)));
    }

    #[test]
    fn test_server_errors_are_unavailable() {
        assert!(matches!(classify_error(503, "oops"), PushError::Unavailable(_)));
        assert!(matches!(classify_error(429, ""), PushError::Unavailable(_)));
    }

    #[test]
    fn test_auth_failure_is_rejected() {
        let body = r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#;
        assert!(matches!(classify_error(401, body), PushError::Rejected(_)));
    }
}
