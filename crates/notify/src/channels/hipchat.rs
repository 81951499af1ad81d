//! HipChat room message channel.
//!
//! Messages go out as a GET to the v1 `rooms/message` endpoint with the
//! message fields as query parameters. Connection failures are retried a
//! bounded number of times; every other failure is logged and reported in
//! the returned [`DeliveryOutcome`] instead of being raised.

use serde_json::Value;
use tracing::{debug, error, warn};

use super::{RawResponse, ReqwestTransport, Transport, TransportError};
use crate::config::{DeliveryConfig, MAX_BODY_LENGTH};
use crate::render::RenderedMessage;
use crate::NotificationRequest;

/// Error object returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiError {
    pub code: Option<i64>,
    pub kind: Option<String>,
    pub message: Option<String>,
}

/// Decoded API reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    /// `{"status": ...}`
    Status(Value),
    /// `{"error": {"code", "type", "message"}}`
    Error(ApiError),
    /// No response, a non-JSON body, or JSON with neither key
    Unexpected,
}

impl ApiReply {
    /// Decode a response body. Anything unrecognized is [`ApiReply::Unexpected`].
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::Unexpected;
        };

        if let Some(err) = value.get("error") {
            Self::Error(ApiError {
                code: err.get("code").and_then(Value::as_i64),
                kind: err.get("type").and_then(Value::as_str).map(str::to_string),
                message: err.get("message").and_then(Value::as_str).map(str::to_string),
            })
        } else if let Some(status) = value.get("status") {
            Self::Status(status.clone())
        } else {
            Self::Unexpected
        }
    }
}

/// Result of a delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    /// Last HTTP response, absent when no attempt reached the server
    pub response: Option<RawResponse>,
    pub reply: ApiReply,
    /// Number of requests made
    pub attempts: u32,
}

impl DeliveryOutcome {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self.reply, ApiReply::Status(_))
    }
}

/// Sends rendered messages to a HipChat room.
pub struct HipChatChannel {
    config: DeliveryConfig,
    transport: Box<dyn Transport>,
}

impl HipChatChannel {
    /// Channel using the blocking `reqwest` transport.
    #[must_use]
    pub fn new(config: DeliveryConfig) -> Self {
        Self::with_transport(config, Box::new(ReqwestTransport::new()))
    }

    #[must_use]
    pub fn with_transport(config: DeliveryConfig, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Query parameters for a message; request overrides are applied last.
    fn build_params(message: &RenderedMessage, request: &NotificationRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("room_id".to_string(), request.room_id.clone()),
            ("from".to_string(), request.sender.clone()),
            ("message".to_string(), message.body.clone()),
            ("color".to_string(), message.color.to_string()),
            ("notify".to_string(), u8::from(request.notify).to_string()),
            ("auth_token".to_string(), request.auth_token.clone()),
        ];

        for (key, value) in &request.params {
            match params.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1.clone_from(value),
                None => params.push((key.clone(), value.clone())),
            }
        }

        params
    }

    /// Deliver a rendered message. Never fails; problems are logged and
    /// reflected in the outcome.
    pub fn deliver(&self, mut message: RenderedMessage, request: &NotificationRequest) -> DeliveryOutcome {
        if message.truncate(MAX_BODY_LENGTH) {
            let preview: String = message.body.chars().take(25).collect();
            warn!(
                channel = "hipchat",
                max_length = MAX_BODY_LENGTH,
                "Message beginning with '{preview}' too long, truncated"
            );
        }

        let params = Self::build_params(&message, request);
        let max_retries = self.config.max_retries.max(1);

        let mut response = None;
        let mut last_error: Option<TransportError> = None;
        let mut attempts = 0;

        for attempt in 1..=max_retries {
            attempts = attempt;
            match self.transport.get(&self.config.endpoint, &params) {
                Ok(r) => {
                    debug!(channel = "hipchat", attempt, status = r.status, "Request completed");
                    response = Some(r);
                    break;
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        channel = "hipchat",
                        error = %e,
                        "Failed to submit message to HipChat API (retry {attempt}/{max_retries})"
                    );
                    last_error = Some(e);
                    std::thread::sleep(self.config.retry_delay);
                }
                Err(e) => {
                    error!(channel = "hipchat", error = %e, "HipChat request failed");
                    last_error = Some(e);
                    break;
                }
            }
        }

        let reply = response
            .as_ref()
            .map_or(ApiReply::Unexpected, |r| ApiReply::from_body(&r.body));

        match &reply {
            ApiReply::Error(err) => {
                error!(
                    channel = "hipchat",
                    code = ?err.code,
                    error_type = ?err.kind,
                    error_message = ?err.message,
                    "HipChat API returned an error"
                );
            }
            ApiReply::Unexpected => {
                let cause = last_error
                    .as_ref()
                    .map_or_else(|| "none".to_string(), ToString::to_string);
                error!(
                    channel = "hipchat",
                    attempts,
                    "Unexpected response: possible exception {cause}"
                );
            }
            ApiReply::Status(status) => {
                debug!(channel = "hipchat", status = %status, "Message delivered");
            }
        }

        DeliveryOutcome {
            response,
            reply,
            attempts,
        }
    }
}
