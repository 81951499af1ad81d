//! Nagios notifications for HipChat rooms.
//!
//! This crate turns the pipe-delimited payload Nagios passes to a
//! notification command into a room message, colors it by severity and
//! delivers it to the HipChat rooms API.
//!
//! # Usage
//!
//! ```no_run
//! use nagios_notify::{DeliveryConfig, NotificationRequest, Notifier};
//!
//! let notifier = Notifier::new(DeliveryConfig::from_env())?;
//!
//! let request = NotificationRequest::new(
//!     "host",
//!     "web01 | 2024-01-01 00:00:00 | PROBLEM | 10.0.0.5 | DOWN | Host unreachable",
//!     "token",
//!     "Nagios",
//!     "ops",
//! )?
//! .with_notify(true);
//!
//! let outcome = notifier.notify(&request)?;
//! println!("delivered: {}", outcome.is_delivered());
//! # Ok::<(), nagios_notify::NotifyError>(())
//! ```
//!
//! # Architecture
//!
//! - [`Renderer`] parses the payload, picks a [`Color`] and renders the
//!   template for the notification type
//! - [`HipChatChannel`] sends the message through a [`Transport`], retrying
//!   connection failures
//! - [`Notifier`] chains the two

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod channels;
pub mod config;
pub mod error;
pub mod host;
pub mod render;
pub mod severity;
pub mod templates;

pub use alert::{Alert, HostAlert, NotificationType, ServiceAlert};
pub use channels::hipchat::{ApiError, ApiReply, DeliveryOutcome, HipChatChannel};
pub use channels::{RawResponse, ReqwestTransport, Transport, TransportError};
pub use config::{DeliveryConfig, DEFAULT_ENDPOINT, MAX_BODY_LENGTH};
pub use error::NotifyError;
pub use host::{HostIdentity, StaticHost, SystemHost};
pub use render::{RenderedMessage, Renderer};
pub use severity::Color;
pub use templates::TemplateEngine;

use tracing::info;

/// A single notification to render and deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub kind: NotificationType,
    /// Pipe-delimited Nagios payload
    pub raw_input: String,
    pub auth_token: String,
    /// Name shown as the message sender
    pub sender: String,
    pub room_id: String,
    /// Whether the room should be alerted
    pub notify: bool,
    /// Extra query parameters, applied over the defaults
    pub params: Vec<(String, String)>,
}

impl NotificationRequest {
    /// Build a request, validating the notification type.
    pub fn new(
        kind: &str,
        raw_input: impl Into<String>,
        auth_token: impl Into<String>,
        sender: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            kind: kind.parse()?,
            raw_input: raw_input.into(),
            auth_token: auth_token.into(),
            sender: sender.into(),
            room_id: room_id.into(),
            notify: false,
            params: vec![],
        })
    }

    #[must_use]
    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    /// Add a query parameter; later values for the same key win.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }
}

/// Renders notifications and delivers them to HipChat.
pub struct Notifier {
    renderer: Renderer,
    channel: HipChatChannel,
}

impl Notifier {
    /// Notifier with built-in templates, the system host name and the
    /// `reqwest` transport.
    pub fn new(config: DeliveryConfig) -> Result<Self, NotifyError> {
        Ok(Self::with_parts(Renderer::new()?, HipChatChannel::new(config)))
    }

    #[must_use]
    pub fn with_parts(renderer: Renderer, channel: HipChatChannel) -> Self {
        Self { renderer, channel }
    }

    /// Render the message for a request without sending it.
    pub fn render(&self, request: &NotificationRequest) -> Result<RenderedMessage, NotifyError> {
        self.renderer.render_alert(request.kind, &request.raw_input)
    }

    /// Render and deliver a notification.
    ///
    /// Only input and template errors are returned; delivery problems are
    /// logged and described by the [`DeliveryOutcome`].
    pub fn notify(&self, request: &NotificationRequest) -> Result<DeliveryOutcome, NotifyError> {
        let message = self.render(request)?;
        let outcome = self.channel.deliver(message, request);

        info!(
            kind = %request.kind,
            room = %request.room_id,
            attempts = outcome.attempts,
            delivered = outcome.is_delivered(),
            "Notification processed"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::channels::MockTransport;

    const HOST_INPUT: &str =
        "web01 | 2024-01-01 00:00:00 | PROBLEM | 10.0.0.5 | DOWN | Host unreachable";

    fn notifier(transport: MockTransport) -> Notifier {
        let renderer = Renderer::with_parts(
            TemplateEngine::new().unwrap(),
            Box::new(StaticHost::new("nagios01")),
        );
        let config = DeliveryConfig::default().with_retry_delay(Duration::ZERO);
        Notifier::with_parts(renderer, HipChatChannel::with_transport(config, Box::new(transport)))
    }

    #[test]
    fn test_request_rejects_unknown_type() {
        let err = NotificationRequest::new("hostgroup", HOST_INPUT, "t", "Nagios", "ops").unwrap_err();
        assert!(matches!(err, NotifyError::InvalidType(_)));
    }

    #[test]
    fn test_with_param_replaces_existing_key() {
        let request = NotificationRequest::new("host", HOST_INPUT, "t", "Nagios", "ops")
            .unwrap()
            .with_param("message_format", "html")
            .with_param("message_format", "text");
        assert_eq!(request.params, vec![("message_format".to_string(), "text".to_string())]);
    }

    #[test]
    fn test_notify_renders_and_delivers() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|_, params| {
                params
                    .iter()
                    .any(|(k, v)| k == "message" && v.contains("web01") && v.contains("Host unreachable"))
                    && params.iter().any(|(k, v)| k == "color" && v == "red")
            })
            .times(1)
            .returning(|_, _| Ok(RawResponse::new(200, r#"{"status": "sent"}"#)));

        let request = NotificationRequest::new("host", HOST_INPUT, "t", "Nagios", "ops").unwrap();
        let outcome = notifier(transport).notify(&request).unwrap();
        assert!(outcome.is_delivered());
    }

    #[test]
    fn test_malformed_input_never_reaches_transport() {
        let mut transport = MockTransport::new();
        transport.expect_get().never();

        let request = NotificationRequest::new("service", HOST_INPUT, "t", "Nagios", "ops").unwrap();
        let err = notifier(transport).notify(&request).unwrap_err();
        assert!(matches!(
            err,
            NotifyError::MalformedInput {
                kind: NotificationType::Service,
                expected: 7,
                found: 6
            }
        ));
    }
}
