//! Nagios alert payloads.
//!
//! Nagios hands the notifier a single pipe-delimited string whose layout
//! depends on the notification type:
//!
//! - `host` / `short-host`: `hostname | timestamp | type | address | state | output`
//! - `service` / `short-service`:
//!   `service | host alias | timestamp | type | address | state | output`

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::NotifyError;
use crate::severity::Color;

/// The four notification layouts understood by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    Host,
    ShortHost,
    Service,
    ShortService,
}

impl NotificationType {
    /// All recognized types, in template registration order.
    pub const ALL: [Self; 4] = [Self::Host, Self::ShortHost, Self::Service, Self::ShortService];

    /// Name used on the command line and as the template name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::ShortHost => "short-host",
            Self::Service => "service",
            Self::ShortService => "short-service",
        }
    }

    /// Number of pipe-delimited fields expected in the payload.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Host | Self::ShortHost => 6,
            Self::Service | Self::ShortService => 7,
        }
    }

    #[must_use]
    pub const fn is_service(&self) -> bool {
        matches!(self, Self::Service | Self::ShortService)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| NotifyError::InvalidType(s.to_string()))
    }
}

/// Fields of a host notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostAlert {
    pub hostname: String,
    pub timestamp: String,
    pub notification_type: String,
    pub host_address: String,
    pub state: String,
    pub host_output: String,
}

/// Fields of a service notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceAlert {
    pub service_description: String,
    pub host_alias: String,
    pub timestamp: String,
    pub notification_type: String,
    pub host_address: String,
    pub state: String,
    pub service_output: String,
}

/// A parsed Nagios payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Host(HostAlert),
    Service(ServiceAlert),
}

impl Alert {
    /// Split `input` on `|`, trim each field and bind the fields by position.
    ///
    /// The field count must match [`NotificationType::arity`] exactly.
    pub fn parse(kind: NotificationType, input: &str) -> Result<Self, NotifyError> {
        let fields: Vec<&str> = input.split('|').map(str::trim).collect();
        let malformed = || NotifyError::MalformedInput {
            kind,
            expected: kind.arity(),
            found: fields.len(),
        };

        if kind.is_service() {
            let [service_description, host_alias, timestamp, notification_type, host_address, state, service_output] =
                fields.as_slice()
            else {
                return Err(malformed());
            };
            Ok(Self::Service(ServiceAlert {
                service_description: (*service_description).to_string(),
                host_alias: (*host_alias).to_string(),
                timestamp: (*timestamp).to_string(),
                notification_type: (*notification_type).to_string(),
                host_address: (*host_address).to_string(),
                state: (*state).to_string(),
                service_output: (*service_output).to_string(),
            }))
        } else {
            let [hostname, timestamp, notification_type, host_address, state, host_output] =
                fields.as_slice()
            else {
                return Err(malformed());
            };
            Ok(Self::Host(HostAlert {
                hostname: (*hostname).to_string(),
                timestamp: (*timestamp).to_string(),
                notification_type: (*notification_type).to_string(),
                host_address: (*host_address).to_string(),
                state: (*state).to_string(),
                host_output: (*host_output).to_string(),
            }))
        }
    }

    /// Nagios notification type token (`PROBLEM`, `RECOVERY`, ...).
    #[must_use]
    pub fn notification_type(&self) -> &str {
        match self {
            Self::Host(h) => &h.notification_type,
            Self::Service(s) => &s.notification_type,
        }
    }

    /// Host or service state token (`DOWN`, `CRITICAL`, ...).
    #[must_use]
    pub fn state(&self) -> &str {
        match self {
            Self::Host(h) => &h.state,
            Self::Service(s) => &s.state,
        }
    }

    /// Severity color for this alert.
    #[must_use]
    pub fn color(&self) -> Color {
        Color::resolve(self.notification_type(), self.state())
    }

    /// Template context: every parsed field plus the color and the short
    /// name of the host running the notifier.
    #[must_use]
    pub fn context(&self, color: Color, nagios_host: &str) -> Value {
        match self {
            Self::Host(h) => json!({
                "hostname": h.hostname,
                "timestamp": h.timestamp,
                "notification_type": h.notification_type,
                "host_address": h.host_address,
                "state": h.state,
                "host_output": h.host_output,
                "color": color,
                "nagios_host": nagios_host,
            }),
            Self::Service(s) => json!({
                "service_description": s.service_description,
                "host_alias": s.host_alias,
                "timestamp": s.timestamp,
                "notification_type": s.notification_type,
                "host_address": s.host_address,
                "state": s.state,
                "service_output": s.service_output,
                "color": color,
                "nagios_host": nagios_host,
            }),
        }
    }
}
