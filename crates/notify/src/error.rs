//! Error types for the notifier.

use thiserror::Error;

use crate::alert::NotificationType;

/// Errors that abort a notification before anything is sent.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Notification type is not one of `host`, `short-host`, `service`, `short-service`
    #[error("Invalid notification type: {0}")]
    InvalidType(String),

    /// The pipe-delimited payload has the wrong number of fields for its type
    #[error("Malformed {kind} input: expected {expected} fields, found {found}")]
    MalformedInput {
        kind: NotificationType,
        expected: usize,
        found: usize,
    },

    /// Template registration or rendering failed
    #[error("Template error: {0}")]
    Template(String),
}

impl From<handlebars::RenderError> for NotifyError {
    fn from(e: handlebars::RenderError) -> Self {
        Self::Template(e.to_string())
    }
}

impl From<handlebars::TemplateError> for NotifyError {
    fn from(e: handlebars::TemplateError) -> Self {
        Self::Template(e.to_string())
    }
}
