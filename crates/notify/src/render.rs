//! Turns a raw Nagios payload into a room message.

use crate::alert::{Alert, NotificationType};
use crate::error::NotifyError;
use crate::host::{HostIdentity, SystemHost};
use crate::severity::Color;
use crate::templates::TemplateEngine;

/// A rendered message body and its severity color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub body: String,
    pub color: Color,
}

impl RenderedMessage {
    /// Length of the body in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Cut the body down to at most `max_chars` characters.
    ///
    /// Returns `true` if anything was removed.
    pub fn truncate(&mut self, max_chars: usize) -> bool {
        match self.body.char_indices().nth(max_chars) {
            Some((idx, _)) => {
                self.body.truncate(idx);
                true
            }
            None => false,
        }
    }
}

/// Parses payloads and renders them through the template engine.
pub struct Renderer {
    templates: TemplateEngine,
    host: Box<dyn HostIdentity>,
}

impl Renderer {
    /// Renderer with the built-in templates and the system host name.
    pub fn new() -> Result<Self, NotifyError> {
        Ok(Self::with_parts(TemplateEngine::new()?, Box::new(SystemHost)))
    }

    #[must_use]
    pub fn with_parts(templates: TemplateEngine, host: Box<dyn HostIdentity>) -> Self {
        Self { templates, host }
    }

    /// Render a payload for a notification type given by name.
    pub fn render(&self, kind: &str, raw_input: &str) -> Result<RenderedMessage, NotifyError> {
        self.render_alert(kind.parse()?, raw_input)
    }

    /// Render a payload for an already validated notification type.
    pub fn render_alert(
        &self,
        kind: NotificationType,
        raw_input: &str,
    ) -> Result<RenderedMessage, NotifyError> {
        let alert = Alert::parse(kind, raw_input)?;
        let color = alert.color();
        let nagios_host = self.host.short_name();

        let context = alert.context(color, &nagios_host);
        let body = self.templates.render(kind, &context)?;

        tracing::debug!(kind = %kind, color = %color, length = body.len(), "Rendered message");

        Ok(RenderedMessage { body, color })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;

    const HOST_INPUT: &str =
        "web01 | 2024-01-01 00:00:00 | PROBLEM | 10.0.0.5 | DOWN | Host unreachable";
    const SERVICE_INPUT: &str =
        "HTTP | web01 | 2024-01-01 00:00:00 | RECOVERY | 10.0.0.5 | OK | HTTP OK: 200";

    fn renderer() -> Renderer {
        Renderer::with_parts(
            TemplateEngine::new().unwrap(),
            Box::new(StaticHost::new("nagios01.example.com")),
        )
    }

    #[test]
    fn test_render_host_end_to_end() {
        let message = renderer().render("host", HOST_INPUT).unwrap();
        assert_eq!(message.color, Color::for_token("DOWN").unwrap());
        assert!(message.body.contains("web01"));
        assert!(message.body.contains("Host unreachable"));
        assert!(message.body.contains("nagios@nagios01"));
    }

    #[test]
    fn test_render_every_type() {
        let r = renderer();
        for (kind, input, expected) in [
            ("host", HOST_INPUT, "Host unreachable"),
            ("short-host", HOST_INPUT, "Host unreachable"),
            ("service", SERVICE_INPUT, "HTTP OK: 200"),
            ("short-service", SERVICE_INPUT, "HTTP OK: 200"),
        ] {
            let message = r.render(kind, input).unwrap();
            assert!(!message.is_empty(), "{kind} rendered empty");
            assert!(message.body.contains(expected), "{kind}: {}", message.body);
        }
    }

    #[test]
    fn test_render_passes_plugin_output_through() {
        let output = "PING OK - Packet loss = 0%, RTA = 0.51 ms & 'fine'";
        let input = format!("web01|now|RECOVERY|10.0.0.5|UP|{output}");
        let message = renderer().render("short-host", &input).unwrap();
        assert!(message.body.contains(output), "{}", message.body);
        assert!(message.body.contains("UP"));
    }

    #[test]
    fn test_render_recovery_color() {
        let message = renderer().render("service", SERVICE_INPUT).unwrap();
        assert_eq!(message.color, Color::Green);
    }

    #[test]
    fn test_render_rejects_bad_input() {
        let r = renderer();
        assert!(matches!(
            r.render("hostgroup", HOST_INPUT),
            Err(NotifyError::InvalidType(_))
        ));
        assert!(matches!(
            r.render("short-service", HOST_INPUT),
            Err(NotifyError::MalformedInput { .. })
        ));
        assert!(matches!(
            r.render("host", "web01 | DOWN"),
            Err(NotifyError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let mut message = RenderedMessage {
            body: "é".repeat(10),
            color: Color::Red,
        };
        assert!(!message.truncate(10));
        assert_eq!(message.len(), 10);

        assert!(message.truncate(4));
        assert_eq!(message.body, "éééé");
    }
}
