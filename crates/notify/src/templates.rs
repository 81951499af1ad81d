//! Message templates rendered with Handlebars.
//!
//! One template is registered per [`NotificationType`], under the type's
//! name. The built-in templates can be replaced from a directory holding
//! `<type>.hbs` files.

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;

use crate::alert::NotificationType;
use crate::error::NotifyError;

/// Full HTML host notification.
const HOST_TEMPLATE: &str = concat!(
    "<strong>{{timestamp}} - {{hostname}} (nagios@{{nagios_host}})</strong><br/>",
    "<strong>Type:</strong> {{notification_type}}<br/>",
    "<strong>Host:</strong> {{hostname}} ({{host_address}})<br/>",
    "<strong>State:</strong> {{state}}<br/>",
    "<pre>{{host_output}}</pre>",
);

/// One-line host notification.
const SHORT_HOST_TEMPLATE: &str =
    "[{{notification_type}}] {{hostname}} is {{state}}: {{host_output}} (nagios@{{nagios_host}})";

/// Full HTML service notification.
const SERVICE_TEMPLATE: &str = concat!(
    "<strong>{{timestamp}} - {{service_description}} on {{host_alias}} (nagios@{{nagios_host}})</strong><br/>",
    "<strong>Type:</strong> {{notification_type}}<br/>",
    "<strong>Host:</strong> {{host_alias}} ({{host_address}})<br/>",
    "<strong>State:</strong> {{state}}<br/>",
    "<pre>{{service_output}}</pre>",
);

/// One-line service notification.
const SHORT_SERVICE_TEMPLATE: &str =
    "[{{notification_type}}] {{service_description}} on {{host_alias}} is {{state}}: {{service_output}}";

const fn builtin(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::Host => HOST_TEMPLATE,
        NotificationType::ShortHost => SHORT_HOST_TEMPLATE,
        NotificationType::Service => SERVICE_TEMPLATE,
        NotificationType::ShortService => SHORT_SERVICE_TEMPLATE,
    }
}

/// Renders notification bodies.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create an engine with the built-in templates.
    pub fn new() -> Result<Self, NotifyError> {
        let mut handlebars = Handlebars::new();
        // Fail on a template variable the context does not provide
        handlebars.set_strict_mode(true);
        // Plugin output is passed through as written
        handlebars.register_escape_fn(handlebars::no_escape);

        for kind in NotificationType::ALL {
            handlebars.register_template_string(kind.as_str(), builtin(kind))?;
        }

        Ok(Self { handlebars })
    }

    /// Create an engine whose templates may be overridden by `<dir>/<type>.hbs`.
    pub fn from_dir(dir: &Path) -> Result<Self, NotifyError> {
        let mut engine = Self::new()?;

        for kind in NotificationType::ALL {
            let path = dir.join(format!("{}.hbs", kind.as_str()));
            if !path.exists() {
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|e| {
                NotifyError::Template(format!("Failed to read {}: {e}", path.display()))
            })?;
            engine
                .handlebars
                .register_template_string(kind.as_str(), content)?;

            tracing::debug!(template = kind.as_str(), path = %path.display(), "Loaded template override");
        }

        Ok(engine)
    }

    /// Render the template for `kind` with the given context.
    pub fn render<T: Serialize>(&self, kind: NotificationType, data: &T) -> Result<String, NotifyError> {
        Ok(self.handlebars.render(kind.as_str(), data)?)
    }
}
