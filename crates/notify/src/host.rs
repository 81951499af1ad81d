//! Identity of the machine running the notifier.

/// Provides the name of the current host.
pub trait HostIdentity: Send + Sync {
    /// Fully-qualified (or bare) host name.
    fn hostname(&self) -> String;

    /// First label of the host name, e.g. `nagios01` for `nagios01.example.com`.
    fn short_name(&self) -> String {
        let name = self.hostname();
        name.split('.').next().unwrap_or_default().to_string()
    }
}

/// Reads the host name from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl HostIdentity for SystemHost {
    fn hostname(&self) -> String {
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read system hostname");
                "unknown".to_string()
            })
    }
}

/// Fixed host name, for tests and for overriding the reported host.
#[derive(Debug, Clone)]
pub struct StaticHost(pub String);

impl StaticHost {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl HostIdentity for StaticHost {
    fn hostname(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_domain() {
        assert_eq!(StaticHost::new("nagios01.dc1.example.com").short_name(), "nagios01");
        assert_eq!(StaticHost::new("nagios01").short_name(), "nagios01");
        assert_eq!(StaticHost::new("").short_name(), "");
    }

    #[test]
    fn test_system_host_is_not_empty() {
        assert!(!SystemHost.hostname().is_empty());
    }
}
