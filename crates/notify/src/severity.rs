//! Severity colors for room messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message background colors accepted by the HipChat rooms API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Red,
    Green,
    Purple,
    Gray,
}

impl Color {
    /// Used for any token missing from the table.
    pub const DEFAULT: Self = Self::Red;

    /// Look up the color for a Nagios notification type or state token.
    #[must_use]
    pub fn for_token(token: &str) -> Option<Self> {
        let color = match token {
            // Notification types
            "PROBLEM" => Self::Red,
            "RECOVERY" | "ACKNOWLEDGEMENT" | "FLAPPINGSTOP" | "DOWNTIMEEND"
            | "DOWNTIMECANCELLED" => Self::Green,
            "FLAPPINGSTART" => Self::Purple,
            "FLAPPINGDISABLED" | "DOWNTIMESTART" => Self::Gray,
            "CUSTOM" => Self::Yellow,
            // Host and service states
            "OK" | "UP" => Self::Green,
            "WARNING" => Self::Yellow,
            "CRITICAL" | "DOWN" | "UNREACHABLE" => Self::Red,
            "UNKNOWN" => Self::Gray,
            _ => return None,
        };
        Some(color)
    }

    /// Pick the color for an alert.
    ///
    /// Problems are colored by state; every other notification type is
    /// colored by the type itself.
    #[must_use]
    pub fn resolve(notification_type: &str, state: &str) -> Self {
        let key = if notification_type == "PROBLEM" {
            state
        } else {
            notification_type
        };
        Self::for_token(key).unwrap_or(Self::DEFAULT)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Gray => "gray",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_uses_state() {
        assert_eq!(Color::resolve("PROBLEM", "CRITICAL"), Color::for_token("CRITICAL").unwrap());
        assert_eq!(Color::resolve("PROBLEM", "WARNING"), Color::Yellow);
        assert_eq!(Color::resolve("PROBLEM", "DOWN"), Color::Red);
        assert_eq!(Color::resolve("PROBLEM", "UNKNOWN"), Color::Gray);
    }

    #[test]
    fn test_non_problem_ignores_state() {
        assert_eq!(Color::resolve("RECOVERY", "CRITICAL"), Color::for_token("RECOVERY").unwrap());
        assert_eq!(Color::resolve("FLAPPINGSTART", "OK"), Color::Purple);
        assert_eq!(Color::resolve("DOWNTIMESTART", "DOWN"), Color::Gray);
    }

    #[test]
    fn test_unknown_tokens_default_to_red() {
        assert_eq!(Color::resolve("PROBLEM", "ON FIRE"), Color::Red);
        assert_eq!(Color::resolve("SOMETHINGNEW", "OK"), Color::Red);
        assert_eq!(Color::for_token("ok"), None);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Color::Purple).unwrap(), "purple");
        assert_eq!(Color::Gray.to_string(), "gray");
    }
}
