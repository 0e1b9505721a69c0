//! Security event records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known event kinds.
pub mod kinds {
    pub const XSS_ATTEMPT: &str = "xss_attempt";
    pub const INPUT_VALIDATION_FAILED: &str = "input_validation_failed";
    pub const INSECURE_CONNECTION: &str = "insecure_connection";
    pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";
    pub const FILE_REJECTED: &str = "file_rejected";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// Where the event happened. Filled in by the monitor, not the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    pub user_agent: String,
    pub url: String,
}

/// What a caller reports; the monitor turns it into a [`SecurityEvent`].
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityEventSpec {
    pub kind: String,
    pub severity: Option<Severity>,
    pub message: String,
    pub details: Map<String, Value>,
}

impl SecurityEventSpec {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity: None,
            message: message.into(),
            details: Map::new(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// An immutable entry in the security log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
    pub context: EventContext,
}
