//! Bounded in-memory security event log.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::clock::SharedClock;
use crate::config::SecurityConfig;

use super::event::{kinds, EventContext, SecurityEvent, SecurityEventSpec, Severity};
use super::validator::{InputValidator, ValidationError, ValidationResult};

/// Aggregate view over the current log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    pub events_by_severity: BTreeMap<Severity, usize>,
    /// The newest events, oldest first.
    pub recent_events: Vec<SecurityEvent>,
}

/// Records security-relevant events, evicting the oldest past capacity.
///
/// Logging is detection only: nothing here blocks the action that
/// triggered the event.
pub struct SecurityMonitor {
    clock: SharedClock,
    context: EventContext,
    events: VecDeque<SecurityEvent>,
    capacity: usize,
    recent: usize,
    next_id: u64,
}

impl SecurityMonitor {
    pub fn new(clock: SharedClock, config: &SecurityConfig) -> Self {
        let context = EventContext {
            user_agent: config.user_agent.clone(),
            url: config.origin_url.clone(),
        };
        Self {
            clock,
            context,
            events: VecDeque::with_capacity(config.log_capacity),
            capacity: config.log_capacity,
            recent: config.recent_events,
            next_id: 1,
        }
    }

    /// Replaces the context stamped onto subsequent events.
    pub fn set_context(&mut self, context: EventContext) {
        self.context = context;
    }

    pub fn context(&self) -> &EventContext {
        &self.context
    }

    /// Appends an event and returns its id.
    ///
    /// Severity defaults to [`Severity::Medium`]; timestamp and context are
    /// filled in here.
    pub fn log_security_event(&mut self, spec: SecurityEventSpec) -> u64 {
        let severity = spec.severity.unwrap_or_default();
        let id = self.alloc_id();
        let event = SecurityEvent {
            id,
            timestamp: self.timestamp(),
            kind: spec.kind,
            severity,
            message: spec.message,
            details: spec.details,
            context: self.context.clone(),
        };

        match severity {
            Severity::High => tracing::error!(id, kind = %event.kind, "{}", event.message),
            Severity::Medium => tracing::warn!(id, kind = %event.kind, "{}", event.message),
            Severity::Low => tracing::info!(id, kind = %event.kind, "{}", event.message),
        }

        if self.capacity == 0 {
            return id;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
        id
    }

    /// Validates `input` and logs the rejection, if any.
    ///
    /// Pattern hits are logged as `xss_attempt` (high); other failures as
    /// `input_validation_failed` (medium).
    pub fn inspect_text(
        &mut self,
        validator: &InputValidator,
        input: &str,
        max_length: usize,
    ) -> ValidationResult {
        let result = validator.validate_text(input, max_length);
        if let Err(err) = &result {
            let spec = match err {
                ValidationError::SuspiciousContent { pattern } => {
                    SecurityEventSpec::new(kinds::XSS_ATTEMPT, "blocked potentially malicious input")
                        .with_severity(Severity::High)
                        .with_detail("pattern", *pattern)
                }
                other => SecurityEventSpec::new(kinds::INPUT_VALIDATION_FAILED, other.to_string())
                    .with_severity(Severity::Medium),
            };
            self.log_security_event(spec.with_detail("length", input.chars().count()));
        }
        result
    }

    /// Checks that the page is served securely.
    ///
    /// Plain `http` is accepted only for loopback hosts. Anything else,
    /// including an unparseable URL, is logged as `insecure_connection`.
    /// Returns whether the connection is considered secure.
    pub fn audit_connection(&mut self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.log_security_event(
                    SecurityEventSpec::new(kinds::INSECURE_CONNECTION, "page URL could not be parsed")
                        .with_severity(Severity::High)
                        .with_detail("url", url)
                        .with_detail("error", e.to_string()),
                );
                return false;
            }
        };

        let secure = match parsed.scheme() {
            "https" => true,
            "http" => is_loopback(&parsed),
            _ => false,
        };
        if !secure {
            self.log_security_event(
                SecurityEventSpec::new(kinds::INSECURE_CONNECTION, "page is not served over HTTPS")
                    .with_severity(Severity::High)
                    .with_detail("url", url)
                    .with_detail("scheme", parsed.scheme()),
            );
        }
        secure
    }

    /// Summarises the current log.
    pub fn security_report(&self) -> SecurityReport {
        let mut events_by_type = BTreeMap::new();
        let mut events_by_severity = BTreeMap::new();
        for event in &self.events {
            *events_by_type.entry(event.kind.clone()).or_insert(0) += 1;
            *events_by_severity.entry(event.severity).or_insert(0) += 1;
        }

        let skip = self.events.len().saturating_sub(self.recent);
        SecurityReport {
            total_events: self.events.len(),
            events_by_type,
            events_by_severity,
            recent_events: self.events.iter().skip(skip).cloned().collect(),
        }
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &SecurityEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        i64::try_from(self.clock.now_ms())
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
