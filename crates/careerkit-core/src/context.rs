//! Wires the guard, validator, monitor and toasts into one UI action flow.
//!
//! A frontend owns one [`AppContext`] and routes user actions through
//! [`AppContext::submit_text`] or [`AppContext::submit_file`]:
//!
//! 1. the rate limit for `"<action>:<subject>"` is checked; a denial shows a
//!    warning toast with the time until reset,
//! 2. the input is validated; a rejection is logged and shown as an error,
//! 3. otherwise a success toast is shown and the sanitized input returned.

use std::time::Duration;

use crate::clock::{Millis, SharedClock};
use crate::config::Config;
use crate::error::CoreResult;
use crate::guard::{RateDecision, RateLimitGuard};
use crate::notify::{NotificationCenter, Toast, ToastId, ToastOptions};
use crate::security::{
    kinds, sanitize_text, FileDescriptor, InputValidator, SecurityEventSpec, SecurityMonitor,
    Severity, ValidationError,
};

/// What happened to a submitted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action may proceed with `sanitized` input.
    Accepted { toast: ToastId, sanitized: String },
    /// Too many attempts; retry at `reset_at`.
    RateLimited { toast: ToastId, reset_at: Millis },
    /// The input failed validation.
    Rejected { toast: ToastId, error: ValidationError },
}

impl Outcome {
    pub fn toast(&self) -> ToastId {
        match self {
            Self::Accepted { toast, .. }
            | Self::RateLimited { toast, .. }
            | Self::Rejected { toast, .. } => *toast,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Owns one instance of every core component for a session.
pub struct AppContext {
    config: Config,
    clock: SharedClock,
    pub guard: RateLimitGuard,
    pub validator: InputValidator,
    pub monitor: SecurityMonitor,
    pub notifications: NotificationCenter,
}

impl AppContext {
    pub fn new(config: Config, clock: SharedClock) -> Self {
        let guard = RateLimitGuard::with_counting(clock.clone(), config.rate_limit.counting);
        let validator = InputValidator::from_config(&config.validation);
        let monitor = SecurityMonitor::new(clock.clone(), &config.security);
        let notifications = NotificationCenter::new(clock.clone(), config.notifications.clone());
        Self {
            config,
            clock,
            guard,
            validator,
            monitor,
            notifications,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Audits the configured origin URL. Returns whether it is secure.
    pub fn audit_origin(&mut self) -> bool {
        let origin = self.config.security.origin_url.clone();
        self.monitor.audit_connection(&origin)
    }

    /// Runs a text submission (chat message, form field) through the guardrails.
    ///
    /// # Errors
    ///
    /// Only when the configured policy for `action` is invalid.
    pub fn submit_text(&mut self, action: &str, subject: &str, input: &str) -> CoreResult<Outcome> {
        // Blank input never reaches the guard or the security log.
        if input.trim().is_empty() {
            let toast = self.notifications.show_info(
                ValidationError::Empty.to_string(),
                ToastOptions::new().with_title("Nothing to send"),
            );
            return Ok(Outcome::Rejected {
                toast,
                error: ValidationError::Empty,
            });
        }

        if let Some(outcome) = self.rate_limit(action, subject)? {
            return Ok(outcome);
        }

        let max_length = self.config.validation.max_text_length;
        if let Err(error) = self.monitor.inspect_text(&self.validator, input, max_length) {
            let toast = self.notifications.show_error(
                error.to_string(),
                ToastOptions::new().with_title("Invalid input"),
            );
            return Ok(Outcome::Rejected { toast, error });
        }

        let toast = self
            .notifications
            .show_success("Sent", ToastOptions::new());
        Ok(Outcome::Accepted {
            toast,
            sanitized: sanitize_text(input),
        })
    }

    /// Runs an upload through the guardrails.
    pub fn submit_file(&mut self, action: &str, subject: &str, file: &FileDescriptor) -> CoreResult<Outcome> {
        if let Some(outcome) = self.rate_limit(action, subject)? {
            return Ok(outcome);
        }

        if let Err(error) = self.validator.validate_file(file) {
            let severity = if error.is_injection() {
                Severity::High
            } else {
                Severity::Low
            };
            self.monitor.log_security_event(
                SecurityEventSpec::new(kinds::FILE_REJECTED, error.to_string())
                    .with_severity(severity)
                    .with_detail("name", file.name.as_str())
                    .with_detail("size", file.size)
                    .with_detail("type", file.mime_type.as_str()),
            );
            let toast = self.notifications.show_error(
                error.to_string(),
                ToastOptions::new().with_title("Upload rejected"),
            );
            return Ok(Outcome::Rejected { toast, error });
        }

        let toast = self
            .notifications
            .show_success(format!("{} uploaded", file.name), ToastOptions::new());
        Ok(Outcome::Accepted {
            toast,
            sanitized: sanitize_text(&file.name),
        })
    }

    /// Expires due toasts.
    pub fn tick(&mut self) -> Vec<Toast> {
        self.notifications.tick()
    }

    /// Drops rate-limit keys idle for longer than the widest configured window.
    pub fn cleanup(&mut self) -> CoreResult<usize> {
        self.guard.cleanup(self.config.rate_limit.longest_window())
    }

    fn rate_limit(&mut self, action: &str, subject: &str) -> CoreResult<Option<Outcome>> {
        let key = format!("{action}:{subject}");
        let policy = *self.config.rate_limit.policy_for(action);
        let RateDecision::Denied { reset_at } = self.guard.check_policy(&key, &policy)? else {
            return Ok(None);
        };

        let now = self.clock.now_ms();
        let wait = Duration::from_millis(reset_at.saturating_sub(now));
        self.monitor.log_security_event(
            SecurityEventSpec::new(kinds::RATE_LIMIT_EXCEEDED, format!("rate limit hit for {action}"))
                .with_severity(Severity::Low)
                .with_detail("key", key)
                .with_detail("reset_at", reset_at),
        );
        let toast = self.notifications.show_warning(
            format!("Too many attempts. Try again in {}.", describe_wait(wait)),
            ToastOptions::new().with_title("Slow down"),
        );
        Ok(Some(Outcome::RateLimited { toast, reset_at }))
    }
}

/// Whole seconds (rounded up) or minutes for a human-readable ETA.
fn describe_wait(wait: Duration) -> String {
    let secs = wait.as_millis().div_ceil(1_000).max(1);
    match secs {
        1 => "1 second".to_string(),
        s if s < 120 => format!("{s} seconds"),
        s => format!("{} minutes", s.div_ceil(60)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::ToastKind;

    fn context() -> (ManualClock, AppContext) {
        let clock = ManualClock::new(1_000_000);
        let ctx = AppContext::new(Config::default(), clock.shared());
        (clock, ctx)
    }

    #[test]
    fn valid_text_is_accepted_and_sanitized() {
        let (_clock, mut ctx) = context();

        let outcome = ctx.submit_text("chat-message", "user-1", "  a/b  ").unwrap();

        match outcome {
            Outcome::Accepted { toast, sanitized } => {
                assert_eq!(sanitized, "a&#x2F;b");
                assert_eq!(ctx.notifications.get(toast).unwrap().kind, ToastKind::Success);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(ctx.monitor.is_empty());
    }

    #[test]
    fn script_input_is_rejected_and_logged() {
        let (_clock, mut ctx) = context();

        let outcome = ctx
            .submit_text("chat-message", "user-1", "<script>alert(1)</script>")
            .unwrap();

        assert!(matches!(outcome, Outcome::Rejected { .. }));
        let toast = ctx.notifications.get(outcome.toast()).unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.title.as_deref(), Some("Invalid input"));

        let report = ctx.monitor.security_report();
        assert_eq!(report.events_by_type[kinds::XSS_ATTEMPT], 1);
    }

    #[test]
    fn blank_input_spends_no_budget_and_logs_nothing() {
        let (_clock, mut ctx) = context();

        for _ in 0..25 {
            let outcome = ctx.submit_text("chat-message", "u", "   ").unwrap();
            assert!(matches!(
                outcome,
                Outcome::Rejected {
                    error: ValidationError::Empty,
                    ..
                }
            ));
        }

        assert!(ctx.submit_text("chat-message", "u", "hello").unwrap().is_accepted());
        assert_eq!(ctx.guard.attempts("chat-message:u").len(), 1);
        assert!(ctx.monitor.is_empty());
    }

    #[test]
    fn rate_limit_blocks_before_validation() {
        let (_clock, mut ctx) = context();

        for _ in 0..3 {
            let outcome = ctx
                .submit_file("resume-upload", "user-1", &FileDescriptor::new("cv.pdf", 10, "application/pdf"))
                .unwrap();
            assert!(outcome.is_accepted());
        }

        let outcome = ctx
            .submit_file("resume-upload", "user-1", &FileDescriptor::new("../x", 10, "bad/type"))
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::RateLimited {
                toast: outcome.toast(),
                reset_at: 1_060_000
            }
        );
        let toast = ctx.notifications.get(outcome.toast()).unwrap();
        assert_eq!(toast.kind, ToastKind::Warning);
        assert!(toast.message.contains("60 seconds"));

        let report = ctx.monitor.security_report();
        assert_eq!(report.events_by_type[kinds::RATE_LIMIT_EXCEEDED], 1);
        assert!(!report.events_by_type.contains_key(kinds::FILE_REJECTED));
    }

    #[test]
    fn rate_limit_is_per_subject() {
        let (_clock, mut ctx) = context();
        let file = FileDescriptor::new("cv.pdf", 10, "application/pdf");

        for _ in 0..3 {
            ctx.submit_file("resume-upload", "user-1", &file).unwrap();
        }

        assert!(ctx.submit_file("resume-upload", "user-2", &file).unwrap().is_accepted());
    }

    #[test]
    fn bad_file_is_rejected_with_severity_by_cause() {
        let (_clock, mut ctx) = context();

        ctx.submit_file("resume-upload", "u", &FileDescriptor::new("cv.exe", 10, "application/x-msdownload"))
            .unwrap();
        ctx.submit_file("resume-upload", "u", &FileDescriptor::new("../cv.pdf", 10, "application/pdf"))
            .unwrap();

        let severities: Vec<_> = ctx.monitor.events().map(|e| e.severity).collect();
        assert_eq!(severities, vec![Severity::Low, Severity::High]);
    }

    #[test]
    fn tick_expires_outcome_toasts() {
        let (clock, mut ctx) = context();
        ctx.submit_text("chat-message", "u", "hello").unwrap();

        clock.advance(Duration::from_secs(5));
        assert_eq!(ctx.tick().len(), 1);
        assert!(ctx.notifications.is_empty());
    }

    #[test]
    fn cleanup_uses_widest_window() {
        let (clock, mut ctx) = context();
        ctx.submit_text("chat-message", "u", "hello").unwrap();
        clock.advance(Duration::from_secs(200));
        ctx.submit_text("contact-form", "u", "hello").unwrap();

        // Chat attempt is 350s old, contact form attempt 150s; widest window is 300s.
        clock.advance(Duration::from_secs(150));
        assert_eq!(ctx.cleanup().unwrap(), 1);
        assert_eq!(ctx.guard.tracked_keys(), 1);
        assert_eq!(ctx.guard.attempts("contact-form:u").len(), 1);
    }

    #[test]
    fn audit_origin_accepts_default_localhost() {
        let (_clock, mut ctx) = context();
        assert!(ctx.audit_origin());
        assert!(ctx.monitor.is_empty());
    }

    #[test]
    fn describe_wait_formats() {
        assert_eq!(describe_wait(Duration::from_millis(10)), "1 second");
        assert_eq!(describe_wait(Duration::from_millis(1_500)), "2 seconds");
        assert_eq!(describe_wait(Duration::from_secs(60)), "60 seconds");
        assert_eq!(describe_wait(Duration::from_secs(300)), "5 minutes");
    }
}
