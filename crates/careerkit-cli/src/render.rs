//! Plain-text rendering of toasts and outcomes.

use careerkit_core::{Outcome, Toast, ToastKind};

fn marker(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "+",
        ToastKind::Error => "x",
        ToastKind::Warning => "!",
        ToastKind::Info => "i",
    }
}

/// One line for a toast, e.g. `[+] #3 Saved (4s)`.
pub fn toast_line(toast: &Toast) -> String {
    let lifetime = if toast.is_persistent() {
        "until dismissed".to_string()
    } else {
        format!("{}s", toast.duration.as_secs_f32())
    };
    match &toast.title {
        Some(title) => format!(
            "[{}] #{} {}: {} ({lifetime})",
            marker(toast.kind),
            toast.id,
            title,
            toast.message
        ),
        None => format!(
            "[{}] #{} {} ({lifetime})",
            marker(toast.kind),
            toast.id,
            toast.message
        ),
    }
}

pub fn expired_line(toast: &Toast) -> String {
    format!("    #{} expired", toast.id)
}

/// Describes the outcome of a submission, echoing accepted input.
pub fn outcome_line(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Accepted { sanitized, .. } => Some(format!("> {sanitized}")),
        Outcome::RateLimited { .. } | Outcome::Rejected { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerkit_core::{ManualClock, NotificationCenter, ToastOptions, ToastId};
    use careerkit_core::config::NotificationConfig;
    use std::time::Duration;

    fn center() -> NotificationCenter {
        NotificationCenter::new(ManualClock::new(0).shared(), NotificationConfig::default())
    }

    #[test]
    fn toast_line_with_title() {
        let mut center = center();
        let id = center.show_warning("Try later", ToastOptions::new().with_title("Slow down"));

        let line = toast_line(center.get(id).unwrap());
        assert_eq!(line, format!("[!] #{id} Slow down: Try later (5s)"));
    }

    #[test]
    fn toast_line_persistent() {
        let mut center = center();
        let id = center.show_info("Pinned", ToastOptions::new().persistent());

        let line = toast_line(center.get(id).unwrap());
        assert!(line.ends_with("(until dismissed)"));
    }

    #[test]
    fn fractional_duration() {
        let mut center = center();
        let id = center.show_success("ok", ToastOptions::new().with_duration(Duration::from_millis(1500)));
        assert!(toast_line(center.get(id).unwrap()).ends_with("(1.5s)"));
    }

    #[test]
    fn outcome_line_echoes_sanitized_text() {
        let outcome = Outcome::Accepted {
            toast: ToastId(1),
            sanitized: "a&lt;b".to_string(),
        };
        assert_eq!(outcome_line(&outcome), Some("> a&lt;b".to_string()));

        let limited = Outcome::RateLimited {
            toast: ToastId(2),
            reset_at: 0,
        };
        assert_eq!(outcome_line(&limited), None);
    }
}
