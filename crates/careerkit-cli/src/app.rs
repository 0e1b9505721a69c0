//! Applies parsed commands to the session's [`AppContext`].

use careerkit_core::AppContext;

use crate::input::{Command, HELP};
use crate::render::{outcome_line, toast_line};

/// Action names the CLI submits under; each maps to a rate-limit policy.
pub const CHAT_ACTION: &str = "chat-message";
pub const UPLOAD_ACTION: &str = "resume-upload";

/// Whether the main loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs `command` for `subject` and returns the lines to print.
pub fn dispatch(ctx: &mut AppContext, subject: &str, command: Command) -> anyhow::Result<(Flow, Vec<String>)> {
    let mut out = Vec::new();
    match command {
        Command::Empty => {}
        Command::Chat(text) => {
            let outcome = ctx.submit_text(CHAT_ACTION, subject, &text)?;
            out.extend(outcome_line(&outcome));
            if let Some(toast) = ctx.notifications.get(outcome.toast()) {
                out.push(toast_line(toast));
            }
        }
        Command::Upload(file) => {
            let outcome = ctx.submit_file(UPLOAD_ACTION, subject, &file)?;
            if let Some(toast) = ctx.notifications.get(outcome.toast()) {
                out.push(toast_line(toast));
            }
        }
        Command::Report => {
            let report = ctx.monitor.security_report();
            out.push(serde_json::to_string_pretty(&report)?);
        }
        Command::Toasts => {
            if ctx.notifications.is_empty() {
                out.push("no active toasts".to_string());
            }
            out.extend(ctx.notifications.active().iter().map(toast_line));
        }
        Command::Dismiss(id) => match ctx.notifications.remove_notification(id) {
            Some(toast) => out.push(format!("dismissed #{}", toast.id)),
            None => out.push(format!("no toast #{id}")),
        },
        Command::Clear => {
            let removed = ctx.notifications.remove_all_notifications();
            out.push(format!("dismissed {removed} toast(s)"));
        }
        Command::Help => out.push(HELP.to_string()),
        Command::Quit => return Ok((Flow::Quit, out)),
    }
    Ok((Flow::Continue, out))
}
