//! Toast types: kinds, anchors, actions and what the UI submits to show one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::Millis;

/// Identifies an active toast. Never reused within a center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToastId(pub u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    /// Icon name the frontend renders next to the message.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "x-circle",
            Self::Warning => "alert-triangle",
            Self::Info => "info",
        }
    }

    /// Accent colour token.
    pub fn accent(self) -> &'static str {
        match self {
            Self::Success => "green",
            Self::Error => "red",
            Self::Warning => "amber",
            Self::Info => "blue",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(s)
    }
}

/// Screen anchor a toast stacks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActionStyle {
    #[default]
    Primary,
    Secondary,
    Danger,
}

/// Callback run when a toast action is activated.
#[derive(Clone)]
pub struct ActionHandler(Arc<dyn Fn(ToastId) + Send + Sync>);

impl ActionHandler {
    pub fn new(f: impl Fn(ToastId) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, id: ToastId) {
        (self.0)(id)
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler(..)")
    }
}

/// A button rendered inside a toast.
#[derive(Debug, Clone)]
pub struct ToastAction {
    pub label: String,
    pub style: ActionStyle,
    pub handler: ActionHandler,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, handler: impl Fn(ToastId) + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            style: ActionStyle::default(),
            handler: ActionHandler::new(handler),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ActionStyle) -> Self {
        self.style = style;
        self
    }
}

/// An error to report when no explicit message is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorData {
    pub message: String,
    /// Kind the toast takes on; recoverable problems can surface as warnings.
    pub kind: ToastKind,
}

impl ErrorData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ToastKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn from_error(err: &(dyn std::error::Error + '_)) -> Self {
        Self::new(err.to_string())
    }
}

/// Optional fields shared by every `show_*` helper.
#[derive(Debug, Clone, Default)]
pub struct ToastOptions {
    pub title: Option<String>,
    pub actions: Vec<ToastAction>,
    /// `None` takes the kind's default; `Some(Duration::ZERO)` is persistent.
    pub duration: Option<Duration>,
    pub position: Option<Position>,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Keeps the toast until it is dismissed.
    #[must_use]
    pub fn persistent(self) -> Self {
        self.with_duration(Duration::ZERO)
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Everything needed to show a toast.
#[derive(Debug, Clone)]
pub struct ToastSpec {
    pub kind: ToastKind,
    pub message: String,
    pub options: ToastOptions,
    pub error_data: Option<ErrorData>,
}

impl ToastSpec {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            options: ToastOptions::default(),
            error_data: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ToastOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_error_data(mut self, error_data: ErrorData) -> Self {
        self.error_data = Some(error_data);
        self
    }

    /// Kind and message after applying `error_data` to an empty message.
    pub(crate) fn resolved(&self) -> (ToastKind, String) {
        match &self.error_data {
            Some(data) if self.message.trim().is_empty() => (data.kind, data.message.clone()),
            _ => (self.kind, self.message.clone()),
        }
    }
}

/// A toast on screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub message: String,
    pub actions: Vec<ToastAction>,
    /// `Duration::ZERO` means the toast stays until dismissed.
    pub duration: Duration,
    pub position: Position,
    pub created_at: Millis,
}

impl Toast {
    pub fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn kind_styling_metadata() {
        assert_eq!(ToastKind::Success.icon(), "check-circle");
        assert_eq!(ToastKind::Error.accent(), "red");
        assert_eq!(ToastKind::Warning.to_string(), "warning");
    }

    #[test]
    fn position_defaults_to_top_right() {
        assert_eq!(Position::default(), Position::TopRight);
    }

    #[test]
    fn position_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Position::BottomCenter).unwrap(),
            "\"bottom-center\""
        );
    }

    #[test]
    fn action_handler_receives_toast_id() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_handler = Arc::clone(&seen);
        let action = ToastAction::new("Undo", move |id| {
            seen_in_handler.store(id.0, Ordering::SeqCst);
        })
        .with_style(ActionStyle::Secondary);

        action.handler.call(ToastId(7));

        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert_eq!(action.style, ActionStyle::Secondary);
        assert_eq!(format!("{:?}", action.handler), "ActionHandler(..)");
    }

    #[test]
    fn error_data_fills_empty_message() {
        let spec = ToastSpec::new(ToastKind::Error, "")
            .with_error_data(ErrorData::new("network unreachable").with_kind(ToastKind::Warning));

        assert_eq!(
            spec.resolved(),
            (ToastKind::Warning, "network unreachable".to_string())
        );
    }

    #[test]
    fn explicit_message_wins_over_error_data() {
        let spec = ToastSpec::new(ToastKind::Error, "Upload failed")
            .with_error_data(ErrorData::new("io error"));

        assert_eq!(spec.resolved(), (ToastKind::Error, "Upload failed".to_string()));
    }

    #[test]
    fn error_data_from_std_error() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let data = ErrorData::from_error(&io);
        assert_eq!(data.message, "timed out");
        assert_eq!(data.kind, ToastKind::Error);
    }

    #[test]
    fn options_builder() {
        let options = ToastOptions::new()
            .with_title("Saved")
            .with_position(Position::BottomLeft)
            .persistent();

        assert_eq!(options.title.as_deref(), Some("Saved"));
        assert_eq!(options.position, Some(Position::BottomLeft));
        assert_eq!(options.duration, Some(Duration::ZERO));
    }
}
