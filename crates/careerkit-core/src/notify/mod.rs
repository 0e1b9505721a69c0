//! Transient toast notifications.

pub mod center;
pub mod toast;

pub use center::NotificationCenter;
pub use toast::{
    ActionHandler, ActionStyle, ErrorData, Position, Toast, ToastAction, ToastId, ToastKind,
    ToastOptions, ToastSpec,
};
