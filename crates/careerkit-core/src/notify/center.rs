//! The notification center: ordered toasts with one-shot expiry.

use std::time::Duration;

use crate::clock::{Millis, SharedClock};
use crate::config::NotificationConfig;
use crate::timer::TimerQueue;

use super::toast::{ErrorData, Position, Toast, ToastId, ToastKind, ToastOptions, ToastSpec};

/// Holds the active toasts in insertion order and expires them on
/// [`tick`](Self::tick).
///
/// Expiry is measured from insertion and is never extended. Removing a
/// toast by any path cancels its pending expiry, so a late tick can never
/// hit a stale id.
pub struct NotificationCenter {
    clock: SharedClock,
    config: NotificationConfig,
    toasts: Vec<Toast>,
    timers: TimerQueue<ToastId>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new(clock: SharedClock, config: NotificationConfig) -> Self {
        let timers = TimerQueue::with_capacity(config.max_pending_timers);
        Self {
            clock,
            config,
            toasts: Vec::new(),
            timers,
            next_id: 1,
        }
    }

    /// Shows a toast and returns its id.
    ///
    /// If the expiry cannot be scheduled the toast is kept as persistent
    /// rather than dropped.
    pub fn add_notification(&mut self, spec: ToastSpec) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        let now = self.clock.now_ms();
        let (kind, message) = spec.resolved();
        let ToastOptions {
            title,
            actions,
            duration,
            position,
        } = spec.options;
        let mut duration = duration.unwrap_or_else(|| self.config.duration_for(kind));

        if !duration.is_zero() {
            if let Err(e) = self.timers.schedule_after(id, now, duration) {
                tracing::warn!(%id, "toast expiry not scheduled, keeping it open: {e}");
                duration = Duration::ZERO;
            }
        }

        tracing::debug!(%id, %kind, ?duration, "toast shown");
        self.toasts.push(Toast {
            id,
            kind,
            title,
            message,
            actions,
            duration,
            position: position.unwrap_or(self.config.default_position),
            created_at: now,
        });
        id
    }

    /// Removes the toast with `id` and cancels its expiry.
    ///
    /// Returns `None` without complaint if it is already gone.
    pub fn remove_notification(&mut self, id: ToastId) -> Option<Toast> {
        self.timers.cancel(&id);
        let index = self.toasts.iter().position(|t| t.id == id)?;
        Some(self.toasts.remove(index))
    }

    /// Removes every toast and cancels all expiries. Returns how many were removed.
    pub fn remove_all_notifications(&mut self) -> usize {
        self.timers.clear();
        let removed = self.toasts.len();
        self.toasts.clear();
        removed
    }

    /// Expires every toast whose deadline has passed, earliest first.
    pub fn tick(&mut self) -> Vec<Toast> {
        let now = self.clock.now_ms();
        let due = self.timers.pop_due(now);
        let expired: Vec<Toast> = due
            .into_iter()
            .filter_map(|id| self.remove_notification(id))
            .collect();
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "toasts expired");
        }
        expired
    }

    pub fn show_success(&mut self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Success, message, options)
    }

    pub fn show_error(&mut self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Error, message, options)
    }

    /// Shows an error toast whose message comes from `err`.
    pub fn show_error_from(
        &mut self,
        err: &(dyn std::error::Error + '_),
        options: ToastOptions,
    ) -> ToastId {
        let spec = ToastSpec::new(ToastKind::Error, "")
            .with_options(options)
            .with_error_data(ErrorData::from_error(err));
        self.add_notification(spec)
    }

    pub fn show_warning(&mut self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Warning, message, options)
    }

    pub fn show_info(&mut self, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.show(ToastKind::Info, message, options)
    }

    fn show(&mut self, kind: ToastKind, message: impl Into<String>, options: ToastOptions) -> ToastId {
        self.add_notification(ToastSpec::new(kind, message).with_options(options))
    }

    /// Runs the handler of action `index` on toast `id`.
    ///
    /// Returns `false` if either does not exist. The toast stays open.
    pub fn activate_action(&self, id: ToastId, index: usize) -> bool {
        let Some(action) = self.get(id).and_then(|t| t.actions.get(index)) else {
            return false;
        };
        action.handler.call(id);
        true
    }

    /// Active toasts in insertion order.
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    /// Active toasts anchored at `position`, in insertion order.
    pub fn at_position(&self, position: Position) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |t| t.position == position)
    }

    /// When the next toast expires, if any is pending.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Number of scheduled expiries.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
