//! careerkit core library: client-side guardrails for the careerkit frontend.
//!
//! `careerkit-core` holds the few pieces of the product with real invariants
//! and timing rules. It knows nothing about pages or rendering; a frontend
//! calls in to check an attempt, validate input, show a toast, or read the
//! security report.
//!
//! # Modules
//!
//! - [`guard`] — Sliding-window rate limiting: [`RateLimitGuard`].
//! - [`security`] — Heuristic input/upload validation ([`InputValidator`]) and the bounded event log ([`SecurityMonitor`]).
//! - [`notify`] — Timed toast notifications: [`NotificationCenter`].
//! - [`context`] — [`AppContext`], which runs a user action through all of the above.
//! - [`clock`] / [`timer`] — Injectable time source and keyed one-shot deadlines.
//! - [`config`] — TOML-based settings.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod notify;
pub mod security;
pub mod timer;

pub use clock::{Clock, ManualClock, Millis, SharedClock, SystemClock};
pub use config::Config;
pub use context::{AppContext, Outcome};
pub use error::{CoreError, CoreResult};
pub use guard::{CountingPolicy, RateDecision, RateLimitGuard, RateLimitPolicy};
pub use notify::{
    NotificationCenter, Position, Toast, ToastAction, ToastId, ToastKind, ToastOptions, ToastSpec,
};
pub use security::{
    sanitize_text, EventContext, FileDescriptor, InputValidator, SecurityEvent, SecurityEventSpec,
    SecurityMonitor, SecurityReport, Severity, ValidationError, ValidationResult,
};
pub use timer::{TimerError, TimerQueue};
