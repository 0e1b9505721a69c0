//! Configuration: TOML-backed limits for the guard, validator, log and toasts.

pub mod settings;

pub use settings::{
    Config, NotificationConfig, RateLimitConfig, SecurityConfig, ValidationConfig,
};
