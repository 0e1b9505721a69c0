//! Input validation and security event logging.

pub mod event;
pub mod monitor;
pub mod validator;

pub use event::{kinds, EventContext, SecurityEvent, SecurityEventSpec, Severity};
pub use monitor::{SecurityMonitor, SecurityReport};
pub use validator::{
    matching_pattern, sanitize_text, FileDescriptor, InputValidator, ValidationError,
    ValidationResult,
};
