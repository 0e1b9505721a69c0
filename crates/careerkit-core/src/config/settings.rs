//! Guardrail configuration loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the same limits as the shipped `config/careerkit.toml`.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::guard::{CountingPolicy, RateLimitPolicy};
use crate::notify::{Position, ToastKind};

/// Top-level configuration.
///
/// Call [`Config::load`] to read from a TOML path, or use
/// [`Config::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    /// - [`CoreError::InvalidLimit`] if a rate-limit policy has a zero
    ///   window or a zero budget.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        config.rate_limit.validate()?;
        Ok(config)
    }
}

/// Rate limiting for user actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub counting: CountingPolicy,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    /// Applied to actions without an entry in `policies`.
    #[serde(default = "default_policy")]
    pub default_policy: RateLimitPolicy,
    /// Per-action limits, keyed by action name (e.g. `"resume-upload"`).
    #[serde(default = "default_policies")]
    pub policies: BTreeMap<String, RateLimitPolicy>,
}

impl RateLimitConfig {
    /// The policy for `action`, falling back to `default_policy`.
    pub fn policy_for(&self, action: &str) -> &RateLimitPolicy {
        self.policies.get(action).unwrap_or(&self.default_policy)
    }

    /// The widest window among all policies.
    ///
    /// Cleanup with this window never drops a timestamp some policy still counts.
    pub fn longest_window(&self) -> Duration {
        self.policies
            .values()
            .chain(std::iter::once(&self.default_policy))
            .map(RateLimitPolicy::window)
            .max()
            .unwrap_or_else(|| self.default_policy.window())
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// Checks that every policy, including `default_policy`, can be enforced.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidLimit`] naming the first offending policy.
    pub fn validate(&self) -> CoreResult<()> {
        let named = self
            .policies
            .iter()
            .map(|(name, policy)| (name.as_str(), policy))
            .chain(std::iter::once(("default_policy", &self.default_policy)));

        for (name, policy) in named {
            if policy.window_ms == 0 {
                return Err(CoreError::InvalidLimit(format!(
                    "policy {name}: window_ms must be positive"
                )));
            }
            if policy.max_requests == 0 {
                return Err(CoreError::InvalidLimit(format!(
                    "policy {name}: max_requests must be positive"
                )));
            }
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            counting: CountingPolicy::default(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
            default_policy: default_policy(),
            policies: default_policies(),
        }
    }
}

/// Input and upload validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_allowed_file_types")]
    pub allowed_file_types: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            max_file_size: default_max_file_size(),
            allowed_file_types: default_allowed_file_types(),
        }
    }
}

/// Security event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "default_recent_events")]
    pub recent_events: usize,
    /// URL the frontend is served from; audited for plain HTTP.
    #[serde(default = "default_origin_url")]
    pub origin_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            recent_events: default_recent_events(),
            origin_url: default_origin_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Toast durations and placement.
///
/// A duration of `0` makes toasts of that kind persistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_success_ms")]
    pub success_ms: u64,
    #[serde(default = "default_error_ms")]
    pub error_ms: u64,
    #[serde(default = "default_warning_ms")]
    pub warning_ms: u64,
    #[serde(default = "default_info_ms")]
    pub info_ms: u64,
    #[serde(default)]
    pub default_position: Position,
    #[serde(default = "default_max_pending_timers")]
    pub max_pending_timers: usize,
}

impl NotificationConfig {
    /// Default lifetime for toasts of `kind`.
    pub fn duration_for(&self, kind: ToastKind) -> Duration {
        let ms = match kind {
            ToastKind::Success => self.success_ms,
            ToastKind::Error => self.error_ms,
            ToastKind::Warning => self.warning_ms,
            ToastKind::Info => self.info_ms,
        };
        Duration::from_millis(ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            success_ms: default_success_ms(),
            error_ms: default_error_ms(),
            warning_ms: default_warning_ms(),
            info_ms: default_info_ms(),
            default_position: Position::default(),
            max_pending_timers: default_max_pending_timers(),
        }
    }
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_policy() -> RateLimitPolicy {
    RateLimitPolicy::new(Duration::from_secs(60), 10)
}

fn default_policies() -> BTreeMap<String, RateLimitPolicy> {
    [
        ("chat-message", RateLimitPolicy::new(Duration::from_secs(60), 20)),
        ("contact-form", RateLimitPolicy::new(Duration::from_secs(300), 3)),
        ("interview-prep", RateLimitPolicy::new(Duration::from_secs(60), 10)),
        ("resume-upload", RateLimitPolicy::new(Duration::from_secs(60), 3)),
        ("role-suggestion", RateLimitPolicy::new(Duration::from_secs(60), 5)),
    ]
    .into_iter()
    .map(|(name, policy)| (name.to_string(), policy))
    .collect()
}

fn default_max_text_length() -> usize {
    1000
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_file_types() -> Vec<String> {
    [
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "text/plain",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_log_capacity() -> usize {
    100
}

fn default_recent_events() -> usize {
    10
}

fn default_origin_url() -> String {
    "http://localhost/".to_string()
}

fn default_user_agent() -> String {
    concat!("careerkit/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_success_ms() -> u64 {
    4_000
}

fn default_error_ms() -> u64 {
    6_000
}

fn default_warning_ms() -> u64 {
    5_000
}

fn default_info_ms() -> u64 {
    4_000
}

fn default_max_pending_timers() -> usize {
    256
}
