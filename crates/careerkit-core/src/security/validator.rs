//! Heuristic input and upload validation.
//!
//! The checks here are a UX hint layer: they catch obvious markup or script
//! injection before it reaches the rest of the page. They are trivially
//! bypassed by anyone not using the frontend, so the server must repeat
//! equivalent validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ValidationConfig;

/// A named deny-list pattern.
struct InjectionPattern {
    name: &'static str,
    regex: Regex,
}

impl InjectionPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("invalid injection pattern"),
        }
    }
}

/// Markup/script injection signals, checked in order.
static INJECTION_PATTERNS: LazyLock<Vec<InjectionPattern>> = LazyLock::new(|| {
    vec![
        InjectionPattern::new("script_tag", r"(?i)<\s*script\b"),
        InjectionPattern::new("javascript_scheme", r"(?i)javascript\s*:"),
        InjectionPattern::new("vbscript_scheme", r"(?i)vbscript\s*:"),
        InjectionPattern::new("html_data_url", r"(?i)data\s*:\s*text/html"),
        InjectionPattern::new("event_handler", r"(?i)\bon[a-z]+\s*="),
        InjectionPattern::new("iframe_tag", r"(?i)<\s*iframe\b"),
        InjectionPattern::new("object_tag", r"(?i)<\s*object\b"),
        InjectionPattern::new("embed_tag", r"(?i)<\s*embed\b"),
    ]
});

/// Path separators, traversal, NUL and shell metacharacters.
static SUSPICIOUS_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[/\\\x00<>:"|?*;&$`]|\.\."#).expect("invalid file name pattern")
});

/// Why input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("input is required")]
    Empty,

    #[error("input is too long ({actual} characters, maximum {max})")]
    TooLong { max: usize, actual: usize },

    /// The input matched a deny-list pattern.
    #[error("input contains potentially unsafe content")]
    SuspiciousContent { pattern: &'static str },

    #[error("file is too large ({size} bytes, maximum {max})")]
    FileTooLarge { max: u64, size: u64 },

    #[error("file type {0:?} is not supported")]
    UnsupportedFileType(String),

    #[error("file name {0:?} is not allowed")]
    SuspiciousFileName(String),
}

impl ValidationError {
    /// Whether the rejection looks like an attack rather than a mistake.
    pub fn is_injection(&self) -> bool {
        matches!(self, Self::SuspiciousContent { .. } | Self::SuspiciousFileName(_))
    }
}

/// Result of a validation check.
pub type ValidationResult = Result<(), ValidationError>;

/// Metadata of a file the user picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// Checks free text and uploads against the configured limits.
#[derive(Debug, Clone)]
pub struct InputValidator {
    max_file_size: u64,
    allowed_file_types: Vec<String>,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

impl InputValidator {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_file_types: config.allowed_file_types.clone(),
        }
    }

    /// Validates free text typed by the user.
    ///
    /// Length is counted in characters, not bytes.
    pub fn validate_text(&self, input: &str, max_length: usize) -> ValidationResult {
        if input.trim().is_empty() {
            return Err(ValidationError::Empty);
        }

        let actual = input.chars().count();
        if actual > max_length {
            return Err(ValidationError::TooLong {
                max: max_length,
                actual,
            });
        }

        match matching_pattern(input) {
            Some(pattern) => Err(ValidationError::SuspiciousContent { pattern }),
            None => Ok(()),
        }
    }

    /// Validates an upload's size, type and name.
    pub fn validate_file(&self, file: &FileDescriptor) -> ValidationResult {
        if file.size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                max: self.max_file_size,
                size: file.size,
            });
        }

        if !self
            .allowed_file_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&file.mime_type))
        {
            return Err(ValidationError::UnsupportedFileType(file.mime_type.clone()));
        }

        if file.name.trim().is_empty() || SUSPICIOUS_FILE_NAME.is_match(&file.name) {
            return Err(ValidationError::SuspiciousFileName(file.name.clone()));
        }

        Ok(())
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

/// Name of the first deny-list pattern `input` matches.
pub fn matching_pattern(input: &str) -> Option<&'static str> {
    INJECTION_PATTERNS
        .iter()
        .find(|p| p.regex.is_match(input))
        .map(|p| p.name)
}

/// Trims `input` and escapes `<`, `>`, `"`, `'` and `/` as HTML entities.
///
/// `&` is left alone, so already-escaped text passes through unchanged.
pub fn sanitize_text(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}
