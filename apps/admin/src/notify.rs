//! # Notices
//!
//! Short messages for the operator. They go to stderr so that command
//! output on stdout can be piped, and they are mirrored to tracing at
//! debug level.
//!
//! ```text
//! ok: Sale 12 saved (total R$ 1,250.00)
//! warning: items[0].quantity: Quantity must be greater than zero
//! error: 1 field needs attention
//! ```

use std::fmt;

use optica_core::FieldErrors;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Success => "ok",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// One warning per failing field, in path order.
    pub fn for_fields(errors: &FieldErrors) -> Vec<Notice> {
        errors
            .iter()
            .map(|(path, err)| Notice::warning(format!("{path}: {err}")))
            .collect()
    }

    /// Prints the notice to stderr.
    pub fn emit(&self) {
        debug!(level = self.level.label(), message = %self.message, "notice");
        eprintln!("{self}");
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level.label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optica_core::ValidationError;

    #[test]
    fn test_display() {
        assert_eq!(Notice::success("Logged in").to_string(), "ok: Logged in");
        assert_eq!(Notice::error("boom").to_string(), "error: boom");
    }

    #[test]
    fn test_for_fields() {
        let mut errors = FieldErrors::new();
        errors.insert("rightEye.axis", ValidationError::Required { field: "Axis".into() });
        let notices = Notice::for_fields(&errors);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, Level::Warning);
        assert!(notices[0].to_string().starts_with("warning: rightEye.axis: "));
    }
}
