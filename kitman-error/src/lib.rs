use std::io;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;
pub type KitmanResult<T> = Result<T, KitmanError>;

/// Failures raised while talking to the privileged backend.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend rejected `{command}`: {message}")]
    Rejected { command: String, message: String },

    #[error("Malformed response for `{command}`: {source}")]
    Malformed {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl GatewayError {
    pub fn rejected(command: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            command: command.into(),
            message: message.into(),
        }
    }

    /// The message a user should see, if the backend supplied a usable one.
    pub fn user_message(&self) -> Option<String> {
        let msg = match self {
            GatewayError::Rejected { message, .. } => message.trim().to_string(),
            GatewayError::Other(message) => message.trim().to_string(),
            other => other.to_string(),
        };
        if msg.is_empty() {
            None
        } else {
            Some(msg)
        }
    }
}

/// A decoded value did not have the shape its consumer expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Shape mismatch: expected {expected} ({reason})")]
pub struct ShapeError {
    pub expected: &'static str,
    pub reason: String,
}

impl ShapeError {
    pub fn new(expected: &'static str, reason: impl Into<String>) -> Self {
        Self {
            expected,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum KitmanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No kit selected")]
    NoKitSelected,

    #[error("Install directory is not set")]
    MissingInstallDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_user_facing() {
        let err = GatewayError::rejected("get_install_dir", "permission denied");
        assert_eq!(err.user_message().as_deref(), Some("permission denied"));
    }

    #[test]
    fn blank_rejection_has_no_user_message() {
        let err = GatewayError::rejected("get_installed_kit", "   ");
        assert!(err.user_message().is_none());
    }

    #[test]
    fn other_message_is_trimmed() {
        let err = GatewayError::Other("  backend state poisoned \n".into());
        assert_eq!(err.user_message().as_deref(), Some("backend state poisoned"));
    }

    #[test]
    fn io_failure_uses_display_text() {
        let err = GatewayError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.user_message().as_deref(), Some("I/O error: gone"));
    }
}
