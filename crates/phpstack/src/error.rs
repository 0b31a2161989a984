use phpstack_platform::ResolutionError;
use phpstack_shell::ConfigError;
use std::error::Error as _;
use std::path::PathBuf;

use crate::settings::SettingsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Io { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

impl From<String> for AppErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<&std::io::Error> for AppErrorDetail {
    fn from(error: &std::io::Error) -> Self {
        Self::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<ResolutionError> for AppErrorDetail {
    fn from(value: ResolutionError) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<SettingsError> for AppErrorDetail {
    fn from(value: SettingsError) -> Self {
        Self::Message(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    NotElevated {
        euid: u32,
    },
    InvalidSettings {
        details: AppErrorDetail,
    },
    UserResolutionFailed {
        details: AppErrorDetail,
    },
    ShellConfigFailed {
        path: PathBuf,
        action: &'static str,
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn not_elevated(euid: u32) -> Self {
        Self::NotElevated { euid }
    }

    pub fn invalid_settings(details: impl Into<AppErrorDetail>) -> Self {
        Self::InvalidSettings {
            details: details.into(),
        }
    }

    pub fn user_resolution_failed(details: impl Into<AppErrorDetail>) -> Self {
        Self::UserResolutionFailed {
            details: details.into(),
        }
    }

    pub fn shell_config_failed(
        path: impl Into<PathBuf>,
        action: &'static str,
        details: impl Into<AppErrorDetail>,
    ) -> Self {
        Self::ShellConfigFailed {
            path: path.into(),
            action,
            details: details.into(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let action = match &error {
            ConfigError::Read { .. } => "read",
            ConfigError::Write { .. } => "write",
            ConfigError::Permissions { .. } => "chmod",
        };
        let details = match error.source().and_then(|s| s.downcast_ref::<std::io::Error>()) {
            Some(io) => AppErrorDetail::from(io),
            None => AppErrorDetail::from(error.to_string()),
        };
        Self::shell_config_failed(error.path(), action, details)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotElevated { euid } => write!(
                f,
                "phpstack must be run as root (running as uid {euid}); try again with sudo"
            ),
            Self::InvalidSettings { details } => write!(f, "Invalid settings: {details}"),
            Self::UserResolutionFailed { details } => {
                write!(f, "Could not determine the user to configure: {details}")
            }
            Self::ShellConfigFailed {
                path,
                action,
                details,
            } => write!(f, "Shell config {action} failed for {}: {details}", path.display()),
        }
    }
}

impl std::error::Error for AppError {}
