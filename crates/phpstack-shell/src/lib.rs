#![allow(clippy::missing_errors_doc)]

mod config;
mod detect;
mod export;
mod exporter;
mod targets;
mod verify;
mod warnings;

pub use config::{ConfigError, ShellConfig, ShellConfigEdit};
pub use detect::ShellType;
pub use export::{
    DEFAULT_MARKER, DEFAULT_SHEBANG, DEFAULT_SYSTEM_FRAGMENT, LOCAL_BIN_DETECT_PATTERN,
    LOCAL_BIN_PATH, PHP_BIN_PATH, PHP_DETECT_PATTERN, PathExport, PathExportPlan,
};
pub use exporter::{
    ConfigureReport, TargetOutcome, configure_universal_shell_path, configure_user_target,
    write_system_fragment,
};
pub use targets::{ConfigTarget, TargetScope, enumerate_targets};
pub use verify::{VerificationResult, source_into_session, verify_target, verify_targets};
pub use warnings::{Applied, ConfigWarning};
