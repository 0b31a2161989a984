use phpstack_platform::AppPaths;
use phpstack_shell::{
    DEFAULT_MARKER, DEFAULT_SHEBANG, DEFAULT_SYSTEM_FRAGMENT, LOCAL_BIN_DETECT_PATTERN,
    LOCAL_BIN_PATH, PHP_BIN_PATH, PHP_DETECT_PATTERN, PathExport, PathExportPlan,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid detection pattern '{pattern}' for {value}: {details}")]
    InvalidPattern {
        value: String,
        pattern: String,
        details: String,
    },

    #[error("at least one PATH export must be configured")]
    NoPathExports,
}

/// Run configuration, read once at startup and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default = "default_path_exports")]
    pub path_exports: Vec<PathExportSetting>,

    #[serde(default = "default_system_fragment")]
    pub system_fragment_path: PathBuf,

    #[serde(default = "default_shebang")]
    pub fragment_shebang: String,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_true")]
    pub source_in_session: bool,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathExportSetting {
    /// Directory appended to `PATH`.
    pub value: String,
    /// Regular expression that, matched against a single line, means the
    /// export is already there.
    pub detect: String,
}

fn default_app_name() -> String {
    "phpstack".to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_path_exports() -> Vec<PathExportSetting> {
    vec![
        PathExportSetting {
            value: PHP_BIN_PATH.to_string(),
            detect: PHP_DETECT_PATTERN.to_string(),
        },
        PathExportSetting {
            value: LOCAL_BIN_PATH.to_string(),
            detect: LOCAL_BIN_DETECT_PATTERN.to_string(),
        },
    ]
}

fn default_system_fragment() -> PathBuf {
    PathBuf::from(DEFAULT_SYSTEM_FRAGMENT)
}

fn default_shebang() -> String {
    DEFAULT_SHEBANG.to_string()
}

fn default_true() -> bool {
    true
}

fn default_command_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            marker: default_marker(),
            path_exports: default_path_exports(),
            system_fragment_path: default_system_fragment(),
            fragment_shebang: default_shebang(),
            log_file: None,
            debug_logging: false,
            source_in_session: true,
            command_timeout_secs: default_command_timeout(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn log_path(&self, paths: &AppPaths) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| paths.log_file())
    }

    /// Compile the configured exports into the plan the configurator runs.
    pub fn path_plan(&self) -> Result<PathExportPlan, SettingsError> {
        if self.path_exports.is_empty() {
            return Err(SettingsError::NoPathExports);
        }

        let exports = self
            .path_exports
            .iter()
            .map(|setting| {
                PathExport::new(setting.value.clone(), &setting.detect).map_err(|e| {
                    SettingsError::InvalidPattern {
                        value: setting.value.clone(),
                        pattern: setting.detect.clone(),
                        details: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PathExportPlan {
            marker: self.marker.clone(),
            exports,
            system_fragment: self.system_fragment_path.clone(),
            shebang: self.fragment_shebang.clone(),
        })
    }
}
