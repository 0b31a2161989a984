use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "phpstack";

pub struct AppPaths {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    /// System-wide locations used when provisioning as root.
    #[must_use]
    pub fn system() -> Self {
        Self::rooted(Path::new("/"))
    }

    /// Same layout as [`AppPaths::system`], relocated under `root`.
    #[must_use]
    pub fn rooted(root: &Path) -> Self {
        Self {
            config_dir: root.join("etc").join(APP_DIR_NAME),
            log_dir: root.join("var").join("log").join(APP_DIR_NAME),
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("provision.log")
    }
}
