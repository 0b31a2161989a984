use std::fmt;
use std::path::{Path, PathBuf};

const USER_STARTUP_FILES: [&str; 3] = [".bashrc", ".zshrc", ".profile"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScope {
    /// A startup file in the actual user's home, merged into.
    User,
    /// A profile fragment owned entirely by phpstack, regenerated each run.
    System,
}

impl fmt::Display for TargetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::System => write!(f, "system"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTarget {
    pub path: PathBuf,
    pub scope: TargetScope,
}

impl ConfigTarget {
    #[must_use]
    pub fn user(path: PathBuf) -> Self {
        Self {
            path,
            scope: TargetScope::User,
        }
    }

    #[must_use]
    pub fn system(path: PathBuf) -> Self {
        Self {
            path,
            scope: TargetScope::System,
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// The fixed list of targets for `home`, in display order: `.bashrc`,
/// `.zshrc`, `.profile`, then the system fragment.
#[must_use]
pub fn enumerate_targets(home: &Path, system_fragment: &Path) -> Vec<ConfigTarget> {
    USER_STARTUP_FILES
        .iter()
        .map(|name| ConfigTarget::user(home.join(name)))
        .chain(std::iter::once(ConfigTarget::system(
            system_fragment.to_path_buf(),
        )))
        .collect()
}
