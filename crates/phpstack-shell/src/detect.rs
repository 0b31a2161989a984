use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Other,
}

impl ShellType {
    /// Identify the shell family from a `SHELL`-style value such as
    /// `/usr/bin/zsh`.
    #[must_use]
    pub fn from_shell_var(shell: Option<&str>) -> Self {
        let Some(shell) = shell else {
            return Self::Other;
        };

        match Path::new(shell.trim()).file_name().and_then(|n| n.to_str()) {
            Some("bash") => Self::Bash,
            Some("zsh") => Self::Zsh,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Other => "sh",
        }
    }

    /// The startup file that applies the changes for this shell family.
    #[must_use]
    pub fn primary_config(&self, home: &Path) -> PathBuf {
        match self {
            Self::Bash => home.join(".bashrc"),
            Self::Zsh => home.join(".zshrc"),
            Self::Other => home.join(".profile"),
        }
    }

    /// Command an operator can run to pick up the new `PATH` right away.
    #[must_use]
    pub fn apply_hint(&self, home: &Path) -> String {
        let config = self.primary_config(home);
        match self {
            Self::Bash | Self::Zsh => format!("source {}", config.display()),
            Self::Other => format!(". {}", config.display()),
        }
    }
}
