use std::path::PathBuf;

/// The parts of the process environment that decide whose shell files get
/// written. Captured once at startup and passed around by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationEnv {
    /// Set by `sudo` to the name of the user who invoked it.
    pub sudo_user: Option<String>,
    pub user: Option<String>,
    pub home: Option<PathBuf>,
    pub shell: Option<String>,
}

impl InvocationEnv {
    #[must_use]
    pub fn capture() -> Self {
        Self {
            sudo_user: non_empty_var("SUDO_USER"),
            user: non_empty_var("USER"),
            home: non_empty_var("HOME").map(PathBuf::from),
            shell: non_empty_var("SHELL"),
        }
    }

    /// The invoking user when the process was escalated on someone's behalf.
    /// `root` escalating to `root` counts as no invoking user.
    #[must_use]
    pub fn invoking_user(&self) -> Option<&str> {
        self.sudo_user
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "root")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
