use phpstack_platform::OwnershipError;
use std::path::PathBuf;
use thiserror::Error;

/// Advisory outcomes. The step that produced them still counts as done.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("ownership not applied: {0}")]
    Ownership(#[from] OwnershipError),

    #[error("could not source {} in a {shell} session: {details}", path.display())]
    Source {
        shell: &'static str,
        path: PathBuf,
        details: String,
    },
}

/// A successful value together with the warnings collected producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    pub value: T,
    pub warnings: Vec<ConfigWarning>,
}

impl<T> Applied<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: impl Into<ConfigWarning>) {
        self.warnings.push(warning.into());
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
