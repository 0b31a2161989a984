use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::export::PathExport;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set permissions on {}: {source}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } | Self::Permissions { path, .. } => {
                path
            }
        }
    }
}

/// In-memory view of one shell startup file.
pub struct ShellConfig {
    pub config_path: PathBuf,
    pub content: String,
}

impl ShellConfig {
    /// Read `config_path`, treating a missing file as empty.
    ///
    /// Bytes that are not UTF-8 are replaced in the in-memory view only.
    /// Edits append to the file, so its existing bytes are never rewritten.
    pub fn load(config_path: PathBuf) -> Result<Self, ConfigError> {
        let content = if config_path.exists() {
            let bytes = fs::read(&config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            String::new()
        };

        Ok(Self {
            config_path,
            content,
        })
    }

    #[must_use]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.content.contains(marker)
    }

    #[must_use]
    pub fn missing_exports<'a>(&self, exports: &'a [PathExport]) -> Vec<&'a PathExport> {
        exports
            .iter()
            .filter(|export| !export.is_present_in(&self.content))
            .collect()
    }

    /// Build the lines to append so every export is present.
    ///
    /// The marker is written, after a blank line, only in front of the first
    /// insertion and only when it does not already appear in the file. Each
    /// export is checked against the content as it will be after the lines
    /// added before it.
    #[must_use]
    pub fn add_exports(&self, marker: &str, exports: &[PathExport]) -> ShellConfigEdit {
        let mut appended = String::new();
        let mut changes = Vec::new();
        let mut inserted = Vec::new();
        let mut marker_present = self.has_marker(marker);

        for export in exports {
            let current = format!("{}{appended}", self.content);
            if export.is_present_in(&current) {
                continue;
            }

            if marker_present {
                if !current.is_empty() && !current.ends_with('\n') {
                    appended.push('\n');
                }
            } else {
                let _ = write!(appended, "\n{marker}\n");
                changes.push(format!("Add marker: {marker}"));
                marker_present = true;
            }

            let line = export.line();
            let _ = writeln!(appended, "{line}");
            changes.push(format!("Add export: {line}"));
            inserted.push(export.value().to_string());
        }

        ShellConfigEdit {
            original: self.content.clone(),
            appended,
            changes,
            inserted,
        }
    }

    /// Append the edit's lines to the file on disk.
    pub fn apply_edit(&mut self, edit: &ShellConfigEdit) -> Result<(), ConfigError> {
        if !edit.has_changes() {
            return Ok(());
        }

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::write(&self.config_path, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config_path)
            .map_err(|e| ConfigError::write(&self.config_path, e))?;
        file.write_all(edit.appended.as_bytes())
            .map_err(|e| ConfigError::write(&self.config_path, e))?;
        self.content.push_str(&edit.appended);

        Ok(())
    }
}

pub struct ShellConfigEdit {
    pub original: String,
    pub appended: String,
    pub changes: Vec<String>,
    /// Values of the exports this edit adds, in insertion order.
    pub inserted: Vec<String>,
}

impl ShellConfigEdit {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    #[must_use]
    pub fn modified(&self) -> String {
        format!("{}{}", self.original, self.appended)
    }

    #[must_use]
    pub fn diff_preview(&self) -> String {
        if !self.has_changes() {
            return "No changes needed.".to_string();
        }

        let mut preview = String::new();

        for change in &self.changes {
            let _ = writeln!(preview, "+ {change}");
        }

        preview
    }
}
