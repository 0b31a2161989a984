use log::{debug, info, warn};
use phpstack_platform::{ActualUser, FileOwner};
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::config::{ConfigError, ShellConfig};
use crate::export::PathExportPlan;
use crate::targets::{ConfigTarget, TargetScope, enumerate_targets};
use crate::warnings::{Applied, ConfigWarning};

const FRAGMENT_MODE: u32 = 0o755;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: ConfigTarget,
    pub created: bool,
    /// Export values appended during this run.
    pub inserted: Vec<String>,
    /// Whether the file's bytes differ from before the run.
    pub modified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl ConfigureReport {
    #[must_use]
    pub fn modified_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.modified).count()
    }

    #[must_use]
    pub fn outcome_for(&self, path: &Path) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|o| o.target.path == path)
    }
}

/// Make every shell startup file of `user`, and the system fragment, export
/// the plan's `PATH` entries.
///
/// User files are merged into and handed to `user`; the system fragment is
/// regenerated. Ownership failures come back as warnings.
///
/// # Errors
/// Returns the first [`ConfigError`]; targets after it are left untouched.
pub fn configure_universal_shell_path(
    plan: &PathExportPlan,
    user: &ActualUser,
    owner: &dyn FileOwner,
) -> Result<Applied<ConfigureReport>, ConfigError> {
    let mut applied = Applied::new(ConfigureReport::default());

    for target in enumerate_targets(&user.home, &plan.system_fragment) {
        let outcome = match target.scope {
            TargetScope::User => {
                let result = configure_user_target(&target, plan, user, owner)?;
                applied.warnings.extend(result.warnings);
                result.value
            }
            TargetScope::System => write_system_fragment(&target, plan)?,
        };
        applied.value.outcomes.push(outcome);
    }

    info!(
        "Shell PATH configuration finished: {} of {} targets changed",
        applied.value.modified_count(),
        applied.value.outcomes.len()
    );

    Ok(applied)
}

/// Append whichever exports `target` lacks, creating it if needed.
///
/// # Errors
/// Returns an error if the file cannot be created, read or appended to.
pub fn configure_user_target(
    target: &ConfigTarget,
    plan: &PathExportPlan,
    user: &ActualUser,
    owner: &dyn FileOwner,
) -> Result<Applied<TargetOutcome>, ConfigError> {
    let path = &target.path;
    let mut applied = Applied::new(TargetOutcome {
        target: target.clone(),
        created: false,
        inserted: Vec::new(),
        modified: false,
    });

    if !target.exists() {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ConfigError::write(path, e))?;
        info!("Created {}", path.display());
        applied.value.created = true;
        apply_ownership(path, user, owner, &mut applied);
    }

    let mut config = ShellConfig::load(path.clone())?;
    let edit = config.add_exports(&plan.marker, &plan.exports);

    if !edit.has_changes() {
        debug!("{} already exports all PATH entries", path.display());
        return Ok(applied);
    }

    debug!("Changes for {}:\n{}", path.display(), edit.diff_preview());
    config.apply_edit(&edit)?;
    info!(
        "Updated {}: added {}",
        path.display(),
        edit.inserted.join(", ")
    );

    applied.value.inserted = edit.inserted;
    applied.value.modified = true;
    apply_ownership(path, user, owner, &mut applied);

    Ok(applied)
}

/// Overwrite the system fragment with the canonical block and make it
/// executable.
///
/// # Errors
/// Returns an error if the fragment or its directory cannot be written, or
/// its permissions cannot be set.
pub fn write_system_fragment(
    target: &ConfigTarget,
    plan: &PathExportPlan,
) -> Result<TargetOutcome, ConfigError> {
    let path = &target.path;
    let content = plan.fragment_content();
    let existed = target.exists();
    let previous = fs::read_to_string(path).ok();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::write(path, e))?;
    }
    fs::write(path, &content).map_err(|e| ConfigError::write(path, e))?;
    set_executable(path)?;

    let modified = previous.as_deref() != Some(content.as_str());
    if modified {
        info!("Wrote system PATH fragment {}", path.display());
    } else {
        debug!("System PATH fragment {} unchanged", path.display());
    }

    Ok(TargetOutcome {
        target: target.clone(),
        created: !existed,
        inserted: if modified {
            plan.exports.iter().map(|e| e.value().to_string()).collect()
        } else {
            Vec::new()
        },
        modified,
    })
}

fn apply_ownership<T>(
    path: &Path,
    user: &ActualUser,
    owner: &dyn FileOwner,
    applied: &mut Applied<T>,
) {
    match owner.set_owner(path, user) {
        Ok(()) => debug!("{} is owned by {}", path.display(), user.name),
        Err(error) => {
            let warning = ConfigWarning::from(error);
            if !applied.warnings.contains(&warning) {
                warn!("{warning}");
                applied.warnings.push(warning);
            }
        }
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(FRAGMENT_MODE)).map_err(|source| {
        ConfigError::Permissions {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), ConfigError> {
    let _ = FRAGMENT_MODE;
    Ok(())
}
