use log::{debug, warn};
use std::path::PathBuf;
use thiserror::Error;

use crate::environment::InvocationEnv;

/// The non-elevated identity whose shell files are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualUser {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
}

impl ActualUser {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.uid == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("user '{name}' does not exist in the user database")]
    UnknownUser { name: String },

    #[error("failed to look up {subject} in the user database: {details}")]
    Lookup { subject: String, details: String },

    #[error("could not determine a home directory for uid {uid}")]
    HomeUnavailable { uid: u32 },
}

/// Identity lookups against the system user database.
pub trait UserDirectory {
    fn by_name(&self, name: &str) -> Result<Option<ActualUser>, ResolutionError>;

    fn by_uid(&self, uid: u32) -> Result<Option<ActualUser>, ResolutionError>;

    /// Effective uid and gid of the running process.
    fn current_ids(&self) -> (u32, u32);
}

/// Work out on whose behalf configuration should be written.
///
/// An invoking user (set by `sudo`) other than root is looked up by name and
/// must exist. Without one, the owner of the current process is used: first
/// through the user database, then through `USER`/`HOME`.
///
/// # Errors
/// Returns [`ResolutionError`] when the invoking user is unknown, the lookup
/// itself fails, or no home directory can be determined at all.
pub fn resolve_actual_user(
    env: &InvocationEnv,
    directory: &dyn UserDirectory,
) -> Result<ActualUser, ResolutionError> {
    if let Some(name) = env.invoking_user() {
        debug!("Resolving invoking user '{name}' from the user database");
        return directory
            .by_name(name)?
            .ok_or_else(|| ResolutionError::UnknownUser {
                name: name.to_string(),
            });
    }

    let (uid, gid) = directory.current_ids();
    match directory.by_uid(uid) {
        Ok(Some(user)) => {
            debug!("Resolved process owner uid {uid} to '{}'", user.name);
            return Ok(user);
        }
        Ok(None) => debug!("uid {uid} has no user database entry"),
        Err(error) => warn!("{error}; falling back to USER/HOME"),
    }

    let home = env
        .home
        .clone()
        .ok_or(ResolutionError::HomeUnavailable { uid })?;
    let name = env.user.clone().unwrap_or_else(|| uid.to_string());

    Ok(ActualUser {
        name,
        uid,
        gid,
        home,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUserDirectory;

#[cfg(unix)]
impl SystemUserDirectory {
    fn from_nix(user: nix::unistd::User) -> ActualUser {
        ActualUser {
            name: user.name,
            uid: user.uid.as_raw(),
            gid: user.gid.as_raw(),
            home: user.dir,
        }
    }
}

#[cfg(unix)]
impl UserDirectory for SystemUserDirectory {
    fn by_name(&self, name: &str) -> Result<Option<ActualUser>, ResolutionError> {
        nix::unistd::User::from_name(name)
            .map(|user| user.map(Self::from_nix))
            .map_err(|errno| ResolutionError::Lookup {
                subject: format!("user '{name}'"),
                details: errno.to_string(),
            })
    }

    fn by_uid(&self, uid: u32) -> Result<Option<ActualUser>, ResolutionError> {
        nix::unistd::User::from_uid(nix::unistd::Uid::from_raw(uid))
            .map(|user| user.map(Self::from_nix))
            .map_err(|errno| ResolutionError::Lookup {
                subject: format!("uid {uid}"),
                details: errno.to_string(),
            })
    }

    fn current_ids(&self) -> (u32, u32) {
        (
            nix::unistd::geteuid().as_raw(),
            nix::unistd::getegid().as_raw(),
        )
    }
}

#[cfg(not(unix))]
impl UserDirectory for SystemUserDirectory {
    fn by_name(&self, _name: &str) -> Result<Option<ActualUser>, ResolutionError> {
        Ok(None)
    }

    fn by_uid(&self, _uid: u32) -> Result<Option<ActualUser>, ResolutionError> {
        Ok(None)
    }

    fn current_ids(&self) -> (u32, u32) {
        (u32::MAX, u32::MAX)
    }
}

#[cfg(unix)]
#[must_use]
pub fn effective_uid() -> u32 {
    nix::unistd::geteuid().as_raw()
}

#[cfg(not(unix))]
#[must_use]
pub fn effective_uid() -> u32 {
    u32::MAX
}

/// Whether the process runs with superuser privileges.
#[must_use]
pub fn is_elevated() -> bool {
    effective_uid() == 0
}
