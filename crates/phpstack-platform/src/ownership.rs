use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::user::ActualUser;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to give {} to {user} ({uid}:{gid}): {details}", path.display())]
pub struct OwnershipError {
    pub path: PathBuf,
    pub user: String,
    pub uid: u32,
    pub gid: u32,
    pub details: String,
}

/// Hands a file over to the actual user (owner and primary group).
pub trait FileOwner {
    fn set_owner(&self, path: &Path, user: &ActualUser) -> Result<(), OwnershipError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileOwner;

#[cfg(unix)]
impl FileOwner for SystemFileOwner {
    fn set_owner(&self, path: &Path, user: &ActualUser) -> Result<(), OwnershipError> {
        use nix::unistd::{Gid, Uid, chown};

        chown(
            path,
            Some(Uid::from_raw(user.uid)),
            Some(Gid::from_raw(user.gid)),
        )
        .map_err(|errno| OwnershipError {
            path: path.to_path_buf(),
            user: user.name.clone(),
            uid: user.uid,
            gid: user.gid,
            details: errno.to_string(),
        })
    }
}

#[cfg(not(unix))]
impl FileOwner for SystemFileOwner {
    fn set_owner(&self, path: &Path, user: &ActualUser) -> Result<(), OwnershipError> {
        Err(OwnershipError {
            path: path.to_path_buf(),
            user: user.name.clone(),
            uid: user.uid,
            gid: user.gid,
            details: "file ownership is only supported on Unix".to_string(),
        })
    }
}
