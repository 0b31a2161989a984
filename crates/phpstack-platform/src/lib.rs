//! Operating system seams for phpstack.
//!
//! Everything that touches process identity, the user database, file
//! ownership or child processes lives here so the shell configurator can be
//! exercised against fakes.

mod commands;
mod environment;
mod ownership;
mod paths;
mod user;

pub use commands::{CommandError, CommandOutput, CommandRunner, SystemCommandRunner};
pub use environment::InvocationEnv;
pub use ownership::{FileOwner, OwnershipError, SystemFileOwner};
pub use paths::AppPaths;
pub use user::{
    ActualUser, ResolutionError, SystemUserDirectory, UserDirectory, effective_uid, is_elevated,
    resolve_actual_user,
};
