use log::{debug, info, warn};
use phpstack_platform::{
    CommandRunner, FileOwner, InvocationEnv, UserDirectory, resolve_actual_user,
};
use phpstack_shell::{
    ShellType, configure_universal_shell_path, source_into_session, verify_targets,
};

use crate::error::AppError;
use crate::report::ProvisionReport;
use crate::settings::Settings;

/// The shell PATH step of provisioning, with every OS capability injected.
pub struct Provisioner<'a> {
    pub settings: &'a Settings,
    pub env: &'a InvocationEnv,
    pub users: &'a dyn UserDirectory,
    pub owner: &'a dyn FileOwner,
    pub runner: &'a dyn CommandRunner,
    /// Whether an operator is watching on a terminal.
    pub interactive: bool,
}

impl Provisioner<'_> {
    pub async fn run(&self) -> Result<ProvisionReport, AppError> {
        let plan = self
            .settings
            .path_plan()
            .map_err(AppError::invalid_settings)?;

        let user =
            resolve_actual_user(self.env, self.users).map_err(AppError::user_resolution_failed)?;
        info!(
            "{}: configuring shell PATH for {} (home {})",
            self.settings.app_name,
            user.name,
            user.home.display()
        );
        if user.is_root() {
            debug!("No invoking user; configuring root's own shell files");
        }

        let configured = configure_universal_shell_path(&plan, &user, self.owner)?;
        let mut warnings = configured.warnings;
        let verification = verify_targets(&plan, &user.home);

        let shell = ShellType::from_shell_var(self.env.shell.as_deref());
        let hint = shell.apply_hint(&user.home);

        let mut session_path = None;
        if self.interactive && self.settings.source_in_session {
            let primary = shell.primary_config(&user.home);
            match source_into_session(self.runner, shell, &primary).await {
                Ok(path) => {
                    debug!("Sourced {} in {}", primary.display(), shell.name());
                    session_path = Some(path);
                }
                Err(warning) => {
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        Ok(ProvisionReport {
            user,
            configured: configured.value,
            verification,
            warnings,
            hint,
            session_path,
        })
    }
}
