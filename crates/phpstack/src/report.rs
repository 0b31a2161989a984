use log::{error, info};
use phpstack_platform::ActualUser;
use phpstack_shell::{
    ConfigTarget, ConfigWarning, ConfigureReport, TargetScope, VerificationResult,
};

/// Everything a provisioning run did, for the operator's summary.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub user: ActualUser,
    pub configured: ConfigureReport,
    pub verification: Vec<(ConfigTarget, VerificationResult)>,
    pub warnings: Vec<ConfigWarning>,
    pub hint: String,
    /// `PATH` seen by a shell that sourced the primary config, if one did.
    pub session_path: Option<String>,
}

impl ProvisionReport {
    /// User targets that still lack an export after the run.
    #[must_use]
    pub fn unconfigured_targets(&self) -> Vec<&ConfigTarget> {
        self.verification
            .iter()
            .filter(|(target, result)| {
                target.scope == TargetScope::User && !result.is_configured()
            })
            .map(|(target, _)| target)
            .collect()
    }

    /// Configured export values missing from the sourced session's `PATH`.
    #[must_use]
    pub fn missing_from_session<'a>(&self, values: &'a [String]) -> Vec<&'a str> {
        let Some(path) = &self.session_path else {
            return Vec::new();
        };
        values
            .iter()
            .filter(|value| !path.split(':').any(|entry| entry == value.as_str()))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Shell PATH configured for {} ({})",
            self.user.name,
            self.user.home.display()
        )];

        for outcome in &self.configured.outcomes {
            let status = match (outcome.created, outcome.modified) {
                (true, _) => format!("created, added {}", outcome.inserted.join(", ")),
                (false, true) => format!("added {}", outcome.inserted.join(", ")),
                (false, false) => "already configured".to_string(),
            };
            lines.push(format!(
                "  [{}] {}: {status}",
                outcome.target.scope,
                outcome.target.path.display()
            ));
        }

        if !self.warnings.is_empty() {
            lines.push(format!(
                "{} warning(s) during configuration, see above",
                self.warnings.len()
            ));
        }

        lines.push(format!("Run `{}` to apply the changes in this shell", self.hint));
        lines
    }

    pub fn log_summary(&self) {
        for line in self.summary_lines() {
            info!("{line}");
        }
        for target in self.unconfigured_targets() {
            error!(
                "{} is still missing PATH exports after configuration",
                target.path.display()
            );
        }
    }
}
