use log::debug;
use phpstack_platform::CommandRunner;
use std::path::Path;

use crate::config::ShellConfig;
use crate::detect::ShellType;
use crate::export::PathExportPlan;
use crate::targets::{ConfigTarget, TargetScope, enumerate_targets};
use crate::warnings::ConfigWarning;

const SOURCE_SCRIPT: &str = ". \"$1\" >/dev/null 2>&1 || exit 1; printf '%s' \"$PATH\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Configured,
    Partial { missing: Vec<String> },
    NotConfigured,
    ConfigFileNotFound,
    Error(String),
}

impl VerificationResult {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured)
    }
}

/// Re-read `target` and classify it against the plan. The system fragment
/// only counts as configured when it is exactly the canonical block.
#[must_use]
pub fn verify_target(target: &ConfigTarget, plan: &PathExportPlan) -> VerificationResult {
    if !target.exists() {
        return VerificationResult::ConfigFileNotFound;
    }

    let config = match ShellConfig::load(target.path.clone()) {
        Ok(config) => config,
        Err(e) => return VerificationResult::Error(e.to_string()),
    };

    match target.scope {
        TargetScope::System => {
            if config.content == plan.fragment_content() {
                VerificationResult::Configured
            } else {
                VerificationResult::NotConfigured
            }
        }
        TargetScope::User => {
            let missing: Vec<String> = config
                .missing_exports(&plan.exports)
                .into_iter()
                .map(|export| export.value().to_string())
                .collect();

            if missing.is_empty() {
                VerificationResult::Configured
            } else if missing.len() == plan.exports.len() {
                VerificationResult::NotConfigured
            } else {
                VerificationResult::Partial { missing }
            }
        }
    }
}

#[must_use]
pub fn verify_targets(
    plan: &PathExportPlan,
    home: &Path,
) -> Vec<(ConfigTarget, VerificationResult)> {
    enumerate_targets(home, &plan.system_fragment)
        .into_iter()
        .map(|target| {
            let result = verify_target(&target, plan);
            debug!("{}: {result:?}", target.path.display());
            (target, result)
        })
        .collect()
}

/// Source `config_path` in a child `shell` and return the `PATH` it ends up
/// with.
///
/// # Errors
/// Returns [`ConfigWarning::Source`] when the runner cannot start the shell
/// or sourcing fails.
pub async fn source_into_session(
    runner: &dyn CommandRunner,
    shell: ShellType,
    config_path: &Path,
) -> Result<String, ConfigWarning> {
    let program = shell.name();
    let source_warning = |details: String| ConfigWarning::Source {
        shell: program,
        path: config_path.to_path_buf(),
        details,
    };

    let path_arg = config_path.to_string_lossy();
    let path_arg: &str = path_arg.as_ref();
    let args: Vec<&str> = match shell {
        ShellType::Bash | ShellType::Zsh => vec!["-i", "-c", SOURCE_SCRIPT, program, path_arg],
        ShellType::Other => vec!["-c", SOURCE_SCRIPT, program, path_arg],
    };

    let output = runner
        .run(program, &args)
        .await
        .map_err(|e| source_warning(e.to_string()))?;

    if !output.success() {
        let stderr = output.stderr.trim();
        let details = if stderr.is_empty() {
            format!("exit status {:?}", output.exit_code)
        } else {
            stderr.to_string()
        };
        return Err(source_warning(details));
    }

    Ok(output.stdout.trim().to_string())
}
