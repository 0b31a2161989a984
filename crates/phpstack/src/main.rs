mod error;
mod logging;
mod provision;
mod report;
mod settings;

use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use log::{error, info, warn};
use phpstack_platform::{
    AppPaths, InvocationEnv, SystemCommandRunner, SystemFileOwner, SystemUserDirectory,
    effective_uid, is_elevated,
};

use crate::error::AppError;
use crate::provision::Provisioner;
use crate::settings::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let paths = AppPaths::system();
    let (settings, settings_error) = match Settings::load_from(&paths.settings_file()) {
        Ok(settings) => (settings, None),
        Err(error) => (Settings::default(), Some(error)),
    };

    let log_path = settings.log_path(&paths);
    if let Some(error) = logging::init_logging(&log_path, settings.debug_logging) {
        warn!("Logging to {} disabled: {error}", log_path.display());
    }
    if let Some(error) = settings_error {
        warn!("{error}; using default settings");
    }

    if !is_elevated() {
        error!("{}", AppError::not_elevated(effective_uid()));
        return ExitCode::FAILURE;
    }

    info!("{} {}", settings.app_name, env!("CARGO_PKG_VERSION"));

    let env = InvocationEnv::capture();
    let runner = SystemCommandRunner::new(Duration::from_secs(settings.command_timeout_secs));
    let provisioner = Provisioner {
        settings: &settings,
        env: &env,
        users: &SystemUserDirectory,
        owner: &SystemFileOwner,
        runner: &runner,
        interactive: std::io::stdin().is_terminal(),
    };

    match provisioner.run().await {
        Ok(report) => {
            report.log_summary();
            let values: Vec<String> = settings
                .path_exports
                .iter()
                .map(|export| export.value.clone())
                .collect();
            for missing in report.missing_from_session(&values) {
                warn!("{missing} is not on PATH in a freshly sourced shell");
            }
            if report.unconfigured_targets().is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}
