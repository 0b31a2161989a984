use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The provisioning log, opened in append mode. A log file removed between
/// writes (logrotate without `copytruncate`) is created again.
struct ProvisionLog {
    path: PathBuf,
    file: File,
}

impl ProvisionLog {
    fn open(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }
}

impl Write for ProvisionLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.path.exists() {
            *self = Self::open(self.path.clone())?;
        }
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Log to the terminal (colored) and to `log_path`.
///
/// Console logging is always installed. The returned error, if any, is why
/// the log file could not be opened.
pub fn init_logging(log_path: &Path, debug_enabled: bool) -> Option<io::Error> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("phpstack")
        .build();

    let term_level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    let file_error = match ProvisionLog::open(log_path.to_path_buf()) {
        Ok(writer) => {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, writer));
            None
        }
        Err(error) => Some(error),
    };

    let _ = CombinedLogger::init(loggers);
    log::set_max_level(LevelFilter::Debug);

    if file_error.is_none() {
        log::debug!("Logging initialized, log file: {}", log_path.display());
    }

    file_error
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::ProvisionLog;

    #[test]
    fn removed_log_is_recreated_on_next_write() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("provision.log");
        let mut log = ProvisionLog::open(log_path.clone()).expect("log should open");

        log.write_all(b"resolved alice\n")
            .expect("initial write should succeed");
        std::fs::remove_file(&log_path).expect("log file should be removable");
        log.write_all(b"updated .bashrc\n")
            .expect("write after removal should succeed");

        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log should be readable"),
            "updated .bashrc\n"
        );
    }

    #[test]
    fn runs_append_to_the_same_log() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("var").join("log").join("provision.log");

        for line in ["first run\n", "second run\n"] {
            let mut log = ProvisionLog::open(log_path.clone()).expect("log should open");
            log.write_all(line.as_bytes()).expect("write should succeed");
        }

        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log should be readable"),
            "first run\nsecond run\n"
        );
    }
}
