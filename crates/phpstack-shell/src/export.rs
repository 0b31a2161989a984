use regex::Regex;
use std::fmt::Write as _;
use std::path::PathBuf;

pub const DEFAULT_MARKER: &str = "# phpstack: PHP and Composer binaries";
pub const DEFAULT_SHEBANG: &str = "#!/bin/sh";
pub const DEFAULT_SYSTEM_FRAGMENT: &str = "/etc/profile.d/phpstack-path.sh";

pub const PHP_BIN_PATH: &str = "/usr/bin/php";
pub const PHP_DETECT_PATTERN: &str = "PATH.*php";
pub const LOCAL_BIN_PATH: &str = "/usr/local/bin";
pub const LOCAL_BIN_DETECT_PATTERN: &str = "PATH.*local/bin";

/// One `PATH` augmentation and the pattern that tells whether a file already
/// has it.
///
/// Detection is deliberately loose: any single line matching the pattern
/// counts, so a hand-written line such as `export PATH=/opt/php/bin:$PATH`
/// satisfies the PHP export while one spelled differently does not.
#[derive(Debug, Clone)]
pub struct PathExport {
    value: String,
    detect: Regex,
}

impl PathExport {
    /// # Errors
    /// Returns an error if `detect_pattern` is not a valid regular expression.
    pub fn new(value: impl Into<String>, detect_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            value: value.into(),
            detect: Regex::new(detect_pattern)?,
        })
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn detect_pattern(&self) -> &str {
        self.detect.as_str()
    }

    #[must_use]
    pub fn line(&self) -> String {
        format!("export PATH=$PATH:{}", self.value)
    }

    #[must_use]
    pub fn is_present_in(&self, content: &str) -> bool {
        self.detect.is_match(content)
    }
}

/// Everything the configurator writes, built once from settings.
#[derive(Debug, Clone)]
pub struct PathExportPlan {
    pub marker: String,
    pub exports: Vec<PathExport>,
    pub system_fragment: PathBuf,
    pub shebang: String,
}

impl PathExportPlan {
    /// The canonical system fragment: shebang, marker, one line per export.
    #[must_use]
    pub fn fragment_content(&self) -> String {
        let mut content = String::new();
        let _ = writeln!(content, "{}", self.shebang);
        let _ = writeln!(content, "{}", self.marker);
        for export in &self.exports {
            let _ = writeln!(content, "{}", export.line());
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn php() -> PathExport {
        PathExport::new(PHP_BIN_PATH, PHP_DETECT_PATTERN).expect("pattern should compile")
    }

    fn local_bin() -> PathExport {
        PathExport::new(LOCAL_BIN_PATH, LOCAL_BIN_DETECT_PATTERN).expect("pattern should compile")
    }

    #[test]
    fn export_line_appends_value_to_path() {
        assert_eq!(php().line(), "export PATH=$PATH:/usr/bin/php");
        assert_eq!(local_bin().line(), "export PATH=$PATH:/usr/local/bin");
    }

    #[test]
    fn detection_matches_loosely_within_a_line() {
        let export = php();

        assert!(export.is_present_in("export PATH=\"/opt/php/8.3/bin:$PATH\"\n"));
        assert!(export.is_present_in("# PATH tweaks for php\n"));
        assert!(!export.is_present_in("export PATH=$PATH:/usr/local/bin\n"));
    }

    #[test]
    fn detection_does_not_span_lines() {
        let export = php();

        assert!(!export.is_present_in("export PATH=$PATH:/usr/local/bin\nalias p=php\n"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(PathExport::new("/usr/bin/php", "PATH.*(php").is_err());
    }

    #[test]
    fn fragment_content_is_shebang_marker_and_exports() {
        let plan = PathExportPlan {
            marker: DEFAULT_MARKER.to_string(),
            exports: vec![php(), local_bin()],
            system_fragment: PathBuf::from(DEFAULT_SYSTEM_FRAGMENT),
            shebang: DEFAULT_SHEBANG.to_string(),
        };

        assert_eq!(
            plan.fragment_content(),
            "#!/bin/sh\n\
             # phpstack: PHP and Composer binaries\n\
             export PATH=$PATH:/usr/bin/php\n\
             export PATH=$PATH:/usr/local/bin\n"
        );
    }
}
