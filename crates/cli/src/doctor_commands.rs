//! `regsnipe doctor` — environment and configuration health check.
//!
//! Runs the checks a failed run usually traces back to (config file,
//! credentials, browser binary, output directories) and prints a structured
//! report with `[ok]`, `[warn]`, `[fail]`, `[skip]`, or `[info]` status
//! indicators per item.

use std::path::Path;

use {
    anyhow::Result,
    regsnipe_config::{
        RegsnipeConfig,
        credentials::{NET_ID_VAR, PASSWORD_VAR},
    },
};

// ── ANSI helpers ────────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Per-check result used to build the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
    Skip,
    Info,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warn => "warn",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Info => "info",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Ok => GREEN,
            Self::Warn => YELLOW,
            Self::Fail => RED,
            Self::Skip => DIM,
            Self::Info => CYAN,
        }
    }
}

struct CheckItem {
    status: Status,
    message: String,
}

struct Section {
    title: String,
    items: Vec<CheckItem>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, status: Status, message: impl Into<String>) {
        self.items.push(CheckItem {
            status,
            message: message.into(),
        });
    }
}

// ── Printing ────────────────────────────────────────────────────────────────

fn print_report(sections: &[Section]) -> (usize, usize) {
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for section in sections {
        eprintln!("{BOLD}{}{RESET}", section.title);
        for item in &section.items {
            let color = item.status.color();
            let label = item.status.label();
            eprintln!("  [{color}{label}{RESET}]  {}", item.message);
            match item.status {
                Status::Fail => errors += 1,
                Status::Warn => warnings += 1,
                _ => {},
            }
        }
        eprintln!();
    }

    (errors, warnings)
}

// ── Entry point ─────────────────────────────────────────────────────────────

pub fn handle_doctor() -> Result<()> {
    eprintln!("{BOLD}regsnipe doctor{RESET}");
    eprintln!("{BOLD}==============={RESET}\n");

    let mut sections = Vec::new();

    // 1. Config file
    sections.push(check_config());

    // Load config for subsequent checks (best-effort)
    let config = regsnipe_config::discover_and_load();

    // 2. Credentials
    sections.push(check_credentials());

    // 3. Browser availability
    sections.push(check_browser(&config));

    // 4. Output directories
    sections.push(check_directories(&config));

    let (errors, warnings) = print_report(&sections);

    eprintln!("{BOLD}Summary:{RESET} {errors} error(s), {warnings} warning(s)");

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

// ── 1. Config file ──────────────────────────────────────────────────────────

fn check_config() -> Section {
    config_section(regsnipe_config::find_config_file().as_deref())
}

fn config_section(path: Option<&Path>) -> Section {
    let mut section = Section::new("Config");

    match path {
        Some(path) => match regsnipe_config::load_config(path) {
            Ok(config) => {
                section.push(Status::Ok, format!("{} parses", path.display()));
                match config.enrollment.validate() {
                    Ok(()) => section.push(
                        Status::Ok,
                        format!("semester: {:?}", config.enrollment.semester),
                    ),
                    Err(e) => section.push(Status::Fail, e.to_string()),
                }
            },
            Err(e) => {
                section.push(Status::Fail, e.to_string());
                section.push(Status::Skip, "semester check skipped (config did not parse)");
            },
        },
        None => {
            section.push(
                Status::Info,
                format!(
                    "no {} found (using defaults)",
                    regsnipe_config::CONFIG_FILENAME
                ),
            );
        },
    }

    section
}

// ── 2. Credentials ──────────────────────────────────────────────────────────

fn check_credentials() -> Section {
    let mut section = Section::new("Credentials");

    if Path::new(".env").exists() {
        section.push(Status::Info, ".env file present");
    }

    for var in [NET_ID_VAR, PASSWORD_VAR] {
        match std::env::var(var) {
            Ok(value) if !value.is_empty() => {
                section.push(Status::Ok, format!("{var} set"));
            },
            _ => {
                section.push(
                    Status::Fail,
                    format!("{var} missing (export it or add it to a .env file)"),
                );
            },
        }
    }

    section
}

// ── 3. Browser availability ─────────────────────────────────────────────────

fn check_browser(config: &RegsnipeConfig) -> Section {
    let mut section = Section::new("Browser");

    match regsnipe_browser::detect::find_browser(config.browser.chrome_path.as_deref()) {
        Some(path) => {
            section.push(Status::Ok, format!("Chromium found: {}", path.display()));
        },
        None => {
            section.push(Status::Fail, "no Chromium-based browser found");
        },
    }

    if config.browser.headless {
        section.push(
            Status::Warn,
            "headless is enabled; a Duo prompt would have no visible window",
        );
    }

    section
}

// ── 4. Output directories ───────────────────────────────────────────────────

fn check_directories(config: &RegsnipeConfig) -> Section {
    let mut section = Section::new("Directories");

    describe_dir(
        &mut section,
        &config.browser.profile_dir,
        "Profile directory",
    );
    describe_dir(
        &mut section,
        &config.enrollment.screenshots_dir,
        "Screenshots directory",
    );

    section
}

fn describe_dir(section: &mut Section, dir: &Path, label: &str) {
    if dir.is_dir() {
        let probe = dir.join(".regsnipe-doctor-probe");
        match std::fs::write(&probe, b"probe") {
            Ok(()) => {
                let _ = std::fs::remove_file(&probe);
                section.push(Status::Ok, format!("{label}: {}", dir.display()));
            },
            Err(e) => {
                section.push(Status::Fail, format!("{label} is not writable: {e}"));
            },
        }
    } else {
        section.push(
            Status::Info,
            format!("{label} will be created on first run: {}", dir.display()),
        );
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(Status::Ok.label(), "ok");
        assert_eq!(Status::Warn.label(), "warn");
        assert_eq!(Status::Fail.label(), "fail");
        assert_eq!(Status::Skip.label(), "skip");
        assert_eq!(Status::Info.label(), "info");
    }

    #[test]
    fn print_report_counts_errors_and_warnings() {
        let mut section = Section::new("test");
        section.push(Status::Ok, "fine");
        section.push(Status::Warn, "caution");
        section.push(Status::Warn, "caution2");
        section.push(Status::Fail, "broken");
        section.push(Status::Info, "note");

        let (errors, warnings) = print_report(&[section]);
        assert_eq!(errors, 1);
        assert_eq!(warnings, 2);
    }

    #[test]
    fn parseable_config_reports_ok_for_file_and_semester() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("regsnipe.toml");
        std::fs::write(&path, "[enrollment]\nsemester = \"Fall 2025\"\n").unwrap();

        let section = config_section(Some(&path));

        assert!(section.items.iter().all(|i| i.status == Status::Ok));
        assert_eq!(section.items.len(), 2);
    }

    #[test]
    fn unparseable_config_fails_and_skips_the_semester_check() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("regsnipe.toml");
        std::fs::write(&path, "not toml [[[").unwrap();

        let section = config_section(Some(&path));

        let statuses: Vec<Status> = section.items.iter().map(|i| i.status).collect();
        assert_eq!(statuses, vec![Status::Fail, Status::Skip]);
        assert!(section.items[1].message.contains("skipped"));
    }

    #[test]
    fn absent_config_reports_info() {
        let section = config_section(None);

        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].status, Status::Info);
        assert!(section.items[0].message.contains("using defaults"));
    }

    #[test]
    fn writable_directory_reports_ok() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut section = Section::new("test");

        describe_dir(&mut section, temp.path(), "Probe directory");

        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].status, Status::Ok);
    }

    #[test]
    fn missing_directory_reports_info() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut section = Section::new("test");

        describe_dir(&mut section, &temp.path().join("absent"), "Probe directory");

        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].status, Status::Info);
        assert!(section.items[0].message.contains("created on first run"));
    }

    #[test]
    fn headless_config_warns() {
        let mut config = RegsnipeConfig::default();
        config.browser.headless = true;

        let section = check_browser(&config);
        let warn_item = section.items.iter().find(|i| i.status == Status::Warn);
        assert!(warn_item.is_some());
        assert!(warn_item.unwrap().message.contains("headless"));
    }
}
