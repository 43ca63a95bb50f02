//! Chromium detection and install guidance.

use std::path::PathBuf;

/// Chromium-family executable names to search for in PATH.
/// All of these speak CDP (Chrome DevTools Protocol).
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge-stable",
    "brave",
    "brave-browser",
];

/// macOS app bundle paths, checked before PATH. PATH can contain broken
/// wrapper scripts (e.g. Homebrew's deprecated chromium).
#[cfg(target_os = "macos")]
const MACOS_APP_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Windows installation paths, checked before PATH.
#[cfg(target_os = "windows")]
const WINDOWS_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Find a Chromium-based browser to drive.
///
/// Checks (in order):
/// 1. The configured `chrome_path` (if provided)
/// 2. The CHROME environment variable
/// 3. Platform-specific installation paths
/// 4. Known executable names in PATH
pub fn find_browser(configured: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = configured {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
        tracing::warn!(path, "configured chrome_path does not exist, falling back");
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    #[cfg(target_os = "macos")]
    for path in MACOS_APP_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    #[cfg(target_os = "windows")]
    for path in WINDOWS_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    CHROMIUM_EXECUTABLES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Platform-specific install instructions for launch failure messages.
pub fn install_hint() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome"
    } else if cfg!(target_os = "windows") {
        "  winget install Google.Chrome"
    } else {
        "  Debian/Ubuntu: sudo apt install chromium-browser\n  \
         Fedora:         sudo dnf install chromium\n  \
         Arch:           sudo pacman -S chromium"
    };

    format!(
        "No Chromium-based browser found. Install one:\n\n\
         {instructions}\n\n\
         Any Chromium-based browser works (Chrome, Chromium, Edge, Brave).\n\n\
         Or set the path in regsnipe.toml:\n  \
         [browser]\n  \
         chrome_path = \"/path/to/browser\"\n\n\
         Or set the CHROME environment variable."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_hint_not_empty() {
        let hint = install_hint();
        assert!(!hint.is_empty());
        assert!(hint.contains("chrome_path"));
    }

    #[test]
    fn test_install_hint_platform_specific() {
        let hint = install_hint();

        #[cfg(target_os = "macos")]
        assert!(hint.contains("brew"), "macOS instructions should mention brew");

        #[cfg(target_os = "linux")]
        assert!(
            hint.contains("apt") || hint.contains("dnf") || hint.contains("pacman"),
            "Linux instructions should mention package managers"
        );

        #[cfg(target_os = "windows")]
        assert!(hint.contains("winget"), "Windows instructions should mention winget");
    }

    #[test]
    fn test_configured_path_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let fake_browser = dir.path().join("fake-chrome-for-test");
        std::fs::write(&fake_browser, "fake").unwrap();

        let found = find_browser(fake_browser.to_str());
        assert_eq!(found.as_ref(), Some(&fake_browser));
    }

    #[test]
    fn test_invalid_configured_path_falls_through() {
        // The result depends on whether Chrome is installed on the test
        // system, but a bogus configured path must never be returned.
        let found = find_browser(Some("/nonexistent/path/to/chrome"));
        if let Some(path) = found {
            assert_ne!(path, PathBuf::from("/nonexistent/path/to/chrome"));
        }
    }

    #[test]
    fn test_chromium_executables_list_not_empty() {
        assert!(!CHROMIUM_EXECUTABLES.is_empty());
        assert!(CHROMIUM_EXECUTABLES.contains(&"chromium"));
        assert!(CHROMIUM_EXECUTABLES.contains(&"google-chrome"));
    }
}
