//! Browser session lifecycle: launch, page creation, shutdown.

use std::time::Duration;

use {
    chromiumoxide::{Browser, BrowserConfig as CdpBrowserConfig},
    futures::StreamExt,
    regsnipe_config::BrowserConfig,
    tokio::task::JoinHandle,
    tracing::{debug, info},
};

use crate::{detect, error::BrowserError, page::CdpPage};

/// A single local Chromium instance bound to a persistent profile.
///
/// The profile directory carries cookies and the Duo remember-me token
/// across runs, so repeat runs usually skip the password prompt entirely.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    op_timeout: Duration,
}

impl BrowserSession {
    /// Launch Chromium with the configured profile and viewport.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let chrome = detect::find_browser(config.chrome_path.as_deref()).ok_or_else(|| {
            BrowserError::LaunchFailed(format!(
                "Chrome/Chromium not found. {}",
                detect::install_hint()
            ))
        })?;

        let op_timeout = Duration::from_secs(config.op_timeout_secs);

        let mut builder = CdpBrowserConfig::builder();

        // chromiumoxide runs headless by default; the flow wants a visible
        // window (Duo pushes, watching the run) unless told otherwise.
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .chrome_executable(&chrome)
            .user_data_dir(&config.profile_dir)
            .viewport(chromiumoxide::handler::viewport::Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(op_timeout);

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(|e| {
            BrowserError::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(cdp_config).await.map_err(|e| {
            BrowserError::LaunchFailed(format!(
                "browser launch failed: {e}\n\n{}",
                detect::install_hint()
            ))
        })?;

        // Drain CDP events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!(?event, "browser event");
            }
            debug!("browser event handler exited (connection closed)");
        });

        info!(
            chrome = %chrome.display(),
            profile_dir = %config.profile_dir.display(),
            headless = config.headless,
            viewport_width = config.viewport_width,
            viewport_height = config.viewport_height,
            "browser launched"
        );

        Ok(Self {
            browser,
            handler_task,
            op_timeout,
        })
    }

    /// Open the page used for the whole run.
    pub async fn open_page(&self) -> Result<CdpPage, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;
        Ok(CdpPage::new(page, self.op_timeout))
    }

    /// Shut the session down. The Chromium process exits when the browser
    /// handle drops.
    pub fn close(self) {
        self.handler_task.abort();
        drop(self.browser);
        info!("browser session closed");
    }
}
