//! Chromium-backed session using chromiumoxide.

use super::RenderContext;
use crate::config::SessionConfig;
use crate::types::{ScrapeError, ScrapeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Environment variable that points at a specific Chromium binary.
pub const CHROMIUM_PATH_ENV: &str = "NEPSE_CHROMIUM_PATH";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Launch a browser and open the single tab the run works in.
pub async fn acquire(config: &SessionConfig) -> ScrapeResult<ChromiumSession> {
    let chrome_path = match &config.chromium_path {
        Some(p) => p.clone(),
        None => find_chromium().ok_or_else(|| {
            ScrapeError::DriverInit(format!(
                "Chromium not found. Install Chrome or set {CHROMIUM_PATH_ENV}."
            ))
        })?,
    };

    tracing::info!("Launching Chromium: {}", chrome_path.display());

    let mut builder = BrowserConfig::builder()
        .chrome_executable(chrome_path)
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg(format!("--user-agent={}", config.user_agent))
        .request_timeout(config.page_load_timeout)
        .window_size(1920, 1080);
    builder = if config.headless {
        builder.arg("--headless=new")
    } else {
        builder.with_head()
    };
    let browser_config = builder
        .build()
        .map_err(|e| ScrapeError::DriverInit(format!("failed to build browser config: {e}")))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .map_err(|e| ScrapeError::DriverInit(format!("failed to launch Chromium: {e}")))?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::debug!("browser handler: {e}");
            }
        }
    });

    let page = match browser.new_page("about:blank").await {
        Ok(page) => page,
        Err(e) => {
            handler_task.abort();
            return Err(ScrapeError::DriverInit(format!("failed to open tab: {e}")));
        }
    };

    Ok(ChromiumSession {
        browser,
        page,
        handler_task,
        page_load_timeout: config.page_load_timeout,
    })
}

/// One headless browser with one tab.
///
/// Dropping the session also kills the browser process; `close` does it
/// gracefully.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    page_load_timeout: Duration,
}

#[async_trait]
impl RenderContext for ChromiumSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> ScrapeResult<()> {
        let start = Instant::now();

        let result = tokio::time::timeout(timeout, self.page.goto(url)).await;

        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                tracing::debug!("Loaded {url} in {}ms", start.elapsed().as_millis());
                Ok(())
            }
            Ok(Err(e)) => Err(ScrapeError::Navigation(format!("{url}: {e}"))),
            Err(_) => Err(ScrapeError::Navigation(format!(
                "{url}: timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    async fn execute_js(&self, script: &str) -> ScrapeResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScrapeError::Script(format!("evaluation failed: {e}")))?;

        result
            .into_value()
            .map_err(|e| ScrapeError::Script(format!("failed to convert result: {e:?}")))
    }

    fn page_load_timeout(&self) -> Duration {
        self.page_load_timeout
    }

    async fn close(self: Box<Self>) -> ScrapeResult<()> {
        let mut this = *self;
        if let Err(e) = this.browser.close().await {
            tracing::warn!("Browser close failed: {e}");
        }
        let _ = this.browser.wait().await;
        this.handler_task.abort();
        tracing::info!("Browser closed");
        Ok(())
    }
}
