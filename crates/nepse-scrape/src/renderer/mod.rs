//! Renderer abstraction for the browser session.
//!
//! Defines the `RenderContext` trait the submitter and extractor drive. The
//! only engine is Chromium via chromiumoxide; tests substitute scripted
//! contexts.

pub mod chromium;

use async_trait::async_trait;
use std::time::Duration;

use crate::types::ScrapeResult;

pub use chromium::{acquire, find_chromium, ChromiumSession};

/// A single browser tab the pipeline talks to.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL, giving up after `timeout`.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> ScrapeResult<()>;
    /// Evaluate a JavaScript expression and return its JSON value.
    async fn execute_js(&self, script: &str) -> ScrapeResult<serde_json::Value>;
    /// Page load budget configured for this context.
    fn page_load_timeout(&self) -> Duration;
    /// Close the tab and the browser behind it.
    async fn close(self: Box<Self>) -> ScrapeResult<()>;
}
