//! The narrow interface between the day loop and the website.
//!
//! The orchestrator and the history export only ever talk to a
//! [`DataSource`]. [`BrowserSource`] is the real one, driving a Chromium tab;
//! tests plug in fixture sources that serve canned pages.

use async_trait::async_trait;

use crate::config::SiteConfig;
use crate::extract;
use crate::renderer::RenderContext;
use crate::script;
use crate::submit;
use crate::types::{RawPage, ScrapeError, ScrapeResult, TradingDate};
use crate::wait::{wait_for_change, wait_until};

/// Something that can search the share price site and page through results.
#[async_trait]
pub trait DataSource: Send {
    /// Run the single-day search. `Ok(false)` means the site has no data for
    /// that date.
    async fn submit_search(&mut self, date: &TradingDate) -> ScrapeResult<bool>;

    /// Run the historical range search covering `from..=to`.
    async fn submit_range(&mut self, from: &TradingDate, to: &TradingDate) -> ScrapeResult<bool>;

    /// Rows of the page currently shown.
    async fn read_page(&mut self) -> ScrapeResult<RawPage>;

    /// Advance to the next page. `Ok(false)` when there is none.
    async fn next_page(&mut self) -> ScrapeResult<bool>;
}

/// [`DataSource`] backed by a live browser tab.
pub struct BrowserSource {
    ctx: Box<dyn RenderContext>,
    site: SiteConfig,
    table_selector: String,
}

impl BrowserSource {
    pub fn new(ctx: Box<dyn RenderContext>, site: SiteConfig) -> Self {
        let table_selector = site.results_table.clone();
        Self {
            ctx,
            site,
            table_selector,
        }
    }

    /// Release the browser session.
    pub async fn close(self) -> ScrapeResult<()> {
        self.ctx.close().await
    }
}

#[async_trait]
impl DataSource for BrowserSource {
    async fn submit_search(&mut self, date: &TradingDate) -> ScrapeResult<bool> {
        self.table_selector = self.site.results_table.clone();
        submit::submit(self.ctx.as_mut(), &self.site, date).await
    }

    async fn submit_range(&mut self, from: &TradingDate, to: &TradingDate) -> ScrapeResult<bool> {
        self.table_selector = self.site.history_table.clone();
        let site = &self.site;
        let budget = site.wait_budget();
        let load_timeout = self.ctx.page_load_timeout();

        self.ctx.navigate(&site.history_url, load_timeout).await?;

        let two_inputs = format!("{} >= 2", script::count(&site.history_inputs));
        if !wait_until(self.ctx.as_ref(), &two_inputs, budget).await? {
            return Err(ScrapeError::ElementNotFound {
                selector: site.history_inputs.clone(),
                waited_ms: budget.timeout_ms(),
            });
        }

        for (index, date) in [from, to].into_iter().enumerate() {
            let js = script::set_nth_input_value(&site.history_inputs, index, &date.us());
            if self.ctx.execute_js(&js).await?.as_bool() != Some(true) {
                return Err(ScrapeError::ElementNotFound {
                    selector: format!("{}[{index}]", site.history_inputs),
                    waited_ms: 0,
                });
            }
        }

        let signature = script::signature(&site.history_table);
        let before = self
            .ctx
            .execute_js(&signature)
            .await?
            .as_str()
            .unwrap_or_default()
            .to_string();

        let clicked = self
            .ctx
            .execute_js(&script::click_button_with_text(&site.history_filter_label))
            .await?;
        if clicked.as_bool() != Some(true) {
            return Err(ScrapeError::ElementNotFound {
                selector: format!("button:contains({})", site.history_filter_label),
                waited_ms: 0,
            });
        }

        if wait_for_change(self.ctx.as_ref(), &signature, &before, budget)
            .await?
            .is_none()
        {
            tracing::warn!(
                "'{}' did not re-render after '{}'; reading it as it stands",
                site.history_table,
                site.history_filter_label
            );
        }

        wait_until(self.ctx.as_ref(), &script::element_present(&site.history_table), budget).await
    }

    async fn read_page(&mut self) -> ScrapeResult<RawPage> {
        extract::read_table(self.ctx.as_ref(), &self.site, &self.table_selector).await
    }

    async fn next_page(&mut self) -> ScrapeResult<bool> {
        extract::click_next(self.ctx.as_ref(), &self.site, &self.table_selector).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::process_day;
    use crate::store::OutputStore;
    use crate::wait::testing::ScriptedContext;
    use serde_json::json;
    use std::time::Duration;

    fn site() -> SiteConfig {
        SiteConfig {
            wait_timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(5),
            ..SiteConfig::default()
        }
    }

    #[tokio::test]
    async fn test_submit_range_fills_both_inputs() {
        let ctx = ScriptedContext::default()
            .on("charCodeAt", vec![json!("1:0"), json!("9:4")])
            .on(".length >= 2", vec![json!(true)])
            .on("el.value = ''", vec![json!(true)])
            .on("includes('Filter')", vec![json!(true)])
            .on("!== null", vec![json!(true)]);
        let mut source = BrowserSource::new(Box::new(ctx), site());

        let from = TradingDate::parse("2000-01-01").unwrap();
        let to = TradingDate::parse("2025-09-15").unwrap();
        assert!(source.submit_range(&from, &to).await.unwrap());
        assert_eq!(source.table_selector, "table");
    }

    #[tokio::test]
    async fn test_submit_range_without_inputs() {
        let ctx = ScriptedContext::default().on(".length >= 2", vec![json!(false)]);
        let mut source = BrowserSource::new(Box::new(ctx), site());
        let d = TradingDate::parse("2024-01-01").unwrap();
        let err = source.submit_range(&d, &d).await.unwrap_err();
        assert!(matches!(err, ScrapeError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_submit_range_unchanged_table_still_read() {
        let ctx = ScriptedContext::default()
            .on("charCodeAt", vec![json!("1:0")])
            .on(".length >= 2", vec![json!(true)])
            .on("el.value = ''", vec![json!(true)])
            .on("includes('Filter')", vec![json!(true)])
            .on("!== null", vec![json!(true)]);
        let mut source = BrowserSource::new(Box::new(ctx), site());
        let d = TradingDate::parse("2024-01-01").unwrap();
        assert!(source.submit_range(&d, &d).await.unwrap());
    }

    // Page 2 never renders after "Next": the day must fail and leave no file.
    #[tokio::test]
    async fn test_stuck_next_page_writes_no_file() {
        let ctx = ScriptedContext::default()
            .on("charCodeAt", vec![json!("1:0"), json!("5:1")])
            .on("toLowerCase", vec![json!(true)])
            .on("innerText", vec![json!(false)])
            .on("el.value = ''", vec![json!(true)])
            .on("offsetParent", vec![json!(true)])
            .on("el.click()", vec![json!(true)])
            .on("el.outerHTML : ''", vec![json!(ONE_ROW_TABLE)])
            .on("!== null", vec![json!(true)]);
        let mut source = BrowserSource::new(Box::new(ctx), site());

        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());
        let date = TradingDate::parse("2024-01-01").unwrap();

        let err = process_day(&mut source, &store, &date, 10).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Navigation(_)));
        assert!(!store.exists(&date));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    const ONE_ROW_TABLE: &str = "<table id=\"headFixed\">\
        <tr><th>S.No</th><th>Symbol</th><th>LTP</th></tr>\
        <tr><td>1</td><td>NABIL</td><td>1200</td></tr></table>";
}
