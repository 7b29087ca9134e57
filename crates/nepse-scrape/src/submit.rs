//! Search submission: open the share price page, set the date, submit.

use tokio::time::Instant;

use crate::config::SiteConfig;
use crate::renderer::RenderContext;
use crate::script;
use crate::types::{ScrapeError, ScrapeResult, TradingDate};
use crate::wait::{wait_until, WaitBudget};

/// Submit the date search for `date`.
///
/// Returns `Ok(false)` when the site answers with its "no matching data"
/// message. Any other answer counts as success; whether a table actually
/// rendered is checked when the table is read.
pub async fn submit(
    ctx: &mut dyn RenderContext,
    site: &SiteConfig,
    date: &TradingDate,
) -> ScrapeResult<bool> {
    let budget = site.wait_budget();
    let load_timeout = ctx.page_load_timeout();

    ctx.navigate(&site.search_url, load_timeout).await?;

    if !wait_until(ctx, &script::element_present(&site.date_input), budget).await? {
        return Err(ScrapeError::ElementNotFound {
            selector: site.date_input.clone(),
            waited_ms: budget.timeout_ms(),
        });
    }

    let set = ctx
        .execute_js(&script::set_input_value(&site.date_input, &date.iso()))
        .await?;
    if set.as_bool() != Some(true) {
        return Err(ScrapeError::ElementNotFound {
            selector: site.date_input.clone(),
            waited_ms: 0,
        });
    }

    if !wait_until(ctx, &script::element_hidden(&site.datepicker_overlay), budget).await? {
        tracing::warn!("Date picker still visible for {date}; submitting anyway");
    }

    let before = current_signature(ctx, &site.results_table).await;

    let clicked = ctx.execute_js(&script::click(&site.submit_button)).await?;
    if clicked.as_bool() != Some(true) {
        return Err(ScrapeError::ElementNotFound {
            selector: site.submit_button.clone(),
            waited_ms: 0,
        });
    }

    let has_data = await_outcome(ctx, site, &before, budget).await?;
    if !has_data {
        tracing::debug!("No data marker shown for {date}");
    }
    Ok(has_data)
}

/// Wait until the results table re-renders or the no-data marker appears.
///
/// The table left over from the initial page load is already present, so
/// success means its fingerprint changed. If neither happens in time the
/// search is still treated as having results.
async fn await_outcome(
    ctx: &dyn RenderContext,
    site: &SiteConfig,
    before: &str,
    budget: WaitBudget,
) -> ScrapeResult<bool> {
    let marker = script::body_contains(&site.no_data_marker);
    let deadline = Instant::now() + budget.timeout;

    loop {
        if ctx.execute_js(&marker).await.ok().and_then(|v| v.as_bool()) == Some(true) {
            return Ok(false);
        }
        let now = current_signature(ctx, &site.results_table).await;
        if !now.is_empty() && now != before {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            tracing::warn!(
                "Results table '{}' unchanged {}ms after submit; reading it as it stands",
                site.results_table,
                budget.timeout_ms()
            );
            return Ok(true);
        }
        tokio::time::sleep(budget.poll).await;
    }
}

async fn current_signature(ctx: &dyn RenderContext, selector: &str) -> String {
    ctx.execute_js(&script::signature(selector))
        .await
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
