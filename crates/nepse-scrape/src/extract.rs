//! Table extraction: parse the rendered results table and follow "Next".

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use scraper::{Html, Selector};

use crate::config::SiteConfig;
use crate::renderer::RenderContext;
use crate::script;
use crate::source::DataSource;
use crate::types::{DayTable, RawPage, ScrapeError, ScrapeResult};
use crate::wait::{wait_for_change, wait_until};

/// Parse a `<table>` HTML fragment into rows of trimmed cell text.
///
/// Header (`th`) and data (`td`) cells are treated alike, in document order.
/// Rows without any cells are dropped.
pub fn parse_table(html: &str) -> RawPage {
    let document = Html::parse_fragment(html);
    let (Ok(row_sel), Ok(cell_sel)) = (Selector::parse("tr"), Selector::parse("th, td")) else {
        return Vec::new();
    };

    document
        .select(&row_sel)
        .map(|tr| {
            tr.select(&cell_sel)
                .map(|cell| element_text(&cell))
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

/// Wait for the table matching `selector` and parse the current page of it.
pub async fn read_table(
    ctx: &dyn RenderContext,
    site: &SiteConfig,
    selector: &str,
) -> ScrapeResult<RawPage> {
    let budget = site.wait_budget();
    if !wait_until(ctx, &script::element_present(selector), budget).await? {
        return Err(ScrapeError::TableNotFound {
            selector: selector.to_string(),
            waited_ms: budget.timeout_ms(),
        });
    }

    let html = ctx.execute_js(&script::outer_html(selector)).await?;
    let html = html.as_str().unwrap_or_default();
    Ok(parse_table(html))
}

/// Click the "Next" control if there is an enabled one.
///
/// Returns `Ok(false)` when there is no such control, which is how
/// pagination normally ends. A click after which the table never changes is
/// an error, so the day is retried on the next run instead of being saved
/// short.
pub async fn click_next(
    ctx: &dyn RenderContext,
    site: &SiteConfig,
    selector: &str,
) -> ScrapeResult<bool> {
    let signature = script::signature(selector);
    let before = ctx
        .execute_js(&signature)
        .await?
        .as_str()
        .unwrap_or_default()
        .to_string();

    let clicked = ctx.execute_js(&script::click_next(&site.next_label)).await?;
    if clicked.as_bool() != Some(true) {
        return Ok(false);
    }

    let budget = site.wait_budget();
    match wait_for_change(ctx, &signature, &before, budget).await? {
        Some(_) => Ok(true),
        None => Err(ScrapeError::Navigation(format!(
            "next page of '{selector}' did not render within {}ms after clicking '{}'",
            budget.timeout_ms(),
            site.next_label
        ))),
    }
}

/// Read every page of the current results into one table.
///
/// Stops normally when the source reports no further page or serves a page
/// identical to one already read. Fails with [`ScrapeError::PageLimit`] once
/// `max_pages` pages have been read and there is still a next page.
pub async fn extract_all_pages<S>(source: &mut S, max_pages: usize) -> ScrapeResult<DayTable>
where
    S: DataSource + ?Sized,
{
    let mut table = DayTable::new();
    let mut visited: HashSet<u64> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = source.read_page().await?;
        pages += 1;

        if !visited.insert(page_hash(&page)) {
            tracing::warn!("Page {pages} repeats an earlier page; stopping");
            break;
        }
        tracing::debug!("Page {pages}: {} rows", page.len());
        table.append(page);

        if !source.next_page().await? {
            break;
        }
        if pages >= max_pages {
            return Err(ScrapeError::PageLimit(max_pages));
        }
    }

    Ok(table)
}

fn page_hash(page: &RawPage) -> u64 {
    let mut hasher = DefaultHasher::new();
    page.hash(&mut hasher);
    hasher.finish()
}

/// Collect all text content of an element, trimmed and whitespace-collapsed.
fn element_text(el: &scraper::ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
