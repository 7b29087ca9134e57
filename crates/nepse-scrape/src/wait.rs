//! Condition-based waits.
//!
//! Every pause in the pipeline polls a DOM condition until it holds or a
//! deadline passes. There are no fixed sleeps.

use std::time::Duration;

use tokio::time::Instant;

use crate::renderer::RenderContext;
use crate::types::ScrapeResult;

/// How long to keep polling and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBudget {
    pub timeout: Duration,
    pub poll: Duration,
}

impl WaitBudget {
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Poll `script` until it evaluates to `true`.
///
/// Returns `Ok(false)` if the deadline passes first. Script errors while the
/// page is still settling count as "not yet".
pub async fn wait_until(
    ctx: &dyn RenderContext,
    script: &str,
    budget: WaitBudget,
) -> ScrapeResult<bool> {
    let deadline = Instant::now() + budget.timeout;
    loop {
        match ctx.execute_js(script).await {
            Ok(v) if v.as_bool() == Some(true) => return Ok(true),
            Ok(_) => {}
            Err(e) => tracing::trace!("wait condition not ready: {e}"),
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(budget.poll).await;
    }
}

/// Poll a string-valued `script` until it returns something non-empty and
/// different from `previous`. Returns the new value, or `None` on timeout.
pub async fn wait_for_change(
    ctx: &dyn RenderContext,
    script: &str,
    previous: &str,
    budget: WaitBudget,
) -> ScrapeResult<Option<String>> {
    let deadline = Instant::now() + budget.timeout;
    loop {
        if let Ok(v) = ctx.execute_js(script).await {
            if let Some(s) = v.as_str() {
                if !s.is_empty() && s != previous {
                    return Ok(Some(s.to_string()));
                }
            }
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(budget.poll).await;
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedContext;
    use super::*;
    use serde_json::json;

    fn quick() -> WaitBudget {
        WaitBudget::new(Duration::from_millis(200), Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_wait_until_eventually_true() {
        let ctx = ScriptedContext::default().on("ready", vec![json!(false), json!(false), json!(true)]);
        assert!(wait_until(&ctx, "ready", quick()).await.unwrap());
        assert_eq!(ctx.calls_containing("ready"), 3);
    }

    #[tokio::test]
    async fn test_wait_until_times_out() {
        let ctx = ScriptedContext::default().on("ready", vec![json!(false)]);
        assert!(!wait_until(&ctx, "ready", quick()).await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_until_tolerates_script_errors() {
        let ctx = ScriptedContext::default();
        assert!(!wait_until(&ctx, "missing", quick()).await.unwrap());
    }

    #[tokio::test]
    async fn test_wait_for_change() {
        let ctx = ScriptedContext::default().on("sig", vec![json!("1:1"), json!(""), json!("2:9")]);
        let got = wait_for_change(&ctx, "sig", "1:1", quick()).await.unwrap();
        assert_eq!(got.as_deref(), Some("2:9"));

        let same = ScriptedContext::default().on("sig", vec![json!("1:1")]);
        assert_eq!(wait_for_change(&same, "sig", "1:1", quick()).await.unwrap(), None);
    }
}
