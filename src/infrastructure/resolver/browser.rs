//! Headless Chromium resolver.
//!
//! Every call launches its own browser process and tears it down before
//! returning, whatever happened in between. Frame navigations are recorded
//! through the CDP `Page.frameNavigated` event, so client-side redirects
//! (meta refresh, `location.href`) show up in the chain as well.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::EventFrameNavigated;
use chromiumoxide::error::CdpError;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::{FutureExt, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::domain::entities::Resolution;
use crate::domain::entities::resolution::push_unique;
use crate::domain::providers::{ResolveOptions, UrlResolver};

pub const DEFAULT_SETTLE: Duration = Duration::from_millis(3000);

/// Resolves the wait budget even when the page never goes idle.
const NETWORK_IDLE_SCRIPT: &str = r#"
(async () => {
    const idleMs = 500;
    const interval = 100;
    let lastCount = -1;
    let stableMs = 0;
    for (;;) {
        await new Promise(r => setTimeout(r, interval));
        let count = lastCount;
        try { count = performance.getEntriesByType('resource').length; } catch (_) {}
        if (document.readyState === 'complete' && count === lastCount) {
            stableMs += interval;
            if (stableMs >= idleMs) return true;
        } else {
            stableMs = 0;
        }
        lastCount = count;
    }
})()
"#;

static LAUNCH_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("browser protocol error: {0}")]
    Protocol(#[from] CdpError),
}

/// Interactive resolver driving a headless Chromium over CDP.
#[derive(Debug, Clone)]
pub struct BrowserResolver {
    chrome_executable: Option<PathBuf>,
    settle: Duration,
}

impl Default for BrowserResolver {
    fn default() -> Self {
        Self::new(None, DEFAULT_SETTLE)
    }
}

impl BrowserResolver {
    pub fn new(chrome_executable: Option<PathBuf>, settle: Duration) -> Self {
        Self {
            chrome_executable,
            settle,
        }
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir)
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }

    /// Runs one resolution in `profile_dir` and removes the directory
    /// afterwards, whether or not the browser ever started.
    async fn run(
        &self,
        profile_dir: &Path,
        url: &str,
        options: &ResolveOptions,
    ) -> Result<Resolution, BrowserError> {
        let result = self.launch_and_visit(profile_dir, url, options).await;
        remove_profile(profile_dir).await;
        result
    }

    async fn launch_and_visit(
        &self,
        profile_dir: &Path,
        url: &str,
        options: &ResolveOptions,
    ) -> Result<Resolution, BrowserError> {
        let config = self.browser_config(profile_dir)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = self.visit(&browser, url, options).await;

        if let Err(e) = browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }

    async fn visit(
        &self,
        browser: &Browser,
        url: &str,
        options: &ResolveOptions,
    ) -> Result<Resolution, BrowserError> {
        let page = browser.new_page("about:blank").await?;
        let mut navigations = page.event_listener::<EventFrameNavigated>().await?;
        let mut chain = Vec::new();

        let budget = Duration::from_secs(options.wait_seconds);
        let deadline = Instant::now() + budget;

        let nav = match tokio::time::timeout(budget, page.goto(url)).await {
            Ok(Ok(_)) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if tokio::time::timeout(remaining, page.evaluate(NETWORK_IDLE_SCRIPT.to_string()))
                    .await
                    .is_err()
                {
                    tracing::debug!(url = %url, "Network never went idle within the wait budget");
                }
                NavOutcome::Loaded
            }
            Ok(Err(e)) => {
                tracing::debug!(url = %url, "Navigation error: {}", e);
                NavOutcome::Failed(e.to_string())
            }
            Err(_) => {
                tracing::debug!(
                    url = %url,
                    wait_seconds = options.wait_seconds,
                    "Navigation timed out, continuing with reached state"
                );
                NavOutcome::TimedOut
            }
        };

        drain_navigations(&mut navigations, &mut chain);

        let clicked = if nav.made_progress(&chain) {
            self.probe_buttons(&page, &options.click_texts).await
        } else {
            false
        };

        drain_navigations(&mut navigations, &mut chain);
        let current = page.url().await.ok().flatten();

        settle(url, nav, chain, current).map(|r| r.with_cta_clicked(clicked))
    }

    /// Clicks the first element matching one of `texts`, in order.
    ///
    /// At most one click per page; failures are swallowed.
    async fn probe_buttons(&self, page: &Page, texts: &[String]) -> bool {
        for text in texts {
            let Ok(needle) = serde_json::to_string(text) else {
                continue;
            };

            match page.evaluate(click_script(&needle)).await {
                Ok(result) => {
                    if result.into_value::<bool>().unwrap_or(false) {
                        tracing::debug!(text = %text, "Clicked call-to-action");
                        tokio::time::sleep(self.settle).await;
                        return true;
                    }
                }
                Err(e) => tracing::debug!(text = %text, "Click probe failed: {}", e),
            }
        }

        false
    }
}

#[async_trait]
impl UrlResolver for BrowserResolver {
    async fn resolve(&self, url: &str, options: &ResolveOptions) -> Resolution {
        match self.run(&next_profile_dir(), url, options).await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!(source_url = %url, "Browser resolution fell back to source: {}", e);
                Resolution::failed(url, e.to_string())
            }
        }
    }
}

/// How the initial navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NavOutcome {
    Loaded,
    /// The wait budget ran out; whatever was reached still counts.
    TimedOut,
    Failed(String),
}

impl NavOutcome {
    /// A failed navigation counts only if some frame was reached before it.
    fn made_progress(&self, chain: &[String]) -> bool {
        !matches!(self, NavOutcome::Failed(_)) || !chain.is_empty()
    }
}

/// Turns the navigation outcome and the observed frames into a resolution.
///
/// The final URL is the page's current URL when it is a web URL, otherwise
/// the last navigated frame, otherwise the source itself.
fn settle(
    source: &str,
    nav: NavOutcome,
    chain: Vec<String>,
    current: Option<String>,
) -> Result<Resolution, BrowserError> {
    if let NavOutcome::Failed(error) = nav {
        if chain.is_empty() {
            return Err(BrowserError::Navigation(error));
        }
    }

    let final_url = match current {
        Some(current) if is_web_url(&current) => current,
        _ => chain.last().cloned().unwrap_or_else(|| source.to_string()),
    };

    Ok(Resolution::reached(source, &final_url, chain))
}

fn next_profile_dir() -> PathBuf {
    std::env::temp_dir().join(format!(
        "mirror-collector-{}-{}",
        std::process::id(),
        LAUNCH_SEQ.fetch_add(1, Ordering::Relaxed)
    ))
}

async fn remove_profile(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::debug!(dir = %dir.display(), "Profile cleanup failed: {}", e),
    }
}

/// Moves already-delivered navigation events into `chain` without waiting.
fn drain_navigations(events: &mut EventStream<EventFrameNavigated>, chain: &mut Vec<String>) {
    while let Some(Some(event)) = events.next().now_or_never() {
        if is_web_url(&event.frame.url) {
            push_unique(chain, &event.frame.url);
        }
    }
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Finds the innermost visible clickable element whose text contains the
/// (JSON-encoded) needle, case-insensitively, and clicks it.
fn click_script(needle_json: &str) -> String {
    format!(
        r#"
(() => {{
    const needle = {needle_json}.trim().toLowerCase();
    if (!needle) return false;
    const textOf = el => (el.innerText || el.value || el.textContent || '').replace(/\s+/g, ' ').trim().toLowerCase();
    const visible = el => !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
    const preferred = 'button, a, [role="button"], input[type="submit"], input[type="button"], label';
    let candidates = Array.from(document.querySelectorAll(preferred));
    let match = candidates.find(el => visible(el) && textOf(el).includes(needle));
    if (!match) {{
        candidates = Array.from(document.querySelectorAll('body *'))
            .filter(el => visible(el) && textOf(el).includes(needle));
        match = candidates.find(el => !Array.from(el.children).some(c => textOf(c).includes(needle)));
    }}
    if (!match) return false;
    match.click();
    return true;
}})()
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("https://stake.com/"));
        assert!(is_web_url("http://bit.ly/x"));
        assert!(!is_web_url("about:blank"));
        assert!(!is_web_url("chrome-error://chromewebdata/"));
    }

    #[test]
    fn test_click_script_embeds_escaped_needle() {
        let needle = serde_json::to_string("I \"agree\"").unwrap();
        let script = click_script(&needle);
        assert!(script.contains(r#"const needle = "I \"agree\"".trim()"#));
    }

    #[tokio::test]
    async fn test_missing_browser_binary_falls_back() {
        let resolver = BrowserResolver::new(
            Some(PathBuf::from("/nonexistent/chromium")),
            Duration::from_millis(10),
        );
        let r = resolver
            .resolve("https://stake.com/", &ResolveOptions::default())
            .await;

        assert!(!r.ok);
        assert_eq!(r.final_url, "https://stake.com/");
        assert_eq!(r.redirect_chain, vec!["https://stake.com/".to_string()]);
        assert!(!r.cta_clicked);
    }

    fn chain(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_timeout_after_redirects_keeps_reached_page() {
        let r = settle(
            "http://bit.ly/abc",
            NavOutcome::TimedOut,
            chain(&["http://bit.ly/abc", "https://stake.com/in"]),
            Some("https://stake.com/in".to_string()),
        )
        .unwrap();

        assert!(r.ok);
        assert!(r.error.is_none());
        assert_eq!(r.final_url, "https://stake.com/in");
        assert_eq!(r.final_domain, "stake.com");
        assert!(r.is_redirector);
        assert_eq!(r.redirect_chain.len(), 2);
    }

    #[test]
    fn test_blank_current_page_falls_back_to_last_frame() {
        let r = settle(
            "http://bit.ly/abc",
            NavOutcome::TimedOut,
            chain(&["http://bit.ly/abc", "https://stake.com/in"]),
            Some("about:blank".to_string()),
        )
        .unwrap();

        assert_eq!(r.final_url, "https://stake.com/in");
    }

    #[test]
    fn test_failed_navigation_after_partial_progress_succeeds() {
        let r = settle(
            "http://bit.ly/abc",
            NavOutcome::Failed("net::ERR_CONNECTION_RESET".to_string()),
            chain(&["http://bit.ly/abc", "https://stake-go.example/"]),
            Some("chrome-error://chromewebdata/".to_string()),
        )
        .unwrap();

        assert!(r.ok);
        assert_eq!(r.final_url, "https://stake-go.example/");
    }

    #[test]
    fn test_failed_navigation_without_frames_is_an_error() {
        let result = settle(
            "http://bit.ly/abc",
            NavOutcome::Failed("net::ERR_NAME_NOT_RESOLVED".to_string()),
            Vec::new(),
            Some("about:blank".to_string()),
        );

        assert!(matches!(result, Err(BrowserError::Navigation(e)) if e.contains("NAME_NOT_RESOLVED")));
    }

    #[test]
    fn test_no_frames_and_no_page_url_resolve_to_source() {
        let r = settle("https://stake.com/", NavOutcome::Loaded, Vec::new(), None).unwrap();

        assert_eq!(r.final_url, "https://stake.com/");
        assert_eq!(r.redirect_chain, vec!["https://stake.com/".to_string()]);
        assert!(!r.is_redirector);
    }

    #[tokio::test]
    async fn test_launch_failure_removes_profile_dir() {
        let dir = std::env::temp_dir().join(format!(
            "mirror-collector-launch-failure-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        let resolver = BrowserResolver::new(
            Some(PathBuf::from("/nonexistent/chromium")),
            Duration::from_millis(10),
        );
        let result = resolver
            .run(&dir, "https://stake.com/", &ResolveOptions::default())
            .await;

        assert!(result.is_err());
        assert!(!dir.exists());
    }
}
