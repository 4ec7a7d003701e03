//! Browser session management over the Chrome DevTools Protocol
//!
//! One [`Session`] owns the whole chain: browser process, CDP event
//! handler task, and the single page the scenario drives. The session is
//! exclusively owned by one runner, so no locking is needed; teardown is
//! an explicit [`Session::close`] that the runner calls on both the
//! success and the failure path.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType,
};
use chromiumoxide::Element;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::common::{Error, Result};

use super::selector::Selector;

/// How long to wait for a selector to resolve to exactly one element
const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a navigation-gated step may take before failing
const DEFAULT_NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between selector resolution attempts
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Session launch options
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run the browser without a visible window
    pub headless: bool,
    /// Per-action wait budget for selectors to become resolvable
    pub action_timeout: Duration,
    /// Wait budget for navigation-gated steps
    pub nav_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
            nav_timeout: DEFAULT_NAV_TIMEOUT,
        }
    }
}

/// A live browser session driving one page
pub struct Session {
    browser: Browser,
    page: chromiumoxide::Page,
    handler_task: JoinHandle<()>,
    config: SessionConfig,
}

impl Session {
    /// Launch a browser process and open a blank page
    pub async fn launch(config: SessionConfig) -> Result<Session> {
        let mut builder = BrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(Error::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        // The handler stream must be drained or the CDP connection stalls.
        let handler_task = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        debug!(headless = config.headless, "browser session launched");

        Ok(Session {
            browser,
            page,
            handler_task,
            config,
        })
    }

    /// Navigate the page and wait for the load to settle
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "goto");
        self.page.goto(url).await?;
        self.wait_for_navigation(None).await
    }

    /// Click the single element the selector resolves to
    pub async fn click(&self, selector: &Selector) -> Result<()> {
        debug!(%selector, "click");
        let element = self.resolve(selector).await?;
        element.click().await?;
        Ok(())
    }

    /// Clear an editable field and type the literal text into it
    pub async fn fill(&self, selector: &Selector, text: &str) -> Result<()> {
        debug!(%selector, chars = text.len(), "fill");
        let element = self.resolve(selector).await?;

        let editable: bool = self.eval(&editable_check_js()).await?;
        if !editable {
            return Err(Error::EditableTargetRequired {
                selector: selector.to_string(),
            });
        }

        // Click to focus, clear the previous content, then type so the
        // page sees real input events.
        element.click().await?;
        self.eval::<bool>(&clear_field_js()).await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// Set a `<select>` control's chosen value by option value
    pub async fn select_option(&self, selector: &Selector, value: &str) -> Result<()> {
        debug!(%selector, value, "select_option");
        self.resolve(selector).await?;

        let outcome: String = self.eval(&select_option_js(value)).await?;
        match outcome.as_str() {
            "ok" => Ok(()),
            "no-option" => Err(Error::OptionValueNotFound {
                selector: selector.to_string(),
                value: value.to_string(),
            }),
            // Anything that is not a <select> cannot take an option value.
            _ => Err(Error::EditableTargetRequired {
                selector: selector.to_string(),
            }),
        }
    }

    /// Send a single keyboard key event to the resolved element
    pub async fn press(&self, selector: &Selector, key: &str) -> Result<()> {
        debug!(%selector, key, "press");
        let element = self.resolve(selector).await?;
        element.focus().await?;

        for event_type in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let mut params = DispatchKeyEventParams::builder()
                .r#type(event_type)
                .key(key);
            // Named keys only perform their editing command when the key
            // codes are set on the event.
            if let Some((code, vk)) = key_codes(key) {
                params = params.code(code).windows_virtual_key_code(vk);
            }
            let event = params.build().map_err(Error::Browser)?;
            self.page.execute(event).await?;
        }
        Ok(())
    }

    /// Block until the current navigation settles
    ///
    /// Used standalone and after navigation-gated clicks; without this a
    /// race lets the next selector lookup run against the pre-navigation
    /// DOM.
    pub async fn wait_for_navigation(&self, timeout: Option<Duration>) -> Result<()> {
        let timeout = timeout.unwrap_or(self.config.nav_timeout);
        debug!(timeout_secs = timeout.as_secs(), "wait_for_navigation");
        tokio::time::timeout(timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| Error::NavigationTimeout(timeout.as_secs()))??;
        Ok(())
    }

    /// Current page URL
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// Close the page and browser, releasing the child process
    ///
    /// Must complete even when the last step failed or timed out.
    pub async fn close(self) -> Result<()> {
        let Session {
            mut browser,
            page,
            handler_task,
            ..
        } = self;

        // Teardown in reverse order of creation: page, then browser.
        drop(page);
        if let Err(e) = browser.close().await {
            warn!("browser close failed: {}", e);
        }
        if tokio::time::timeout(Duration::from_secs(5), browser.wait())
            .await
            .is_err()
        {
            warn!("browser process did not exit in time");
        }
        handler_task.abort();
        debug!("browser session closed");
        Ok(())
    }

    /// Resolve a selector to exactly one element
    ///
    /// Polls until a single match exists or the action timeout expires.
    /// Zero matches at the deadline is `ElementNotFound`; more than one
    /// match fails immediately as `AmbiguousSelector` rather than silently
    /// acting on the first.
    async fn resolve(&self, selector: &Selector) -> Result<Element> {
        let deadline = Instant::now() + self.config.action_timeout;
        let js = selector.resolution_js();

        loop {
            let count: i64 = self.eval(&js).await?;
            match decide_match(count) {
                MatchDecision::Use => {
                    return self
                        .page
                        .find_element(Selector::marked_query())
                        .await
                        .map_err(Error::from);
                }
                MatchDecision::Poll => {
                    if Instant::now() >= deadline {
                        return Err(Error::element_not_found(
                            &selector.to_string(),
                            self.config.action_timeout.as_secs(),
                        ));
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                MatchDecision::Invalid => {
                    return Err(Error::InvalidSelector(selector.to_string()));
                }
                MatchDecision::Ambiguous(count) => {
                    return Err(Error::ambiguous_selector(&selector.to_string(), count));
                }
            }
        }
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: &str) -> Result<T> {
        self.page
            .evaluate(js.to_string())
            .await?
            .into_value::<T>()
            .map_err(|e| Error::Browser(e.to_string()))
    }
}

/// DOM `code` and Windows virtual key code for the named keys scenarios use
fn key_codes(key: &str) -> Option<(&'static str, i64)> {
    Some(match key {
        "Backspace" => ("Backspace", 8),
        "Tab" => ("Tab", 9),
        "Enter" => ("Enter", 13),
        "Escape" => ("Escape", 27),
        "PageUp" => ("PageUp", 33),
        "PageDown" => ("PageDown", 34),
        "End" => ("End", 35),
        "Home" => ("Home", 36),
        "ArrowLeft" => ("ArrowLeft", 37),
        "ArrowUp" => ("ArrowUp", 38),
        "ArrowRight" => ("ArrowRight", 39),
        "ArrowDown" => ("ArrowDown", 40),
        "Delete" => ("Delete", 46),
        _ => return None,
    })
}

/// Per-attempt decision from the resolution script's match count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchDecision {
    /// Exactly one match: fetch the marked element
    Use,
    /// No match yet: poll again until the deadline
    Poll,
    /// Malformed CSS expression: fail without waiting
    Invalid,
    /// Several matches: fail without waiting, never fall back to the first
    Ambiguous(usize),
}

fn decide_match(count: i64) -> MatchDecision {
    match count {
        0 => MatchDecision::Poll,
        1 => MatchDecision::Use,
        n if n > 1 => MatchDecision::Ambiguous(n as usize),
        _ => MatchDecision::Invalid,
    }
}

/// JS predicate: is the marked element an editable field
fn editable_check_js() -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector('[{mark}]');
    if (!el) return false;
    const tag = el.tagName;
    return tag === 'INPUT' || tag === 'TEXTAREA' || el.isContentEditable;
}})()"#,
        mark = super::selector::MARK_ATTR,
    )
}

/// JS statement: clear the marked field and notify the page
fn clear_field_js() -> String {
    format!(
        r#"(() => {{
    const el = document.querySelector('[{mark}]');
    if (!el) return false;
    if ('value' in el) {{
        el.value = '';
    }} else {{
        el.textContent = '';
    }}
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    return true;
}})()"#,
        mark = super::selector::MARK_ATTR,
    )
}

/// JS statement: set the marked `<select>` to the given option value
fn select_option_js(value: &str) -> String {
    let value_lit = serde_json::to_string(value).unwrap_or_else(|_| "\"\"".into());
    format!(
        r#"(() => {{
    const el = document.querySelector('[{mark}]');
    if (!el || el.tagName !== 'SELECT') return 'not-select';
    const value = {value_lit};
    const option = Array.from(el.options).find(o => o.value === value);
    if (!option) return 'no-option';
    el.value = option.value;
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return 'ok';
}})()"#,
        mark = super::selector::MARK_ATTR,
        value_lit = value_lit,
    )
}
