//! Page driving: the operations the enrollment flow performs on a live page.
//!
//! [`PageDriver`] is the seam between the flow logic and CDP so the flow can
//! be exercised against a scripted fake. [`CdpPage`] is the production
//! implementation backed by chromiumoxide.
//!
//! Angular Material renders the enrollment UI, so several targets are only
//! addressable by their visible text (dialog buttons, term options). CDP has
//! no text pseudo-selector; [`TextQuery`] lookups run injected JavaScript
//! that matches trimmed `innerText` within a CSS scope.

use std::{
    fmt,
    time::{Duration, Instant},
};

use {
    async_trait::async_trait,
    chromiumoxide::{
        Page, cdp::browser_protocol::page::CaptureScreenshotFormat, page::ScreenshotParams,
    },
    tracing::debug,
};

use crate::error::BrowserError;

/// Poll interval for visibility waits.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A locator for elements matched by visible text within a CSS scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    /// CSS selector bounding the candidate set.
    pub css: String,
    /// Text to match against each candidate's trimmed inner text.
    pub text: String,
    /// Exact match when true, substring match otherwise.
    pub exact: bool,
}

impl TextQuery {
    /// Match elements whose trimmed text equals `text`.
    pub fn exact(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: text.into(),
            exact: true,
        }
    }

    /// Match elements whose trimmed text contains `text`.
    pub fn contains(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: text.into(),
            exact: false,
        }
    }
}

impl fmt::Display for TextQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} in {}", self.text, self.css)
    }
}

/// Page operations the enrollment flow depends on.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url` and wait for the load to settle.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Reload the current page and wait for the load to settle.
    async fn reload(&self) -> Result<(), BrowserError>;

    /// Whether any element matching `css` is currently visible.
    async fn is_visible(&self, css: &str) -> Result<bool, BrowserError>;

    /// Whether `query` currently matches a visible element.
    async fn text_visible(&self, query: &TextQuery) -> Result<bool, BrowserError>;

    /// Wait until an element matching `css` is visible.
    async fn wait_visible(&self, css: &str) -> Result<(), BrowserError>;

    /// Wait until `query` matches a visible element.
    async fn wait_text_visible(&self, query: &TextQuery) -> Result<(), BrowserError>;

    /// Replace the value of the field matching `css` with `text`.
    async fn fill(&self, css: &str, text: &str) -> Result<(), BrowserError>;

    /// Click the first element matching `css`.
    async fn click(&self, css: &str) -> Result<(), BrowserError>;

    /// Click the first visible element matching `query`.
    async fn click_text(&self, query: &TextQuery) -> Result<(), BrowserError>;

    /// Checked state of every element matching `css`, in document order.
    async fn checkbox_states(&self, css: &str) -> Result<Vec<bool>, BrowserError>;

    /// Click the `index`-th element matching `css` (document order).
    async fn click_nth(&self, css: &str, index: usize) -> Result<(), BrowserError>;

    /// Capture a PNG screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;
}

/// JavaScript template: `(css)` -> true when any match is visible.
const SELECTOR_VISIBLE_JS: &str = r#"
((css) => {
    function isVisible(el) {
        const rect = el.getBoundingClientRect();
        const style = getComputedStyle(el);
        return (
            rect.width > 0 &&
            rect.height > 0 &&
            style.visibility !== 'hidden' &&
            style.display !== 'none' &&
            parseFloat(style.opacity) > 0
        );
    }

    for (const el of document.querySelectorAll(css)) {
        if (isVisible(el)) return true;
    }
    return false;
})
"#;

/// JavaScript template: `(css, text, exact)` -> true when a visible match
/// has matching trimmed text.
const TEXT_VISIBLE_JS: &str = r#"
((css, text, exact) => {
    function isVisible(el) {
        const rect = el.getBoundingClientRect();
        const style = getComputedStyle(el);
        return (
            rect.width > 0 &&
            rect.height > 0 &&
            style.visibility !== 'hidden' &&
            style.display !== 'none' &&
            parseFloat(style.opacity) > 0
        );
    }

    function matches(el) {
        const t = (el.innerText || el.textContent || '').trim();
        return exact ? t === text : t.includes(text);
    }

    for (const el of document.querySelectorAll(css)) {
        if (matches(el) && isVisible(el)) return true;
    }
    return false;
})
"#;

/// JavaScript template: `(css, text, exact)` -> click the first visible
/// match with matching trimmed text, returning whether one was found.
const CLICK_TEXT_JS: &str = r#"
((css, text, exact) => {
    function isVisible(el) {
        const rect = el.getBoundingClientRect();
        const style = getComputedStyle(el);
        return (
            rect.width > 0 &&
            rect.height > 0 &&
            style.visibility !== 'hidden' &&
            style.display !== 'none' &&
            parseFloat(style.opacity) > 0
        );
    }

    function matches(el) {
        const t = (el.innerText || el.textContent || '').trim();
        return exact ? t === text : t.includes(text);
    }

    for (const el of document.querySelectorAll(css)) {
        if (matches(el) && isVisible(el)) {
            el.scrollIntoView({ behavior: 'instant', block: 'center' });
            el.click();
            return true;
        }
    }
    return false;
})
"#;

/// JavaScript template: `(css)` -> checked state of every match.
const CHECKBOX_STATES_JS: &str =
    "((css) => Array.from(document.querySelectorAll(css)).map((el) => !!el.checked))";

/// JavaScript template: `(css)` -> clear the first match's value, returning
/// whether the field exists. Fires input/change so framework bindings see
/// the reset.
const CLEAR_FIELD_JS: &str = r#"
((css) => {
    const el = document.querySelector(css);
    if (!el) return false;
    if (el.value !== undefined && el.value !== '') {
        el.value = '';
        el.dispatchEvent(new Event('input', { bubbles: true }));
        el.dispatchEvent(new Event('change', { bubbles: true }));
    }
    return true;
})
"#;

/// Build a call expression invoking a `(css)` template.
fn selector_call(template: &str, css: &str) -> Result<String, BrowserError> {
    let css = encode_js_string(css)?;
    Ok(format!("({template})({css})"))
}

/// Build a call expression invoking a `(css, text, exact)` template.
fn text_call(template: &str, query: &TextQuery) -> Result<String, BrowserError> {
    let css = encode_js_string(&query.css)?;
    let text = encode_js_string(&query.text)?;
    Ok(format!("({template})({css}, {text}, {})", query.exact))
}

/// Encode a Rust string as a JavaScript string literal.
fn encode_js_string(s: &str) -> Result<String, BrowserError> {
    serde_json::to_string(s).map_err(|e| BrowserError::JsEvalFailed(e.to_string()))
}

/// Live page backed by chromiumoxide.
pub struct CdpPage {
    page: Page,
    timeout: Duration,
}

impl CdpPage {
    pub fn new(page: Page, timeout: Duration) -> Self {
        Self { page, timeout }
    }

    async fn eval_bool(&self, js: &str) -> Result<bool, BrowserError> {
        Ok(self
            .page
            .evaluate(js)
            .await
            .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?
            .into_value()
            .unwrap_or(false))
    }

    async fn wait_until_true(&self, js: &str, what: &str) -> Result<(), BrowserError> {
        let deadline = Instant::now() + self.timeout;

        while Instant::now() < deadline {
            if self.eval_bool(js).await? {
                debug!(what, "target visible");
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        Err(BrowserError::Timeout(format!(
            "{what} not visible after {}s",
            self.timeout.as_secs()
        )))
    }
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
        let _ = self.page.wait_for_navigation().await;
        debug!(url, "navigated");
        Ok(())
    }

    async fn reload(&self) -> Result<(), BrowserError> {
        self.page
            .reload()
            .await
            .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
        let _ = self.page.wait_for_navigation().await;
        debug!("reloaded page");
        Ok(())
    }

    async fn is_visible(&self, css: &str) -> Result<bool, BrowserError> {
        let js = selector_call(SELECTOR_VISIBLE_JS, css)?;
        self.eval_bool(&js).await
    }

    async fn text_visible(&self, query: &TextQuery) -> Result<bool, BrowserError> {
        let js = text_call(TEXT_VISIBLE_JS, query)?;
        self.eval_bool(&js).await
    }

    async fn wait_visible(&self, css: &str) -> Result<(), BrowserError> {
        let js = selector_call(SELECTOR_VISIBLE_JS, css)?;
        self.wait_until_true(&js, css).await
    }

    async fn wait_text_visible(&self, query: &TextQuery) -> Result<(), BrowserError> {
        let js = text_call(TEXT_VISIBLE_JS, query)?;
        self.wait_until_true(&js, &query.to_string()).await
    }

    async fn fill(&self, css: &str, text: &str) -> Result<(), BrowserError> {
        // Typing appends, so any pre-populated value (autofill from the
        // persistent profile) has to go first.
        let js = selector_call(CLEAR_FIELD_JS, css)?;
        if !self.eval_bool(&js).await? {
            return Err(BrowserError::ElementNotFound(css.to_string()));
        }
        self.page
            .find_element(css)
            .await
            .map_err(|_| BrowserError::ElementNotFound(css.to_string()))?
            .click()
            .await?
            .type_str(text)
            .await?;
        debug!(css, "filled field");
        Ok(())
    }

    async fn click(&self, css: &str) -> Result<(), BrowserError> {
        self.page
            .find_element(css)
            .await
            .map_err(|_| BrowserError::ElementNotFound(css.to_string()))?
            .click()
            .await?;
        debug!(css, "clicked element");
        Ok(())
    }

    async fn click_text(&self, query: &TextQuery) -> Result<(), BrowserError> {
        let js = text_call(CLICK_TEXT_JS, query)?;
        if !self.eval_bool(&js).await? {
            return Err(BrowserError::ElementNotFound(query.to_string()));
        }
        debug!(query = %query, "clicked element by text");
        Ok(())
    }

    async fn checkbox_states(&self, css: &str) -> Result<Vec<bool>, BrowserError> {
        let js = selector_call(CHECKBOX_STATES_JS, css)?;
        self.page
            .evaluate(js.as_str())
            .await
            .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::JsEvalFailed(format!("{e:?}")))
    }

    async fn click_nth(&self, css: &str, index: usize) -> Result<(), BrowserError> {
        let elements = self
            .page
            .find_elements(css)
            .await
            .map_err(|_| BrowserError::ElementNotFound(css.to_string()))?;
        let element = elements
            .into_iter()
            .nth(index)
            .ok_or_else(|| BrowserError::ElementNotFound(format!("{css} (index {index})")))?;
        element.click().await?;
        debug!(css, index, "clicked element");
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        self.page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await
            .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))
    }
}
