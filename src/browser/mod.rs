use crate::error::ScrapeError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

mod chrome;

pub use chrome::{ChromeDriver, ChromeSession, PrintSettings};

/// A live, rendered page driven by a browser automation backend.
///
/// Everything the scraper does to a page goes through this trait so the
/// control flow can run against a scripted fake in tests.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to `url`
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// Run a script in the page; `arguments[i]` in the script maps to `args[i]`
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, ScrapeError>;

    /// Serialized DOM of the current document
    async fn source(&self) -> Result<String, ScrapeError>;

    /// Number of elements matching a CSS selector
    async fn count(&self, selector: &str) -> Result<usize, ScrapeError>;

    /// `innerHTML` of the first match, `None` if nothing matches
    async fn inner_html(&self, selector: &str) -> Result<Option<String>, ScrapeError>;

    /// Values of `attribute` for every match, in document order
    async fn attributes(&self, selector: &str, attribute: &str)
        -> Result<Vec<String>, ScrapeError>;

    /// Click the first match. Returns `false` when nothing matches.
    async fn click(&self, selector: &str) -> Result<bool, ScrapeError>;

    async fn scroll_to_bottom(&self) -> Result<(), ScrapeError>;

    /// Poll `document.readyState` until it is `complete` or `timeout` elapses
    async fn wait_until_ready(&self, timeout: Duration) -> Result<(), ScrapeError>;
}

pub(crate) const COUNT_SCRIPT: &str = "return document.querySelectorAll(arguments[0]).length;";

pub(crate) const INNER_HTML_SCRIPT: &str = r#"
const el = document.querySelector(arguments[0]);
return el ? el.innerHTML : null;
"#;

pub(crate) const ATTRIBUTES_SCRIPT: &str = r#"
// Prefer the resolved property (absolute href/src) over the raw attribute
return Array.from(document.querySelectorAll(arguments[0])).map(el => {
    const prop = el[arguments[1]];
    if (typeof prop === "string" && prop !== "") return prop;
    return el.getAttribute(arguments[1]) || "";
});
"#;

pub(crate) const CLICK_SCRIPT: &str = r#"
const el = document.querySelector(arguments[0]);
if (!el) return false;
el.click();
return true;
"#;

pub(crate) const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

pub(crate) const READY_STATE_SCRIPT: &str = "return document.readyState;";
