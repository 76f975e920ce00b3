#![allow(dead_code)]

use async_trait::async_trait;
use cookidump::browser::Page;
use cookidump::cleanup::RECIPE_IMAGE;
use cookidump::pagination::{LOAD_MORE, RESULT_COUNT, RESULT_ITEMS};
use cookidump::ScrapeError;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

type CountFn = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Scripted stand-in for a browser page.
pub struct FakePage {
    state: Mutex<State>,
    /// Number of result anchors after `n` scrolls
    count: CountFn,
}

#[derive(Default)]
pub struct State {
    pub current: String,
    pub visited: Vec<String>,
    pub scripts: Vec<(String, Vec<Value>)>,
    pub scrolls: usize,
    pub clicks: Vec<String>,
    pub load_more_present: bool,
    pub result_count: Option<String>,
    pub hrefs: Vec<String>,
    pub image_src: Option<String>,
    pub list_html: String,
    /// Page source by URL
    pub pages: HashMap<String, String>,
    /// Selectors the cleanup script reports as absent
    pub missing: HashSet<String>,
    /// URLs that never reach the ready state
    pub not_ready: HashSet<String>,
    /// Clicks fail as if the WebDriver connection dropped
    pub click_fails: bool,
}

impl FakePage {
    pub fn new(count: impl Fn(usize) -> usize + Send + Sync + 'static) -> Self {
        Self {
            state: Mutex::new(State {
                load_more_present: true,
                ..State::default()
            }),
            count: Box::new(count),
        }
    }

    pub fn with_state(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        let mut state = self.state();
        state.current = url.to_string();
        state.visited.push(url.to_string());
        Ok(())
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, ScrapeError> {
        let mut state = self.state();
        state.scripts.push((script.to_string(), args.clone()));

        if script.contains("outerHTML") {
            return Ok(json!(state.list_html));
        }
        if script.contains("const [selector, target, n, action, name, value]") {
            let selector = args[0].as_str().unwrap_or_default();
            let matches = if state.missing.contains(selector) { 0 } else { 1 };
            return Ok(json!(matches));
        }
        Ok(Value::Null)
    }

    async fn source(&self) -> Result<String, ScrapeError> {
        let state = self.state();
        Ok(state.pages.get(&state.current).cloned().unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> Result<usize, ScrapeError> {
        assert_eq!(selector, RESULT_ITEMS);
        let scrolls = self.state().scrolls;
        Ok((self.count)(scrolls))
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>, ScrapeError> {
        assert_eq!(selector, RESULT_COUNT);
        Ok(self.state().result_count.clone())
    }

    async fn attributes(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let state = self.state();
        match (selector, attribute) {
            (RESULT_ITEMS, "href") => Ok(state.hrefs.clone()),
            (RECIPE_IMAGE, "src") => Ok(state.image_src.iter().cloned().collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&self, selector: &str) -> Result<bool, ScrapeError> {
        let mut state = self.state();
        state.clicks.push(selector.to_string());
        if state.click_fails {
            return Err(ScrapeError::Driver("connection closed".to_string()));
        }
        Ok(selector == LOAD_MORE && state.load_more_present)
    }

    async fn scroll_to_bottom(&self) -> Result<(), ScrapeError> {
        self.state().scrolls += 1;
        Ok(())
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<(), ScrapeError> {
        let state = self.state();
        if state.not_ready.contains(&state.current) {
            return Err(ScrapeError::Timeout(timeout));
        }
        Ok(())
    }
}

/// A rendered recipe page with the structure the extractor expects.
pub fn recipe_html(title: &str, with_nutrition: bool) -> String {
    let nutrition = if with_nutrition {
        r#"<div class="nutritions">
            <dl>
                <dt>Calories</dt>
                <dd>1523 kJ /
                    364 kcal</dd>
                <dt>Protein</dt>
                <dd>12 g</dd>
            </dl>
        </div>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en-GB">
<head><title>{title}</title></head>
<body>
    <h1 class="recipe-card__title">{title}</h1>
    <div class="core-rating">
        <span class="core-rating__counter">4.6</span>
        <span class="core-rating__label">1,234 ratings</span>
    </div>
    <div class="recipe-card__tm-version">
        <core-badge>
            TM6
        </core-badge>
        <core-badge>TM5 </core-badge>
    </div>
    <core-feature-icons>
        <label><span>Preparation time</span> 20 min </label>
        <label><span>Total time</span> 1h 10 min</label>
    </core-feature-icons>
    <div id="recipe-card__image-loader"><img src="https://assets.example.com/r1.jpg"></div>
    <div id="ingredients">
        <ul>
            <li>2  cups
                flour</li>
            <li> 1 pinch salt </li>
        </ul>
    </div>
    {nutrition}
    <div id="preparation-steps">
        <ol>
            <li>Place flour in   mixing bowl.</li>
            <li>Mix 10 sec/speed 4.</li>
        </ol>
    </div>
    <div class="core-tags-wrapper__tags-container">
        <a href="/tags/vegan">  #Vegan </a>
        <a href="/tags/easy">#Easy</a>
    </div>
</body>
</html>"#
    )
}
