//! Declarative DOM cleanup.
//!
//! A saved page is stripped of scripts, navigation, consent banners and other
//! site chrome by applying a list of [`CleanupRule`]s in order. Each rule is a
//! CSS selector, which of its matches to touch, and what to do with them.

use crate::browser::Page;
use crate::error::ScrapeError;
use log::debug;
use serde_json::{json, Value};

/// Which of a selector's matches a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    All,
    /// The first `n` matches
    First(usize),
    /// The match at a zero-based index
    Nth(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Remove,
    RemoveAttribute(String),
    SetAttribute(String, String),
    RemoveClass(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupRule {
    pub selector: String,
    pub target: Target,
    pub action: Action,
    /// Fail the page when nothing matches
    pub required: bool,
}

const APPLY_SCRIPT: &str = r#"
const [selector, target, n, action, name, value] = arguments;
let nodes = Array.from(document.querySelectorAll(selector));
if (target === "first") {
    nodes = nodes.slice(0, n);
} else if (target === "nth") {
    nodes = n < nodes.length ? [nodes[n]] : [];
}
for (const el of nodes) {
    switch (action) {
        case "remove": el.remove(); break;
        case "remove_attribute": el.removeAttribute(name); break;
        case "set_attribute": el.setAttribute(name, value); break;
        case "remove_class": el.classList.remove(name); break;
    }
}
return nodes.length;
"#;

impl CleanupRule {
    fn new(selector: impl Into<String>, target: Target, action: Action) -> Self {
        Self {
            selector: selector.into(),
            target,
            action,
            required: false,
        }
    }

    /// Remove every match
    pub fn remove_all(selector: impl Into<String>) -> Self {
        Self::new(selector, Target::All, Action::Remove)
    }

    /// Remove the first match only
    pub fn remove_first(selector: impl Into<String>) -> Self {
        Self::new(selector, Target::First(1), Action::Remove)
    }

    pub fn remove_attribute(selector: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(selector, Target::All, Action::RemoveAttribute(name.into()))
    }

    pub fn set_attribute(
        selector: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            selector,
            Target::All,
            Action::SetAttribute(name.into(), value.into()),
        )
    }

    pub fn remove_class(selector: impl Into<String>, class: impl Into<String>) -> Self {
        Self::new(selector, Target::First(1), Action::RemoveClass(class.into()))
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Arguments for the apply script, in `arguments[]` order
    pub fn arguments(&self) -> Vec<Value> {
        let (target, n) = match self.target {
            Target::All => ("all", 0),
            Target::First(n) => ("first", n),
            Target::Nth(i) => ("nth", i),
        };
        let (action, name, value) = match &self.action {
            Action::Remove => ("remove", "", ""),
            Action::RemoveAttribute(name) => ("remove_attribute", name.as_str(), ""),
            Action::SetAttribute(name, value) => ("set_attribute", name.as_str(), value.as_str()),
            Action::RemoveClass(class) => ("remove_class", class.as_str(), ""),
        };
        vec![
            json!(self.selector),
            json!(target),
            json!(n),
            json!(action),
            json!(name),
            json!(value),
        ]
    }
}

/// Apply rules in order. Returns how many rules matched at least one element.
pub async fn apply(page: &dyn Page, rules: &[CleanupRule]) -> Result<usize, ScrapeError> {
    let mut matched = 0;
    for rule in rules {
        let count = page
            .execute(APPLY_SCRIPT, rule.arguments())
            .await?
            .as_u64()
            .unwrap_or(0);

        if count == 0 {
            if rule.required {
                return Err(ScrapeError::MissingElement(rule.selector.clone()));
            }
            debug!("Cleanup rule '{}' matched nothing", rule.selector);
            continue;
        }

        debug!(
            "Cleanup rule '{}' {:?} applied to {} element(s)",
            rule.selector, rule.action, count
        );
        matched += 1;
    }
    Ok(matched)
}

/// Rules that turn the search result list into a standalone index page.
pub fn list_page_rules() -> Vec<CleanupRule> {
    vec![
        CleanupRule::remove_all("script"),
        CleanupRule::remove_first(".page-header"),
        CleanupRule::remove_first(".l-content"),
        CleanupRule::remove_first(".keyboard-container"),
        CleanupRule::remove_first("filter-button"),
        CleanupRule::remove_all("sort-by"),
        CleanupRule::remove_first("filter-modal"),
        CleanupRule::remove_first("core-toast"),
        CleanupRule::remove_first("search-algolia"),
        CleanupRule::remove_first("search-infinite-scroll"),
        CleanupRule::remove_first("core-footer"),
        CleanupRule::remove_first("core-tos-privacy-update"),
        CleanupRule::remove_first("core-feedback"),
        CleanupRule::remove_first("#onetrust-consent-sdk"),
        CleanupRule::remove_first("#onetrust-style"),
        CleanupRule::remove_all("core-context-menu"),
        CleanupRule::remove_all("core-error-page"),
        CleanupRule::remove_all("noscript"),
        CleanupRule::remove_attribute("img", "srcset"),
        CleanupRule::remove_attribute("img", "sizes"),
        CleanupRule::set_attribute("img", "style", "max-width:100%;"),
        CleanupRule::remove_first("link[rel='icon']"),
        CleanupRule::remove_first("base"),
        CleanupRule::remove_first(".filters-header"),
        CleanupRule::remove_first("body > div > div > div:nth-of-type(1)"),
        // Remaining site stylesheets
        CleanupRule::remove_all("link").target(Target::First(3)),
    ]
}

/// Rules that reduce a recipe page to the recipe card itself.
pub fn recipe_page_rules() -> Vec<CleanupRule> {
    vec![
        CleanupRule::remove_first("base"),
        CleanupRule::remove_first("core-transclude").required(),
        CleanupRule::remove_all("script"),
        CleanupRule::remove_all("noscript"),
        CleanupRule::remove_first(".page-header").required(),
        CleanupRule::remove_first(".button--primary").required(),
        CleanupRule::remove_first(".recipe-card__btn-line--secondary").required(),
        CleanupRule::remove_first(".core-scrollbar__content").required(),
        CleanupRule::remove_first("#core-share").required(),
        CleanupRule::remove_first("core-footer").required(),
        CleanupRule::remove_first("core-toast").required(),
        CleanupRule::remove_first("#alternative-recipes").required(),
        CleanupRule::set_attribute(
            "#serving-size-modal-trigger",
            "class",
            "core-feature-icons__item",
        )
        .target(Target::First(1))
        .required(),
        CleanupRule::set_attribute("#rc-icon-quantity-icon", "style", "margin-left: 1rem")
            .target(Target::First(1))
            .required(),
        CleanupRule::set_attribute(
            "#rc-icon-quantity-icon",
            "class",
            "core-feature-icons__icon icon icon--servings",
        )
        .target(Target::First(1))
        .required(),
        CleanupRule::remove_class(".l-header-offset-small", "l-header-offset-small").required(),
        CleanupRule::remove_first("#in-collections"),
        CleanupRule::remove_first("#additional-categories"),
        CleanupRule::remove_first("accessories-banner"),
        CleanupRule::remove_first("#onetrust-banner-sdk"),
        CleanupRule::remove_first("#onetrust-style"),
        CleanupRule::remove_first(".tm-versions-modal"),
        // Each removal shifts the positions of the following separators
        CleanupRule::remove_first("#recipe-content-right > hr:nth-of-type(2)"),
        CleanupRule::remove_first("#recipe-content-right > hr:nth-of-type(3)"),
        CleanupRule::remove_first("#recipe-content-right > hr:nth-of-type(5)"),
        CleanupRule::remove_first("#recipe-content-right > hr:nth-of-type(1)"),
    ]
}

/// Points the remaining stylesheets at local copies next to the output root.
pub fn recipe_stylesheet_rules() -> Vec<CleanupRule> {
    vec![
        CleanupRule::set_attribute("link", "href", "../../css/core.css").target(Target::Nth(0)),
        CleanupRule::set_attribute("link", "href", "../../css/bundle.css").target(Target::Nth(1)),
        CleanupRule::set_attribute("link", "href", "../../css/recipe.css").target(Target::Nth(4)),
    ]
}

/// Replaces the remote recipe image with the downloaded copy.
pub fn recipe_image_rules(local_path: &str) -> Vec<CleanupRule> {
    vec![
        CleanupRule::set_attribute(RECIPE_IMAGE, "srcset", "").target(Target::First(1)),
        CleanupRule::set_attribute(RECIPE_IMAGE, "src", local_path)
            .target(Target::First(1))
            .required(),
    ]
}

pub const RECIPE_IMAGE: &str = "#recipe-card__image-loader img";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_arguments() {
        let rule = CleanupRule::set_attribute("img", "style", "max-width:100%;");
        assert_eq!(
            rule.arguments(),
            vec![
                json!("img"),
                json!("all"),
                json!(0),
                json!("set_attribute"),
                json!("style"),
                json!("max-width:100%;"),
            ]
        );

        let rule = CleanupRule::remove_all("link").target(Target::First(3));
        assert_eq!(rule.arguments()[1], json!("first"));
        assert_eq!(rule.arguments()[2], json!(3));
        assert_eq!(rule.arguments()[3], json!("remove"));
    }

    #[test]
    fn test_recipe_rules_mark_layout_elements_required() {
        let rules = recipe_page_rules();
        let required: Vec<_> = rules
            .iter()
            .filter(|r| r.required)
            .map(|r| r.selector.as_str())
            .collect();

        assert!(required.contains(&"core-transclude"));
        assert!(required.contains(&"#alternative-recipes"));
        assert!(!required.contains(&"#in-collections"));
        assert!(!required.contains(&"base"));
    }

    #[test]
    fn test_list_rules_are_all_optional() {
        assert!(list_page_rules().iter().all(|r| !r.required));
    }

    #[test]
    fn test_recipe_image_rules_use_local_path() {
        let rules = recipe_image_rules("../images/r1.jpg");
        assert_eq!(
            rules[1].action,
            Action::SetAttribute("src".to_string(), "../images/r1.jpg".to_string())
        );
        assert!(rules[1].required);
    }
}
