use super::RecipeLink;
use crate::browser::Page;
use crate::cleanup::{self, CleanupRule};
use crate::error::ScrapeError;
use crate::model::recipe_id_from_url;
use crate::output::{self, index_image_link, index_recipe_link, OutputLayout};
use crate::pagination::{
    self, PaginationDriver, PaginationOutcome, PaginationSettings, RESULT_ITEMS,
};
use log::{debug, info};
use serde_json::{json, Value};
use std::collections::HashSet;

const COOKIE_ACCEPT: &str = ".accept-cookie-container";

const OUTER_HTML_SCRIPT: &str = "return document.documentElement.outerHTML;";

const REWRITE_LINKS_SCRIPT: &str = r#"
const [selector, targets] = arguments;
document.querySelectorAll(selector).forEach((a, i) => {
    const target = targets[i];
    if (!target) return;
    a.setAttribute("href", target[0]);
    const img = a.querySelector("img");
    if (img) img.setAttribute("src", target[1]);
});
"#;

pub struct SearchResults {
    pub pagination: PaginationOutcome,
    pub recipes: Vec<RecipeLink>,
}

/// Loads the whole result list, saves it as `index.html` and returns the
/// recipe links it contains.
pub async fn collect(
    page: &dyn Page,
    settings: PaginationSettings,
    layout: &OutputLayout,
) -> Result<SearchResults, ScrapeError> {
    // The account name banner; its absence means the list did not render
    cleanup::apply(page, &[CleanupRule::remove_first("core-transclude").required()]).await?;

    if page.click(COOKIE_ACCEPT).await? {
        debug!("Accepted cookie banner");
    }

    let target = pagination::read_target(page).await?;
    info!("Loading {} search results", target);
    let outcome = PaginationDriver::new(page, settings).run(target).await?;

    cleanup::apply(page, &cleanup::list_page_rules()).await?;

    let hrefs = page.attributes(RESULT_ITEMS, "href").await?;
    let ids: Vec<Option<String>> = hrefs
        .iter()
        .map(|href| recipe_id_from_url(href).ok().filter(|id| !id.is_empty()))
        .collect();

    let targets: Vec<Value> = ids
        .iter()
        .map(|id| match id {
            Some(id) => json!([index_recipe_link(id), index_image_link(id)]),
            None => Value::Null,
        })
        .collect();
    page.execute(REWRITE_LINKS_SCRIPT, vec![json!(RESULT_ITEMS), Value::Array(targets)])
        .await?;

    let html = page.execute(OUTER_HTML_SCRIPT, Vec::new()).await?;
    output::write_text(&layout.index_html(), html.as_str().unwrap_or_default()).await?;
    info!("Saved result list to {}", layout.index_html().display());

    Ok(SearchResults {
        pagination: outcome,
        recipes: recipe_links(hrefs.into_iter().zip(ids)),
    })
}

/// Keeps recipe pages only (the list also links terms of use, privacy, ...)
/// and drops repeated ids.
fn recipe_links(candidates: impl Iterator<Item = (String, Option<String>)>) -> Vec<RecipeLink> {
    let mut seen = HashSet::new();
    candidates
        .filter(|(url, _)| url.contains("recipe"))
        .filter_map(|(url, id)| id.map(|id| RecipeLink { url, id }))
        .filter(|link| seen.insert(link.id.clone()))
        .collect()
}
