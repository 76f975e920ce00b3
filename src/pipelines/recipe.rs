use super::{RecipeLink, RecipeOutcome, SkippedRecipe};
use crate::browser::Page;
use crate::cleanup::{self, RECIPE_IMAGE};
use crate::error::{ExtractError, ScrapeError};
use crate::extractors::{CookidooExtractor, Extractor, ParsingContext};
use crate::fetchers::ImageFetcher;
use crate::model::RecipeRecord;
use crate::output::{self, recipe_image_link, OutputLayout};
use log::{debug, warn};
use std::time::Duration;

const PRINT_SCRIPT: &str = "window.print();";

/// Parse a rendered recipe page into a record.
pub fn extract_record(id: &str, html: &str) -> Result<RecipeRecord, ExtractError> {
    let context = ParsingContext::new(id, html);
    CookidooExtractor.parse(&context)
}

/// Saves single recipe pages: cleaned HTML, image, optional PDF and JSON.
pub struct RecipeDumper<'a> {
    pub page: &'a dyn Page,
    pub layout: &'a OutputLayout,
    pub fetcher: &'a ImageFetcher,
    pub page_load_timeout: Duration,
    pub separate_json: bool,
    pub export_pdf: bool,
}

impl RecipeDumper<'_> {
    /// Dump one recipe. Any failure skips the recipe; nothing is retried.
    pub async fn dump(&self, link: &RecipeLink) -> RecipeOutcome {
        match self.try_dump(link).await {
            Ok(recipe) => RecipeOutcome::Saved(Box::new(recipe)),
            Err(e) => {
                warn!("Skipping {}: {}", link.url, e);
                RecipeOutcome::Skipped(SkippedRecipe {
                    url: link.url.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn try_dump(&self, link: &RecipeLink) -> Result<RecipeRecord, ScrapeError> {
        let id = link.id.as_str();
        self.page.goto(&link.url).await?;
        self.page.wait_until_ready(self.page_load_timeout).await?;

        cleanup::apply(self.page, &cleanup::recipe_page_rules()).await?;

        let image_url = self
            .page
            .attributes(RECIPE_IMAGE, "src")
            .await?
            .into_iter()
            .next()
            .filter(|src| !src.is_empty())
            .ok_or_else(|| ScrapeError::MissingElement(RECIPE_IMAGE.to_string()))?;
        self.fetcher
            .download(&image_url, &self.layout.image(id))
            .await?;

        cleanup::apply(self.page, &cleanup::recipe_image_rules(&recipe_image_link(id))).await?;
        cleanup::apply(self.page, &cleanup::recipe_stylesheet_rules()).await?;

        let html = self.page.source().await?;
        output::write_text(&self.layout.recipe_html(id), &html).await?;

        if self.export_pdf {
            // Kiosk printing saves straight into the PDF directory
            self.page.execute(PRINT_SCRIPT, Vec::new()).await?;
        }

        let recipe = extract_record(id, &html)?;

        if self.separate_json {
            debug!("Writing recipe {} to JSON file", id);
            output::write_json(&self.layout.recipe_json(id), &recipe).await?;
        }

        Ok(recipe)
    }
}
