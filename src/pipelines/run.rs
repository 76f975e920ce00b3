use super::recipe::RecipeDumper;
use super::{search, RecipeLink, RecipeOutcome, RunOptions, RunSummary};
use crate::browser::{ChromeSession, Page, PrintSettings};
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::fetchers::ImageFetcher;
use crate::output::{self, OutputLayout};
use crate::pagination::{PaginationOutcome, PaginationSettings};
use crate::prompt::{self, Checkpoint, Prompter};
use log::{info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Drives one scraping session on an already open page.
pub struct Scraper<'a> {
    page: &'a dyn Page,
    config: &'a ScrapeConfig,
    layout: OutputLayout,
    fetcher: ImageFetcher,
    separate_json: bool,
    export_pdf: bool,
}

impl<'a> Scraper<'a> {
    pub fn new(
        page: &'a dyn Page,
        config: &'a ScrapeConfig,
        layout: OutputLayout,
        separate_json: bool,
        export_pdf: bool,
    ) -> Result<Self, ScrapeError> {
        let fetcher = ImageFetcher::new(Some(Duration::from_secs(config.image_timeout_secs)))?;
        Ok(Self {
            page,
            config,
            layout,
            fetcher,
            separate_json,
            export_pdf,
        })
    }

    async fn open(&self, url: &str) -> Result<(), ScrapeError> {
        self.page.goto(url).await?;
        sleep(self.config.page_load_timeout()).await;
        Ok(())
    }

    /// Login, load the result list, dump every recipe and log out again.
    ///
    /// `base_url` is the site root with a trailing slash.
    pub async fn scrape(
        &self,
        base_url: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<RunSummary, ScrapeError> {
        self.open(base_url).await?;
        prompt::confirm(prompter, Checkpoint::Login).map_err(ScrapeError::Prompt)?;

        self.open(&format!("{}search/", base_url)).await?;
        prompt::confirm(prompter, Checkpoint::Filters).map_err(ScrapeError::Prompt)?;

        info!("Proceeding with scraping");
        let results =
            search::collect(self.page, PaginationSettings::from(self.config), &self.layout)
                .await?;

        let summary = self.dump_all(&results.recipes, results.pagination).await?;

        info!("Logging out");
        self.open(&format!("{}profile/logout", base_url)).await?;

        Ok(summary)
    }

    /// Dump every recipe in order, writing `data.json` unless records go to
    /// separate files.
    pub async fn dump_all(
        &self,
        recipes: &[RecipeLink],
        pagination: PaginationOutcome,
    ) -> Result<RunSummary, ScrapeError> {
        info!("Getting {} recipes", recipes.len());
        let dumper = RecipeDumper {
            page: self.page,
            layout: &self.layout,
            fetcher: &self.fetcher,
            page_load_timeout: self.config.page_load_timeout(),
            separate_json: self.separate_json,
            export_pdf: self.export_pdf,
        };

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut saved = 0;
        for link in recipes {
            match dumper.dump(link).await {
                RecipeOutcome::Saved(recipe) => {
                    saved += 1;
                    if saved % self.config.progress_every == 0 {
                        info!("Dumped recipes: {}/{}", saved, recipes.len());
                    }
                    if !self.separate_json {
                        records.push(*recipe);
                    }
                }
                RecipeOutcome::Skipped(skip) => skipped.push(skip),
            }
        }

        if !self.separate_json {
            info!("Writing recipes to {}", self.layout.data_json().display());
            output::write_json(&self.layout.data_json(), &records).await?;
        }

        Ok(RunSummary {
            pagination,
            discovered: recipes.len(),
            saved,
            skipped,
        })
    }
}

/// Full interactive run: asks for the output sub-directory and locale, starts
/// Chrome, scrapes, and closes the browser.
pub async fn run(
    options: &RunOptions,
    config: &ScrapeConfig,
    prompter: &mut dyn Prompter,
) -> Result<RunSummary, ScrapeError> {
    info!("Welcome to cookidump, starting things off...");

    let custom_dir = prompt::ask_custom_dir(prompter).map_err(ScrapeError::Prompt)?;
    let layout = OutputLayout::new(&options.outputdir, custom_dir.as_deref());

    let mut pdf_dir = layout.pdf_dir();
    if options.export_pdf {
        tokio::fs::create_dir_all(&pdf_dir).await?;
        // Chrome needs an absolute save directory
        pdf_dir = pdf_dir.canonicalize()?;
    }

    let locale =
        prompt::ask_locale(prompter, &config.base_domain).map_err(ScrapeError::Prompt)?;
    let base_url = config.base_url(&locale);

    let session =
        ChromeSession::launch(&options.webdriver, config, &PrintSettings::new(pdf_dir)).await?;

    let result = match Scraper::new(
        &session,
        config,
        layout,
        options.separate_json,
        options.export_pdf,
    ) {
        Ok(scraper) => scraper.scrape(&base_url, prompter).await,
        Err(e) => Err(e),
    };

    info!("Closing session");
    if let Err(e) = session.close().await {
        warn!("Failed to close browser session: {}", e);
    }

    result
}
