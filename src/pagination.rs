use crate::browser::Page;
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extractors::normalize::digits_only;
use log::{info, warn};
use std::time::Duration;
use tokio::time::sleep;

/// Anchors of the search result cards
pub const RESULT_ITEMS: &str = ".link--alt";
/// Element holding the total number of search hits
pub const RESULT_COUNT: &str = ".search-results-count__hits";
/// The "load more recipes" button
pub const LOAD_MORE: &str = "#load-more-page";

#[derive(Debug, Clone)]
pub struct PaginationSettings {
    /// Wait after scrolling to the bottom of the list
    pub scroll_delay: Duration,
    /// Wait after clicking "load more"
    pub load_delay: Duration,
    /// Iterations without progress before giving up
    pub max_scroll_retries: u32,
}

impl From<&ScrapeConfig> for PaginationSettings {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            scroll_delay: config.scroll_delay(),
            load_delay: config.page_load_timeout(),
            max_scroll_retries: config.max_scroll_retries,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationOutcome {
    /// Every result the count indicator announced is on the page
    Complete {
        found: usize,
        target: usize,
        iterations: usize,
    },
    /// The list stopped growing before reaching the target
    Stalled {
        found: usize,
        target: usize,
        iterations: usize,
    },
}

impl PaginationOutcome {
    pub fn found(&self) -> usize {
        match *self {
            Self::Complete { found, .. } | Self::Stalled { found, .. } => found,
        }
    }

    pub fn target(&self) -> usize {
        match *self {
            Self::Complete { target, .. } | Self::Stalled { target, .. } => target,
        }
    }

    /// Number of scroll/load rounds performed
    pub fn iterations(&self) -> usize {
        match *self {
            Self::Complete { iterations, .. } | Self::Stalled { iterations, .. } => iterations,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }
}

/// Reads the number of results announced by the count indicator.
pub async fn read_target(page: &dyn Page) -> Result<usize, ScrapeError> {
    let text = page
        .inner_html(RESULT_COUNT)
        .await?
        .ok_or_else(|| ScrapeError::MissingElement(RESULT_COUNT.to_string()))?;

    // The count may carry thousands separators ("1.234")
    digits_only(&text)
        .parse()
        .map_err(|_| ScrapeError::InvalidCount(text))
}

/// Drives a lazily loaded result list until every result is present or the
/// list stops growing.
pub struct PaginationDriver<'a> {
    page: &'a dyn Page,
    settings: PaginationSettings,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(page: &'a dyn Page, settings: PaginationSettings) -> Self {
        Self { page, settings }
    }

    pub async fn run(&self, target: usize) -> Result<PaginationOutcome, ScrapeError> {
        let mut retry_count: u32 = 0;
        let mut previous: Option<usize> = None;
        let mut iterations = 0;

        loop {
            let current = self.page.count(RESULT_ITEMS).await?;
            if current >= target {
                info!("Scrolling [{}/{}]", current, target);
                return Ok(PaginationOutcome::Complete {
                    found: current,
                    target,
                    iterations,
                });
            }

            self.page.scroll_to_bottom().await?;
            sleep(self.settings.scroll_delay).await;

            // The button is missing on the last page and between renders
            if self.page.click(LOAD_MORE).await? {
                sleep(self.settings.load_delay).await;
            }
            iterations += 1;
            info!("Scrolling [{}/{}]", current, target);

            // The first observation is the baseline
            if previous.unwrap_or(current) == current {
                retry_count += 1;
            } else {
                retry_count = 0;
            }

            if retry_count >= self.settings.max_scroll_retries {
                warn!(
                    "Result list stalled at {}/{} after {} attempts",
                    current, target, retry_count
                );
                return Ok(PaginationOutcome::Stalled {
                    found: current,
                    target,
                    iterations,
                });
            }

            previous = Some(current);
        }
    }
}
