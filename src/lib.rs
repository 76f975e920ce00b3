pub mod browser;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod output;
pub mod pagination;
pub mod pipelines;
pub mod prompt;

pub use crate::config::ScrapeConfig;
pub use error::{ExtractError, ScrapeError};
pub use model::RecipeRecord;
pub use pipelines::{run, RunOptions, RunSummary, Scraper};
