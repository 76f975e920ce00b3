pub mod recipe;
pub mod run;
pub mod search;

use crate::model::RecipeRecord;
use crate::pagination::PaginationOutcome;
use std::fmt;
use std::path::PathBuf;

pub use run::{run, Scraper};

/// Options chosen on the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the chromedriver binary
    pub webdriver: PathBuf,
    /// Destination root
    pub outputdir: PathBuf,
    /// One JSON file per recipe instead of a single `data.json`
    pub separate_json: bool,
    /// Print every recipe page to PDF
    pub export_pdf: bool,
}

/// A recipe found in the search results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLink {
    pub url: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecipe {
    pub url: String,
    pub reason: String,
}

/// Result of dumping one recipe page
#[derive(Debug, Clone)]
pub enum RecipeOutcome {
    Saved(Box<RecipeRecord>),
    Skipped(SkippedRecipe),
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub pagination: PaginationOutcome,
    /// Recipe links taken from the result list
    pub discovered: usize,
    pub saved: usize,
    pub skipped: Vec<SkippedRecipe>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {}/{} results{}, {} recipes found, {} saved, {} skipped",
            self.pagination.found(),
            self.pagination.target(),
            if self.pagination.is_complete() {
                ""
            } else {
                " (stalled)"
            },
            self.discovered,
            self.saved,
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            pagination: PaginationOutcome::Stalled {
                found: 20,
                target: 25,
                iterations: 7,
            },
            discovered: 20,
            saved: 18,
            skipped: vec![SkippedRecipe {
                url: "https://cookidoo.de/recipes/recipe/de-DE/r1".to_string(),
                reason: "timeout".to_string(),
            }],
        };

        assert_eq!(
            summary.to_string(),
            "Loaded 20/25 results (stalled), 20 recipes found, 18 saved, 1 skipped"
        );
    }
}
