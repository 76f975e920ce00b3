use thiserror::Error;

/// Errors that can occur while dumping recipes
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// A WebDriver command failed
    #[error("Browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    /// Could not open a WebDriver session
    #[error("Failed to start browser session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    /// The chromedriver process could not be started or never came up
    #[error("WebDriver error: {0}")]
    Driver(String),

    /// Filesystem error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize recipe records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to download a remote resource
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Structured data could not be extracted from a recipe page
    #[error("Failed to extract recipe: {0}")]
    Extract(#[from] ExtractError),

    /// An element the page layout requires was not found
    #[error("Required element not found: {0}")]
    MissingElement(String),

    /// The results-count indicator did not hold a number
    #[error("Invalid result count: {0:?}")]
    InvalidCount(String),

    /// The page did not reach the ready state in time
    #[error("Page not ready after {0:?}")]
    Timeout(std::time::Duration),

    /// Standard input was closed or unreadable at a question
    #[error("Prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors raised by the record extractor when the page layout does not match
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no element matches `{selector}`")]
    MissingElement { selector: String },

    #[error("element `{selector}` has no `{attribute}` attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
}
