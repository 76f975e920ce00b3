use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Scraper configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ScrapeConfig {
    /// Seconds to wait after a navigation, also the ready-state timeout
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,
    /// Seconds to wait after scrolling the result list
    #[serde(default = "default_scroll_delay_secs")]
    pub scroll_delay_secs: u64,
    /// Iterations without progress before pagination gives up
    #[serde(default = "default_max_scroll_retries")]
    pub max_scroll_retries: u32,
    /// Host name without the locale suffix
    #[serde(default = "default_base_domain")]
    pub base_domain: String,
    /// Chrome binary to launch instead of the system default
    #[serde(default)]
    pub chrome_binary: Option<String>,
    /// Port for chromedriver; a free one is picked when unset
    #[serde(default)]
    pub webdriver_port: Option<u16>,
    /// Run Chrome without a window (login then has to happen some other way)
    #[serde(default)]
    pub headless: bool,
    /// Image download timeout in seconds
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
    /// Log progress every N saved recipes
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_secs: default_page_load_timeout_secs(),
            scroll_delay_secs: default_scroll_delay_secs(),
            max_scroll_retries: default_max_scroll_retries(),
            base_domain: default_base_domain(),
            chrome_binary: None,
            webdriver_port: None,
            headless: false,
            image_timeout_secs: default_image_timeout_secs(),
            progress_every: default_progress_every(),
        }
    }
}

// Default value functions
fn default_page_load_timeout_secs() -> u64 {
    3
}

fn default_scroll_delay_secs() -> u64 {
    1
}

fn default_max_scroll_retries() -> u32 {
    5
}

fn default_base_domain() -> String {
    "cookidoo".to_string()
}

fn default_image_timeout_secs() -> u64 {
    30
}

fn default_progress_every() -> usize {
    10
}

impl ScrapeConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COOKIDUMP__ prefix
    /// 2. cookidump.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COOKIDUMP__MAX_SCROLL_RETRIES
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = load_config()?;
        if config.chrome_binary.is_none() {
            config.chrome_binary = std::env::var("GOOGLE_CHROME_PATH").ok();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // The first pagination round only records the baseline
        if self.max_scroll_retries < 2 {
            return Err(ConfigError::Message(
                "max_scroll_retries must be at least 2".to_string(),
            ));
        }
        if self.progress_every == 0 {
            return Err(ConfigError::Message(
                "progress_every must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_secs(self.scroll_delay_secs)
    }

    /// Root URL for a locale, e.g. `https://cookidoo.de/`
    pub fn base_url(&self, locale: &str) -> String {
        format!("https://{}.{}/", self.base_domain, locale.trim_matches('.'))
    }
}

fn load_config() -> Result<ScrapeConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("cookidump").required(false))
        // Use double underscore for nested: COOKIDUMP__SCROLL_DELAY_SECS
        .add_source(
            Environment::with_prefix("COOKIDUMP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ScrapeConfig::default();
        assert_eq!(config.page_load_timeout_secs, 3);
        assert_eq!(config.scroll_delay_secs, 1);
        assert_eq!(config.max_scroll_retries, 5);
        assert_eq!(config.base_domain, "cookidoo");
        assert_eq!(config.progress_every, 10);
        assert!(!config.headless);
    }

    #[test]
    fn test_base_url() {
        let config = ScrapeConfig::default();
        assert_eq!(config.base_url("de"), "https://cookidoo.de/");
        assert_eq!(config.base_url(".co.uk"), "https://cookidoo.co.uk/");
    }

    #[test]
    fn test_validate_rejects_zero_retries() {
        let config = ScrapeConfig {
            max_scroll_retries: 0,
            ..ScrapeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_needs_a_round_past_the_baseline() {
        let config = ScrapeConfig {
            max_scroll_retries: 1,
            ..ScrapeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ScrapeConfig {
            max_scroll_retries: 2,
            ..ScrapeConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_file() {
        let settings = Config::builder()
            .add_source(config::File::from_str(
                "max_scroll_retries = 8\nheadless = true",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: ScrapeConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.max_scroll_retries, 8);
        assert!(config.headless);
        assert_eq!(config.scroll_delay_secs, 1);
        assert_eq!(config.base_domain, "cookidoo");
    }
}
