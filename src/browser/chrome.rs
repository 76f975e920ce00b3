use crate::browser::{
    Page, ATTRIBUTES_SCRIPT, CLICK_SCRIPT, COUNT_SCRIPT, INNER_HTML_SCRIPT, READY_STATE_SCRIPT,
    SCROLL_SCRIPT,
};
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use log::{debug, info};
use serde_json::{json, Map, Value};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// A chromedriver child process, killed when dropped.
pub struct ChromeDriver {
    process: Child,
    port: u16,
}

impl ChromeDriver {
    /// Spawn the driver binary and wait until it accepts connections
    pub async fn start(driver_path: &Path, port: u16) -> Result<Self, ScrapeError> {
        let process = Command::new(driver_path)
            .arg(format!("--port={}", port))
            .spawn()
            .map_err(|e| {
                ScrapeError::Driver(format!(
                    "Failed to spawn {}: {}",
                    driver_path.display(),
                    e
                ))
            })?;
        let driver = Self { process, port };

        // Poll for port availability
        for _ in 0..100 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok()
            {
                debug!("chromedriver listening on port {}", port);
                return Ok(driver);
            }
            sleep(Duration::from_millis(100)).await;
        }

        Err(ScrapeError::Driver(
            "Timed out waiting for chromedriver to start".to_string(),
        ))
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

fn find_available_port() -> Result<u16, ScrapeError> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Chrome print-preview settings used for silent "Save as PDF" printing
#[derive(Debug, Clone)]
pub struct PrintSettings {
    /// Directory Chrome saves printed PDFs into
    pub directory: PathBuf,
    /// Page scale in percent
    pub scaling: u32,
}

impl PrintSettings {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            scaling: 55,
        }
    }

    fn app_state(&self) -> Value {
        json!({
            "recentDestinations": [{ "id": "Save as PDF", "origin": "local" }],
            "selectedDestinationId": "Save as PDF",
            "version": 2,
            "isHeaderFooterEnabled": false,
            "isLandscapeEnabled": false,
            "pageSize": "A4",
            "marginsType": 2,
            "scalingType": 3,
            "scaling": self.scaling.to_string(),
        })
    }

    fn prefs(&self) -> Value {
        json!({
            "printing.print_preview_sticky_settings.appState": self.app_state().to_string(),
            "savefile.default_directory": self.directory.display().to_string(),
        })
    }
}

fn chrome_capabilities(config: &ScrapeConfig, print: &PrintSettings) -> Map<String, Value> {
    let mut args = vec!["--kiosk-printing".to_string()];
    if config.headless {
        args.push("--headless".to_string());
    }

    let mut options = json!({
        "args": args,
        "prefs": print.prefs(),
    });
    if let Some(binary) = &config.chrome_binary {
        options["binary"] = Value::String(binary.clone());
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), options);
    caps
}

/// A Chrome browser driven through chromedriver.
pub struct ChromeSession {
    client: Client,
    _driver: ChromeDriver,
}

impl ChromeSession {
    /// Start chromedriver and open a new browser window
    pub async fn launch(
        driver_path: &Path,
        config: &ScrapeConfig,
        print: &PrintSettings,
    ) -> Result<Self, ScrapeError> {
        let port = match config.webdriver_port {
            Some(port) => port,
            None => find_available_port()?,
        };
        let driver = ChromeDriver::start(driver_path, port).await?;
        let caps = chrome_capabilities(config, print);

        let mut attempt = 0;
        let client = loop {
            attempt += 1;
            match ClientBuilder::native()
                .capabilities(caps.clone())
                .connect(&driver.url())
                .await
            {
                Ok(client) => break client,
                Err(e) if attempt >= 10 => return Err(e.into()),
                Err(e) => {
                    debug!("WebDriver not ready (attempt {}): {}", attempt, e);
                    sleep(Duration::from_millis(500)).await;
                }
            }
        };

        info!("Browser session started");
        Ok(Self {
            client,
            _driver: driver,
        })
    }

    /// End the WebDriver session and close the browser window
    pub async fn close(self) -> Result<(), ScrapeError> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Page for ChromeSession {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, ScrapeError> {
        Ok(self.client.execute(script, args).await?)
    }

    async fn source(&self) -> Result<String, ScrapeError> {
        Ok(self.client.source().await?)
    }

    async fn count(&self, selector: &str) -> Result<usize, ScrapeError> {
        let value = self.execute(COUNT_SCRIPT, vec![json!(selector)]).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>, ScrapeError> {
        match self.execute(INNER_HTML_SCRIPT, vec![json!(selector)]).await? {
            Value::String(html) => Ok(Some(html)),
            _ => Ok(None),
        }
    }

    async fn attributes(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let value = self
            .execute(ATTRIBUTES_SCRIPT, vec![json!(selector), json!(attribute)])
            .await?;
        Ok(value
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn click(&self, selector: &str) -> Result<bool, ScrapeError> {
        let value = self.execute(CLICK_SCRIPT, vec![json!(selector)]).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn scroll_to_bottom(&self) -> Result<(), ScrapeError> {
        self.execute(SCROLL_SCRIPT, Vec::new()).await?;
        Ok(())
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<(), ScrapeError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Value::String(state) = self.execute(READY_STATE_SCRIPT, Vec::new()).await? {
                if state == "complete" {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout(timeout));
            }
            sleep(Duration::from_millis(100)).await;
        }
    }
}
