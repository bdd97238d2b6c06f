use crate::config::ScrapeConfig;
use crate::crawlers::crawler::{PageHandle, Renderer};
use crate::error::{ExtractionError, NavigationError};
use crate::parsers::PageSnapshot;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use url::Url;

/// Interval between network activity probes
const PROBE_INTERVAL: Duration = Duration::from_millis(100);

/// Reports the document state and the number of finished resource loads
const NETWORK_PROBE: &str =
    "return [document.readyState, performance.getEntriesByType('resource').length];";

/// WebDriver-backed browser context for one run
///
/// Every loaded page gets its own WebDriver session, and so its own browser
/// process, closed again by [`BrowserPage::close`]. `max_open_pages` bounds
/// how many of those run at once.
pub struct Browser {
    webdriver_url: String,
    capabilities: Map<String, Value>,
    page_permits: Option<Arc<Semaphore>>,
    page_load_timeout: Duration,
    network_idle: Duration,
}

impl Browser {
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            capabilities: capabilities(&config.browser_args, config.page_load_timeout()),
            page_permits: config
                .max_open_pages
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
            page_load_timeout: config.page_load_timeout(),
            network_idle: config.network_idle(),
        }
    }

    /// Opens a new WebDriver session
    async fn connect(&self, url: &str) -> Result<Client, NavigationError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities.clone());

        match builder.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                Ok(client)
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                Err(NavigationError::Session {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn acquire_page_permit(
        &self,
        url: &str,
    ) -> Result<Option<OwnedSemaphorePermit>, NavigationError> {
        match &self.page_permits {
            Some(permits) => Arc::clone(permits)
                .acquire_owned()
                .await
                .map(Some)
                .map_err(|e| NavigationError::Session {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Navigates and waits for the page to finish rendering
    async fn navigate(&self, client: &Client, url: &str) -> Result<(), NavigationError> {
        client
            .goto(url)
            .await
            .map_err(|e| navigation_error(url, e))?;

        self.wait_for_network_idle(client, url).await?;

        client
            .wait()
            .for_element(Locator::Css("body"))
            .await
            .map_err(|e| navigation_error(url, e))?;

        ::log::debug!("Body detected on {}", url);
        Ok(())
    }

    async fn wait_for_network_idle(&self, client: &Client, url: &str) -> Result<(), NavigationError> {
        let mut tracker = NetworkIdleTracker::new(self.network_idle);

        loop {
            let probe = client
                .execute(NETWORK_PROBE, Vec::new())
                .await
                .map_err(|e| navigation_error(url, e))?;
            let (complete, resources) = parse_probe(&probe);

            if tracker.observe(complete, resources, Instant::now()) {
                ::log::debug!("Network idle on {} after {} resources", url, resources);
                return Ok(());
            }

            tokio::time::sleep(PROBE_INTERVAL).await;
        }
    }
}

impl Renderer for Browser {
    type Page = BrowserPage;

    async fn load(&self, url: &str) -> Result<BrowserPage, NavigationError> {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                return Err(NavigationError::UnsupportedScheme {
                    url: url.to_string(),
                });
            }
        }

        let permit = self.acquire_page_permit(url).await?;
        let client = self.connect(url).await?;

        let loaded = match timeout(self.page_load_timeout, self.navigate(&client, url)).await {
            Ok(result) => result,
            Err(_) => Err(NavigationError::Timeout {
                url: url.to_string(),
            }),
        };

        match loaded {
            Ok(()) => {
                ::log::info!("Page loaded: {}", url);
                Ok(BrowserPage {
                    client,
                    url: url.to_string(),
                    _permit: permit,
                })
            }
            Err(e) => {
                close_client(client, url).await;
                Err(e)
            }
        }
    }
}

/// A rendered page backed by its own WebDriver session
pub struct BrowserPage {
    client: Client,
    url: String,
    _permit: Option<OwnedSemaphorePermit>,
}

impl PageHandle for BrowserPage {
    async fn snapshot(&self) -> Result<PageSnapshot, ExtractionError> {
        let url = self
            .client
            .current_url()
            .await
            .map_err(|e| snapshot_error(&self.url, e))?;
        let html = self
            .client
            .source()
            .await
            .map_err(|e| snapshot_error(&self.url, e))?;

        Ok(PageSnapshot::new(url, html))
    }

    async fn close(self) {
        close_client(self.client, &self.url).await;
    }
}

/// Tracks resource activity until it has been unchanged for the idle window
#[derive(Debug)]
struct NetworkIdleTracker {
    idle_window: Duration,
    last_count: Option<u64>,
    quiet_since: Option<Instant>,
}

impl NetworkIdleTracker {
    fn new(idle_window: Duration) -> Self {
        Self {
            idle_window,
            last_count: None,
            quiet_since: None,
        }
    }

    /// Records a probe; true once the document is complete and quiet for the whole window
    fn observe(&mut self, complete: bool, resources: u64, now: Instant) -> bool {
        if !complete {
            self.last_count = None;
            self.quiet_since = None;
            return false;
        }

        if self.last_count != Some(resources) {
            self.last_count = Some(resources);
            self.quiet_since = Some(now);
            return self.idle_window.is_zero();
        }

        self.quiet_since
            .is_some_and(|since| now.duration_since(since) >= self.idle_window)
    }
}

fn parse_probe(value: &Value) -> (bool, u64) {
    let complete = value
        .get(0)
        .and_then(Value::as_str)
        .is_some_and(|state| state == "complete");
    let resources = value.get(1).and_then(Value::as_u64).unwrap_or(0);
    (complete, resources)
}

fn capabilities(browser_args: &[String], page_load_timeout: Duration) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": browser_args }),
    );
    // The server enforces its own navigation limit, otherwise an abandoned goto runs for minutes
    caps.insert(
        "timeouts".to_string(),
        json!({ "pageLoad": page_load_timeout.as_millis() as u64 }),
    );
    caps
}

async fn close_client(client: Client, url: &str) {
    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close browser session for {}: {}", url, e);
    } else {
        ::log::trace!("Closed browser session for {}", url);
    }
}

fn navigation_error(url: &str, error: fantoccini::error::CmdError) -> NavigationError {
    NavigationError::Navigation {
        url: url.to_string(),
        message: error.to_string(),
    }
}

fn snapshot_error(url: &str, error: fantoccini::error::CmdError) -> ExtractionError {
    ExtractionError::Snapshot {
        url: url.to_string(),
        message: error.to_string(),
    }
}
