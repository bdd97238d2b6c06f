use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default cap on simultaneously open pages
pub const DEFAULT_MAX_OPEN_PAGES: usize = 8;

/// Configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Directory the artifacts are written to and served from
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Arguments passed to the browser through the session capabilities
    #[serde(default = "default_browser_args")]
    pub browser_args: Vec<String>,

    /// Upper bound for navigation plus render-complete detection
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// How long the network must stay quiet before a page counts as rendered
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Maximum number of simultaneously open pages
    ///
    /// Each open page is its own WebDriver session and browser process, so
    /// this bounds the browsers running at once. `null` removes the cap.
    #[serde(default = "default_max_open_pages")]
    pub max_open_pages: Option<usize>,

    /// Maximum number of simultaneous image downloads (unbounded if unset)
    #[serde(default)]
    pub max_concurrent_downloads: Option<usize>,

    /// Per-image request timeout (none if unset)
    #[serde(default)]
    pub download_timeout_secs: Option<u64>,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Headless browser with the sandbox disabled
fn default_browser_args() -> Vec<String> {
    vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
    ]
}

fn default_page_load_timeout_secs() -> u64 {
    30
}

fn default_network_idle_ms() -> u64 {
    500
}

fn default_max_open_pages() -> Option<usize> {
    Some(DEFAULT_MAX_OPEN_PAGES)
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            output_dir: default_output_dir(),
            browser_args: default_browser_args(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            network_idle_ms: default_network_idle_ms(),
            max_open_pages: default_max_open_pages(),
            max_concurrent_downloads: None,
            download_timeout_secs: None,
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn download_timeout(&self) -> Option<Duration> {
        self.download_timeout_secs.map(Duration::from_secs)
    }
}
