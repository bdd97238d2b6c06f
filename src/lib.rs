// Re-export modules
pub mod assets;
pub mod bundle;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod export;
pub mod filter;
pub mod parsers;
pub mod pipeline;
pub mod results;

// Re-export commonly used types for convenience
pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use results::{ContentRecord, ScrapeOutcome, Tag};

use crawlers::Renderer;
use std::path::PathBuf;

/// Main builder for a scrape run of a single root URL
pub struct Scraper {
    root_url: String,
    config: ScrapeConfig,
}

impl Scraper {
    /// Create a new Scraper for the given root URL with default settings
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            config: ScrapeConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScrapeConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = ScrapeConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = ScrapeConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Set the WebDriver server to render pages with
    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.webdriver_url = webdriver_url.into();
        self
    }

    /// Set the directory artifacts are written to
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Cap the number of simultaneously open pages
    pub fn with_max_open_pages(mut self, max_open_pages: usize) -> Self {
        self.config.max_open_pages = Some(max_open_pages);
        self
    }

    /// Cap the number of simultaneous image downloads
    pub fn with_max_concurrent_downloads(mut self, max_downloads: usize) -> Self {
        self.config.max_concurrent_downloads = Some(max_downloads);
        self
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run against the configured WebDriver server
    pub async fn run(self) -> Result<ScrapeOutcome, ScrapeError> {
        pipeline::run(&self.config, &self.root_url).await
    }

    /// Run with a caller-supplied renderer
    pub async fn run_with<R: Renderer>(self, renderer: &R) -> Result<ScrapeOutcome, ScrapeError> {
        pipeline::run_with_renderer(renderer, &self.config, &self.root_url).await
    }
}
