use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(about = "Scrape a page and the pages it links to, exporting text records and an image archive")]
#[command(version)]
pub struct Args {
    /// Root URL to scrape
    pub url: String,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the export and archive are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// WebDriver server URL (also read from WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Maximum number of pages (browser sessions) open at once
    #[arg(long)]
    pub max_open_pages: Option<usize>,

    /// Maximum number of image downloads at once
    #[arg(long)]
    pub max_downloads: Option<usize>,
}
