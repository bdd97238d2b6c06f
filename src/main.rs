use clap::Parser;
use page_harvest::{ScrapeConfig, Scraper};

mod args;
use args::Args;

/// Message reported to the caller on any fatal failure
const FAILURE_MESSAGE: &str = "Failed to scrape the website.";

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Received URL: {}", args.url);

    let config = match &args.config {
        Some(path) => match ScrapeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => ScrapeConfig::default(),
    }
    .with_env_overrides();

    let mut scraper = Scraper::new(args.url).with_config(config);
    if let Some(output_dir) = args.output_dir {
        scraper = scraper.with_output_dir(output_dir);
    }
    if let Some(webdriver_url) = args.webdriver_url {
        scraper = scraper.with_webdriver_url(webdriver_url);
    }
    if let Some(max_open_pages) = args.max_open_pages {
        scraper = scraper.with_max_open_pages(max_open_pages);
    }
    if let Some(max_downloads) = args.max_downloads {
        scraper = scraper.with_max_concurrent_downloads(max_downloads);
    }

    let start_time = std::time::Instant::now();
    match scraper.run().await {
        Ok(outcome) => {
            ::log::info!(
                "Scrape complete in {:.2} seconds",
                start_time.elapsed().as_secs_f64()
            );
            match serde_json::to_string_pretty(&outcome) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    ::log::error!("Failed to serialize result: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            ::log::error!("Error during scraping: {}", e);
            eprintln!("{}", FAILURE_MESSAGE);
            std::process::exit(1);
        }
    }
}
