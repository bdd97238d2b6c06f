use crate::assets::{self, AssetFetcher};
use crate::bundle;
use crate::config::ScrapeConfig;
use crate::crawlers::{Browser, Renderer, web};
use crate::error::{ArchiveError, ScrapeError};
use crate::export;
use crate::results::{HopOutcome, RunSummary, ScrapeOutcome};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Paths and identity of a single run
///
/// The staging directory and both artifacts stay on disk after the run;
/// removing them is up to whoever serves them.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub root_url: String,
    pub output_dir: PathBuf,
    pub staging_dir: PathBuf,
}

impl RunContext {
    /// Create a context with a fresh run id
    pub fn new(output_dir: &Path, root_url: &str) -> Self {
        Self::with_run_id(output_dir, root_url, Uuid::new_v4().to_string())
    }

    pub fn with_run_id(output_dir: &Path, root_url: &str, run_id: String) -> Self {
        Self {
            staging_dir: output_dir.join("images").join(&run_id),
            run_id,
            root_url: root_url.to_string(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn archive_file_name(&self) -> String {
        format!("images_{}.zip", self.run_id)
    }

    pub fn export_file_name(&self) -> String {
        format!("scrapedData_{}.csv", self.run_id)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.output_dir.join(self.archive_file_name())
    }

    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(self.export_file_name())
    }

    /// Creates the staging directory (and the output directory above it)
    pub fn prepare(&self) -> Result<(), ScrapeError> {
        std::fs::create_dir_all(&self.staging_dir).map_err(|source| ScrapeError::Staging {
            path: self.staging_dir.clone(),
            source,
        })
    }
}

/// Run the whole pipeline against a WebDriver browser
pub async fn run(config: &ScrapeConfig, root_url: &str) -> Result<ScrapeOutcome, ScrapeError> {
    let browser = Browser::new(config);
    run_with_renderer(&browser, config, root_url).await
}

/// Run the whole pipeline with the given renderer
///
/// Crawl, download root page images, archive them, then export the records.
/// Nothing is written to disk unless the root page loads.
pub async fn run_with_renderer<R: Renderer>(
    renderer: &R,
    config: &ScrapeConfig,
    root_url: &str,
) -> Result<ScrapeOutcome, ScrapeError> {
    let crawl = web::crawl(renderer, root_url).await?;

    let context = RunContext::new(&config.output_dir, root_url);
    context.prepare()?;
    ::log::info!(
        "Run {} staging images in {}",
        context.run_id,
        context.staging_dir.display()
    );

    let fetcher = AssetFetcher::new(config).map_err(ScrapeError::HttpClient)?;
    let outcomes = fetcher.fetch_all(&crawl.images, &context.staging_dir).await;
    let image_file_names: Vec<String> = assets::staged_assets(&outcomes)
        .into_iter()
        .flatten()
        .map(|asset| asset.file_name)
        .collect();

    let staging_dir = context.staging_dir.clone();
    let archive_path = context.archive_path();
    tokio::task::spawn_blocking(move || bundle::build(&staging_dir, &archive_path))
        .await
        .map_err(|e| ArchiveError::Task(e.to_string()))??;

    let summary = RunSummary {
        records: crawl.records.len(),
        hops_dispatched: crawl
            .hops
            .iter()
            .filter(|hop| !matches!(hop, HopOutcome::Skipped { .. }))
            .count(),
        hops_failed: crawl.hops.iter().filter(|hop| hop.is_failure()).count(),
        images_discovered: crawl.images.len(),
        images_staged: image_file_names.len(),
    };

    export::write(&context.export_path(), crawl.records, &image_file_names)?;

    ::log::info!("Run {} complete: {:?}", context.run_id, summary);

    Ok(ScrapeOutcome {
        export_file_path: format!("/{}", context.export_file_name()),
        archive_path: format!("/{}", context.archive_file_name()),
        run_id: context.run_id,
        summary,
    })
}
