//! Error types for every stage of a run
//!
//! Navigation, extraction and asset errors are recoverable for hop pages and
//! images. Anything wrapped by [`ScrapeError`] fails the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// A page could not be loaded by the renderer
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("unsupported URL {url}: only http and https pages can be rendered")]
    UnsupportedScheme { url: String },

    #[error("failed to open a browser session for {url}: {message}")]
    Session { url: String, message: String },

    #[error("failed to navigate to {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("timed out loading {url}")]
    Timeout { url: String },
}

/// A loaded page could not be queried
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read page {url}: {message}")]
    Snapshot { url: String, message: String },

    #[error("invalid selector {selector}: {message}")]
    Selector { selector: String, message: String },
}

/// Loading or extracting a page failed
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// A single image could not be downloaded or staged
#[derive(Debug, Error)]
pub enum AssetFetchError {
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Fatal failure of a run; no artifacts are reported
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("root page failed: {0}")]
    Root(#[from] PageError),

    #[error("failed to prepare staging directory {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to build archive: {0}")]
    Archive(#[from] ArchiveError),

    #[error("failed to write export: {0}")]
    Export(#[from] ExportError),
}
