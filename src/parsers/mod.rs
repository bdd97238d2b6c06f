pub mod html;

#[cfg(test)]
mod tests;

use crate::error::ExtractionError;
use crate::results::ExtractedRecord;
use url::Url;

/// Serialized DOM of a rendered page, captured from a live page handle
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// URL the page ended up on, after redirects
    pub url: Url,
    /// Serialized document
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }
}

/// Result of extracting a page
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Records in selector-group order
    pub records: Vec<ExtractedRecord>,
    /// Resolved href of every emitted anchor, duplicates included
    pub links: Vec<String>,
    /// Resolved, trimmed `src` of every image
    pub images: Vec<String>,
}

/// Main parser that turns a page snapshot into records
pub struct Parser;

impl Parser {
    /// Extract records, links and images from a rendered page
    pub fn extract(snapshot: &PageSnapshot) -> Result<Extraction, ExtractionError> {
        html::extract(snapshot)
    }
}
