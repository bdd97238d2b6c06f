use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Element kinds the extractor visits, in selector-group order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    A,
}

impl Tag {
    /// All tag kinds, in the order their records are emitted
    pub const ALL: [Tag; 8] = [
        Tag::P,
        Tag::H1,
        Tag::H2,
        Tag::H3,
        Tag::H4,
        Tag::H5,
        Tag::H6,
        Tag::A,
    ];

    /// Lowercase element name, also used as the CSS selector
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::P => "p",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::A => "a",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as produced by the extractor, before it is tied to a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub tag: Tag,
    pub content: String,
    pub href: Option<String>,
}

impl ExtractedRecord {
    /// Attach the URL of the page this record came from
    pub fn into_record(self, page_url: &str) -> ContentRecord {
        ContentRecord {
            tag: self.tag,
            content: self.content,
            href: self.href,
            page_url: page_url.to_string(),
            asset_ref: None,
        }
    }
}

/// One extracted piece of content, tagged with its source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Element kind
    pub tag: Tag,

    /// Trimmed text content (may be empty for anchors)
    pub content: String,

    /// Resolved href, anchors only
    pub href: Option<String>,

    /// Page the record was extracted from
    #[serde(rename = "pageUrl")]
    pub page_url: String,

    /// Staged asset name correlated to this record, if any
    #[serde(rename = "image")]
    pub asset_ref: Option<String>,
}

/// An image discovered on the root page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub source_url: String,

    /// Zero-based position in discovery order
    pub index: usize,
}

impl ImageRef {
    /// Number every source URL by its discovery position
    pub fn enumerate(sources: &[String]) -> Vec<ImageRef> {
        sources
            .iter()
            .enumerate()
            .map(|(index, source_url)| ImageRef {
                source_url: source_url.clone(),
                index,
            })
            .collect()
    }

    /// File stem shared by every extension, `image_<1-based index>`
    pub fn file_stem(&self) -> String {
        format!("image_{}", self.index + 1)
    }
}

/// A downloaded image written to the staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAsset {
    pub file_name: String,
    pub local_path: PathBuf,
}

/// Result of fetching a single hop page
#[derive(Debug, Clone)]
pub enum HopOutcome {
    /// Page loaded and extracted
    Fetched { url: String, records: usize },

    /// Link was not http(s) or could not be resolved
    Skipped { link: String },

    /// Navigation or extraction failed; the hop contributed nothing
    Failed { url: String, cause: String },
}

impl HopOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, HopOutcome::Failed { .. })
    }
}

/// Result of fetching a single image
#[derive(Debug, Clone)]
pub enum AssetOutcome {
    Staged(StagedAsset),
    Failed { source_url: String, cause: String },
}

impl AssetOutcome {
    pub fn staged(&self) -> Option<&StagedAsset> {
        match self {
            AssetOutcome::Staged(asset) => Some(asset),
            AssetOutcome::Failed { .. } => None,
        }
    }
}

/// Output of the crawl stage: merged records plus the root page's images
#[derive(Debug, Clone, Default)]
pub struct CrawlOutput {
    pub records: Vec<ContentRecord>,
    pub images: Vec<String>,
    pub hops: Vec<HopOutcome>,
}

/// Counters describing how complete a finished run is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub records: usize,
    pub hops_dispatched: usize,
    pub hops_failed: usize,
    pub images_discovered: usize,
    pub images_staged: usize,
}

/// What a successful run hands back to its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    pub run_id: String,

    /// Served name of the tabular export, e.g. `/scrapedData_<id>.csv`
    pub export_file_path: String,

    /// Served name of the image archive, e.g. `/images_<id>.zip`
    pub archive_path: String,

    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_group_order() {
        let names: Vec<&str> = Tag::ALL.iter().map(Tag::as_str).collect();
        assert_eq!(names, ["p", "h1", "h2", "h3", "h4", "h5", "h6", "a"]);
    }

    #[test]
    fn test_image_ref_file_stem_is_one_based() {
        let refs = ImageRef::enumerate(&["http://x/a.png".to_string(), "http://x/b".to_string()]);
        assert_eq!(refs[0].file_stem(), "image_1");
        assert_eq!(refs[1].file_stem(), "image_2");
        assert_eq!(refs[1].source_url, "http://x/b");
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let outcome = ScrapeOutcome {
            run_id: "abc".to_string(),
            export_file_path: "/scrapedData_abc.csv".to_string(),
            archive_path: "/images_abc.zip".to_string(),
            summary: RunSummary::default(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["exportFilePath"], "/scrapedData_abc.csv");
        assert_eq!(json["archivePath"], "/images_abc.zip");
        assert_eq!(json["summary"]["hopsFailed"], 0);
    }
}
