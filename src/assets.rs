use crate::config::ScrapeConfig;
use crate::error::AssetFetchError;
use crate::results::{AssetOutcome, ImageRef, StagedAsset};
use futures::future::join_all;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Extension used when the content type is absent or unknown
pub const FALLBACK_EXTENSION: &str = "jpg";

/// Downloads discovered images into a staging directory
///
/// Sources are fetched with a plain HTTP GET, so only `http`/`https` sources
/// can succeed. Inline `data:` images are not decoded; they fail like an
/// unreachable source and leave their `image_<k>` slot empty.
pub struct AssetFetcher {
    client: Client,
    permits: Option<Arc<Semaphore>>,
}

impl AssetFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.download_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            permits: config
                .max_concurrent_downloads
                .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
        })
    }

    /// Fetch every image concurrently
    ///
    /// The result is index-aligned with `images`. The k-th image is staged as
    /// `image_k.<ext>` whether or not its siblings succeed.
    pub async fn fetch_all(&self, images: &[String], staging_dir: &Path) -> Vec<AssetOutcome> {
        let refs = ImageRef::enumerate(images);
        ::log::info!("Downloading {} images into {}", refs.len(), staging_dir.display());

        let outcomes = join_all(refs.iter().map(|image| self.fetch_one(image, staging_dir))).await;

        let staged = outcomes.iter().filter(|o| o.staged().is_some()).count();
        ::log::info!("Staged {} of {} images", staged, outcomes.len());
        outcomes
    }

    async fn fetch_one(&self, image: &ImageRef, staging_dir: &Path) -> AssetOutcome {
        let _permit = match &self.permits {
            Some(permits) => permits.acquire().await.ok(),
            None => None,
        };

        match self.download(image, staging_dir).await {
            Ok(asset) => {
                ::log::debug!("Saved {} as {}", image.source_url, asset.file_name);
                AssetOutcome::Staged(asset)
            }
            Err(e) => {
                ::log::warn!("Failed to download image {}: {}", image.source_url, e);
                AssetOutcome::Failed {
                    source_url: image.source_url.clone(),
                    cause: e.to_string(),
                }
            }
        }
    }

    async fn download(
        &self,
        image: &ImageRef,
        staging_dir: &Path,
    ) -> Result<StagedAsset, AssetFetchError> {
        let http_error = |source: reqwest::Error| AssetFetchError::Http {
            url: image.source_url.clone(),
            source,
        };

        let response = self
            .client
            .get(&image.source_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(http_error)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(http_error)?;

        let file_name = format!(
            "{}.{}",
            image.file_stem(),
            extension_for_content_type(content_type.as_deref())
        );
        let local_path = staging_dir.join(&file_name);

        tokio::fs::write(&local_path, &body)
            .await
            .map_err(|source| AssetFetchError::Write {
                path: local_path.clone(),
                source,
            })?;

        Ok(StagedAsset {
            file_name,
            local_path,
        })
    }
}

/// Index-aligned view of the staged assets, `None` where a download failed
pub fn staged_assets(outcomes: &[AssetOutcome]) -> Vec<Option<StagedAsset>> {
    outcomes.iter().map(|o| o.staged().cloned()).collect()
}

/// Primary file extension for a declared content type
///
/// Parameters such as `; charset=` are ignored. Unknown and missing types map
/// to [`FALLBACK_EXTENSION`].
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let Some(content_type) = content_type else {
        return FALLBACK_EXTENSION;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/pjpeg" => "jpeg",
        "image/png" => "png",
        "image/apng" => "apng",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        "image/bmp" | "image/x-ms-bmp" => "bmp",
        "image/tiff" => "tif",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        "image/heic" => "heic",
        "image/heif" => "heif",
        "image/jxl" => "jxl",
        "text/html" => "html",
        "text/plain" => "txt",
        "application/json" => "json",
        "application/pdf" => "pdf",
        "application/octet-stream" => "bin",
        _ => FALLBACK_EXTENSION,
    }
}
