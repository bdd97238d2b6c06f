use crate::crawlers::crawler::{PageHandle, Renderer};
use crate::error::{PageError, ScrapeError};
use crate::filter::{self, HopTarget};
use crate::parsers::{Extraction, Parser};
use crate::results::{ContentRecord, CrawlOutput, HopOutcome};
use futures::future::join_all;

/// Crawls the root page and every page it links to, one hop deep
///
/// Fails only when the root page cannot be loaded or extracted. Hop pages are
/// fetched concurrently; a failing hop is logged and contributes no records.
/// Hop records are merged in link discovery order, whatever order the
/// fetches complete in.
pub async fn crawl<R: Renderer>(renderer: &R, root_url: &str) -> Result<CrawlOutput, ScrapeError> {
    ::log::info!("Starting crawl for: {}", root_url);

    let root = match load_and_extract(renderer, root_url).await {
        Ok(extraction) => extraction,
        Err(e) => {
            ::log::error!("Failed to scrape root page {}: {}", root_url, e);
            return Err(e.into());
        }
    };

    ::log::info!(
        "Root page {} yielded {} records, {} links, {} images",
        root_url,
        root.records.len(),
        root.links.len(),
        root.images.len()
    );

    let mut records: Vec<ContentRecord> = root
        .records
        .into_iter()
        .map(|record| record.into_record(root_url))
        .collect();

    let targets = filter::hop_targets(&root.links, root_url);
    let dispatched = targets
        .iter()
        .filter(|target| matches!(target, HopTarget::Fetch(_)))
        .count();
    ::log::info!("Dispatching {} hop fetches from {}", dispatched, root_url);

    // join_all yields results in dispatch order
    let results = join_all(targets.iter().map(|target| fetch_hop(renderer, target))).await;

    let mut hops = Vec::with_capacity(results.len());
    for (hop_records, outcome) in results {
        records.extend(hop_records);
        hops.push(outcome);
    }

    let failed = hops.iter().filter(|hop| hop.is_failure()).count();
    if failed > 0 {
        ::log::warn!("{} of {} hop pages failed", failed, dispatched);
    }

    Ok(CrawlOutput {
        records,
        images: root.images,
        hops,
    })
}

/// Loads a page, extracts it and closes it again, on every path
pub async fn load_and_extract<R: Renderer>(renderer: &R, url: &str) -> Result<Extraction, PageError> {
    let page = renderer.load(url).await?;

    let extraction = match page.snapshot().await {
        Ok(snapshot) => Parser::extract(&snapshot),
        Err(e) => Err(e),
    };

    page.close().await;
    Ok(extraction?)
}

async fn fetch_hop<R: Renderer>(renderer: &R, target: &HopTarget) -> (Vec<ContentRecord>, HopOutcome) {
    let url = match target {
        HopTarget::Fetch(url) => url,
        HopTarget::Skip(link) => {
            return (Vec::new(), HopOutcome::Skipped { link: link.clone() });
        }
    };

    match load_and_extract(renderer, url).await {
        Ok(extraction) => {
            let records: Vec<ContentRecord> = extraction
                .records
                .into_iter()
                .map(|record| record.into_record(url))
                .collect();
            ::log::debug!("Hop {} yielded {} records", url, records.len());
            let outcome = HopOutcome::Fetched {
                url: url.clone(),
                records: records.len(),
            };
            (records, outcome)
        }
        Err(e) => {
            ::log::warn!("Failed to scrape link {}: {}", url, e);
            (
                Vec::new(),
                HopOutcome::Failed {
                    url: url.clone(),
                    cause: e.to_string(),
                },
            )
        }
    }
}
