use crate::error::{ExtractionError, NavigationError};
use crate::parsers::PageSnapshot;
use std::future::Future;

/// Loads URLs into queryable pages
///
/// One renderer value is the browser context of a single run and is shared by
/// every page that run opens.
pub trait Renderer: Send + Sync {
    type Page: PageHandle;

    /// Load a URL and wait until it is rendered
    ///
    /// Implementations release anything they allocated before returning an error.
    fn load(&self, url: &str) -> impl Future<Output = Result<Self::Page, NavigationError>> + Send;
}

/// A rendered page owned by exactly one task
pub trait PageHandle: Send {
    /// Capture the current URL and DOM; may be called repeatedly
    fn snapshot(&self) -> impl Future<Output = Result<PageSnapshot, ExtractionError>> + Send;

    /// Release the page
    fn close(self) -> impl Future<Output = ()> + Send;
}
