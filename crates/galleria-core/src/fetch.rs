//! Fetch boundary between the pagination core and the remote collection.

use std::future::Future;

use crate::error::FetchError;
use crate::page::Page;

/// One page-granular round trip to the server that owns the collection.
///
/// Implementations normalize the server's wire format into a [`Page`];
/// `artic-client` provides the production implementation and tests inject
/// mocks. The controller awaits at most the transport's own timeout — no
/// additional timeout or retry policy is layered on top.
pub trait PageFetcher {
    /// Fetch the given 1-based page at the given page size.
    fn fetch_page(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Page, FetchError>> + Send;
}
