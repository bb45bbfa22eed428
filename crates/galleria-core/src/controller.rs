//! Pagination controller: request sequencing, staleness rejection, and the
//! selection-bound row view.

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::artwork::Artwork;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::page::{Page, PageStore};
use crate::selection::{parse_bulk_spec, SelectionSet};

/// Identifier scheme used to key selections, fixed at construction.
///
/// The two schemes are not interchangeable: absolute offsets shift meaning
/// whenever the page size changes, while server ids do not. Prefer
/// [`IdScheme::ServerId`] whenever the upstream assigns ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdScheme {
    /// Key selections by the server-assigned record id.
    #[default]
    ServerId,
    /// Key selections by the record's absolute position in the remote
    /// collection (`(page_number - 1) * page_size + local_index`).
    ///
    /// Page-size-fragile: an offset selected under one page size designates
    /// a different record under another. Use only when the upstream has no
    /// stable ids.
    RowOffset,
}

/// Result of a page-change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched page was installed.
    Committed,
    /// A newer request was issued before this one resolved; its result was
    /// dropped without touching the store.
    Superseded,
    /// The requested page was already loaded and idle; no fetch was issued.
    AlreadyLoaded,
}

/// One row of the visible window with its derived check state.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub artwork: Artwork,
    /// Identifier under the controller's configured scheme.
    pub id: u64,
    pub checked: bool,
}

/// Orchestrates page fetches and binds the loaded window to the selection
/// set.
///
/// Two observable states: idle (`loading() == false`, the store holds the
/// last good page) and fetching. A fetch always resolves back to idle,
/// success or failure — there is no stuck state. A page change issued while
/// a fetch is in flight supersedes it: only the response matching the
/// latest requested parameters is ever committed, enforced by ticket
/// comparison at the store boundary.
///
/// The selection set is injected at construction and exposed by reference;
/// there is no hidden global. Selection mutations are synchronous and safe
/// while a fetch is in flight.
pub struct PaginationController<F> {
    fetcher: F,
    store: PageStore,
    selection: SelectionSet,
    id_scheme: IdScheme,
    requested: Mutex<Option<(u32, u32)>>,
}

impl<F: PageFetcher> PaginationController<F> {
    pub fn new(fetcher: F, id_scheme: IdScheme, selection: SelectionSet) -> Self {
        Self {
            fetcher,
            store: PageStore::new(),
            selection,
            id_scheme,
            requested: Mutex::new(None),
        }
    }

    /// Request the given page and commit its result unless superseded.
    ///
    /// A request matching the currently loaded page while idle is a no-op.
    /// On failure the previously displayed page stays visible, `loading()`
    /// resets, and the error is both returned and kept available through
    /// [`last_error`](Self::last_error). Nothing is retried automatically.
    pub async fn change_page(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<LoadOutcome, FetchError> {
        if page_number == 0 {
            return Err(FetchError::InvalidRequest {
                message: "page_number must be >= 1".into(),
            });
        }
        if page_size == 0 {
            return Err(FetchError::InvalidRequest {
                message: "page_size must be >= 1".into(),
            });
        }
        if self.store.is_loaded_idle(page_number, page_size) {
            return Ok(LoadOutcome::AlreadyLoaded);
        }
        self.issue(page_number, page_size).await
    }

    /// Re-issue the most recently requested page unconditionally.
    ///
    /// This is the manual recovery path after a failed fetch; the
    /// controller never retries on its own.
    pub async fn retry(&self) -> Result<LoadOutcome, FetchError> {
        let params = *self.lock_requested();
        match params {
            Some((page_number, page_size)) => self.issue(page_number, page_size).await,
            None => Err(FetchError::InvalidRequest {
                message: "no page has been requested yet".into(),
            }),
        }
    }

    async fn issue(&self, page_number: u32, page_size: u32) -> Result<LoadOutcome, FetchError> {
        *self.lock_requested() = Some((page_number, page_size));
        let ticket = self.store.begin_load();
        debug!(page_number, page_size, "issuing page fetch");

        match self.fetcher.fetch_page(page_number, page_size).await {
            Ok(page) => {
                if self.store.commit(ticket, page) {
                    debug!(page_number, page_size, "page committed");
                    Ok(LoadOutcome::Committed)
                } else {
                    debug!(page_number, page_size, "stale response dropped");
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(err) => {
                if self.store.fail(ticket, err.clone()) {
                    warn!(page_number, page_size, error = %err, "page fetch failed");
                    Err(err)
                } else {
                    debug!(page_number, page_size, "stale failure dropped");
                    Ok(LoadOutcome::Superseded)
                }
            }
        }
    }

    /// The currently displayed page, if any fetch has succeeded.
    pub fn current_page(&self) -> Option<Page> {
        self.store.current()
    }

    /// True while a fetch for the latest requested page is outstanding.
    pub fn loading(&self) -> bool {
        self.store.loading()
    }

    /// Error from the most recent resolved fetch, for the rendering layer
    /// to display. Cleared by the next successful load.
    pub fn last_error(&self) -> Option<FetchError> {
        self.store.last_error()
    }

    /// The injected selection set.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Sorted snapshot of the selected identifiers.
    pub fn selected_ids(&self) -> Vec<u64> {
        self.selection.ids()
    }

    /// The visible window with per-row check state derived from the
    /// selection set under the configured identifier scheme.
    pub fn rows(&self) -> Vec<Row> {
        let Some(page) = self.store.current() else {
            return Vec::new();
        };
        page.artworks
            .iter()
            .enumerate()
            .map(|(i, artwork)| {
                let id = self.derived_id(&page, i, artwork);
                Row {
                    artwork: artwork.clone(),
                    id,
                    checked: self.selection.is_selected(id),
                }
            })
            .collect()
    }

    /// Check state of one visible row; false when the index is out of the
    /// loaded window.
    pub fn is_row_checked(&self, local_index: usize) -> bool {
        self.store
            .current()
            .and_then(|page| {
                page.artworks
                    .get(local_index)
                    .map(|artwork| self.derived_id(&page, local_index, artwork))
            })
            .is_some_and(|id| self.selection.is_selected(id))
    }

    /// Toggle the selection of one visible row. Returns the derived
    /// identifier, or `None` when no such row is loaded.
    pub fn toggle_row(&self, local_index: usize) -> Option<u64> {
        let page = self.store.current()?;
        let artwork = page.artworks.get(local_index)?;
        let id = self.derived_id(&page, local_index, artwork);
        self.selection.toggle(id);
        Some(id)
    }

    /// Replace the selection with every row of the currently loaded page.
    ///
    /// Scoped to the loaded page by design: the full remote collection is
    /// never resident, so "select all" cannot reach records that were never
    /// fetched. Prior selections on other pages are discarded — this is
    /// full replacement, not union.
    pub fn select_all_visible(&self) {
        let ids: Vec<u64> = match self.store.current() {
            Some(page) => page
                .artworks
                .iter()
                .enumerate()
                .map(|(i, artwork)| self.derived_id(&page, i, artwork))
                .collect(),
            None => Vec::new(),
        };
        self.selection.replace_all(ids);
    }

    /// Empty the selection.
    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    /// Replace the selection from a comma-separated text entry, per
    /// [`parse_bulk_spec`]. Unparsable tokens are silently discarded; empty
    /// input clears the selection.
    ///
    /// The entered numbers are interpreted in the controller's identifier
    /// scheme: server ids under [`IdScheme::ServerId`], absolute offsets
    /// under [`IdScheme::RowOffset`].
    pub fn apply_bulk_spec(&self, text: &str) {
        self.selection.replace_all(parse_bulk_spec(text));
    }

    fn derived_id(&self, page: &Page, local_index: usize, artwork: &Artwork) -> u64 {
        match self.id_scheme {
            IdScheme::ServerId => artwork.id,
            IdScheme::RowOffset => page.offset_of(local_index),
        }
    }

    fn lock_requested(&self) -> std::sync::MutexGuard<'_, Option<(u32, u32)>> {
        self.requested.lock().expect("controller mutex poisoned")
    }
}
