//! Page window and the ticketed page store.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::error::FetchError;

/// A bounded, ordered window of the remote collection plus pagination
/// metadata.
///
/// Invariants: `page_number >= 1`, `page_size >= 1`,
/// `artworks.len() <= page_size`. A page is replaced wholesale on every
/// successful fetch, never mutated incrementally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub artworks: Vec<Artwork>,
    /// 1-based page number.
    pub page_number: u32,
    /// Requested rows per page.
    pub page_size: u32,
    /// Total records in the remote collection, as reported by the server.
    pub total_records: u64,
}

impl Page {
    /// Absolute offset of a row within the global collection:
    /// `(page_number - 1) * page_size + local_index`.
    pub fn offset_of(&self, local_index: usize) -> u64 {
        (u64::from(self.page_number) - 1) * u64::from(self.page_size) + local_index as u64
    }
}

/// Proof that a load was started, compared against the latest issued
/// sequence number at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Holds the current page and the in-flight bookkeeping.
///
/// Commit protocol: [`PageStore::begin_load`] hands out a monotonically
/// increasing ticket and raises `loading`; exactly one of
/// [`PageStore::commit`] / [`PageStore::fail`] resolves it. A ticket that is
/// no longer the latest is stale: the call is a no-op returning `false`, so
/// a superseded response can never overwrite the result of a newer request.
/// A stale resolution also leaves `loading` untouched — the newer request is
/// still outstanding.
#[derive(Debug, Default)]
pub struct PageStore {
    inner: Mutex<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    current: Option<Page>,
    last_error: Option<FetchError>,
    latest: u64,
    loading: bool,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load: bump the sequence number and raise `loading`.
    pub fn begin_load(&self) -> LoadTicket {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.loading = true;
        LoadTicket(inner.latest)
    }

    /// Install a fetched page and clear any prior error.
    ///
    /// Returns `false` without mutating anything if the ticket has been
    /// superseded by a newer `begin_load`.
    pub fn commit(&self, ticket: LoadTicket, page: Page) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.latest {
            return false;
        }
        inner.current = Some(page);
        inner.last_error = None;
        inner.loading = false;
        true
    }

    /// Record a fetch failure, keeping the previously displayed page —
    /// stale-but-available beats a blank table.
    ///
    /// Returns `false` without mutating anything if the ticket is stale.
    pub fn fail(&self, ticket: LoadTicket, error: FetchError) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.latest {
            return false;
        }
        inner.last_error = Some(error);
        inner.loading = false;
        true
    }

    /// The currently displayed page, if any fetch has ever succeeded.
    pub fn current(&self) -> Option<Page> {
        self.lock().current.clone()
    }

    /// True while the latest issued load is unresolved.
    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    /// Error from the most recent resolved load, cleared by the next
    /// successful commit.
    pub fn last_error(&self) -> Option<FetchError> {
        self.lock().last_error.clone()
    }

    /// True when the given parameters match the loaded page and no load is
    /// outstanding.
    pub fn is_loaded_idle(&self, page_number: u32, page_size: u32) -> bool {
        let inner = self.lock();
        !inner.loading
            && inner
                .current
                .as_ref()
                .is_some_and(|p| p.page_number == page_number && p.page_size == page_size)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("page store mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_number: u32, page_size: u32) -> Page {
        Page {
            artworks: Vec::new(),
            page_number,
            page_size,
            total_records: 100,
        }
    }

    #[test]
    fn commit_installs_page_and_clears_loading() {
        let store = PageStore::new();
        let ticket = store.begin_load();
        assert!(store.loading());

        assert!(store.commit(ticket, page(1, 10)));
        assert!(!store.loading());
        assert_eq!(store.current().unwrap().page_number, 1);
        assert!(store.last_error().is_none());
    }

    #[test]
    fn stale_commit_is_dropped() {
        let store = PageStore::new();
        let first = store.begin_load();
        let second = store.begin_load();

        assert!(!store.commit(first, page(2, 10)));
        assert!(store.current().is_none());
        // The newer load is still outstanding.
        assert!(store.loading());

        assert!(store.commit(second, page(3, 10)));
        assert_eq!(store.current().unwrap().page_number, 3);
    }

    #[test]
    fn fail_keeps_previous_page() {
        let store = PageStore::new();
        let ticket = store.begin_load();
        assert!(store.commit(ticket, page(2, 10)));

        let ticket = store.begin_load();
        assert!(store.fail(
            ticket,
            FetchError::Transport {
                message: "connection reset".into()
            }
        ));
        assert!(!store.loading());
        assert_eq!(store.current().unwrap().page_number, 2);
        assert!(matches!(
            store.last_error(),
            Some(FetchError::Transport { .. })
        ));
    }

    #[test]
    fn stale_failure_is_dropped() {
        let store = PageStore::new();
        let first = store.begin_load();
        let second = store.begin_load();

        assert!(!store.fail(first, FetchError::RateLimited));
        assert!(store.last_error().is_none());
        assert!(store.loading());

        assert!(store.commit(second, page(1, 5)));
        assert!(store.last_error().is_none());
    }

    #[test]
    fn commit_clears_prior_error() {
        let store = PageStore::new();
        let ticket = store.begin_load();
        store.fail(ticket, FetchError::RateLimited);
        assert!(store.last_error().is_some());

        let ticket = store.begin_load();
        store.commit(ticket, page(1, 10));
        assert!(store.last_error().is_none());
    }

    #[test]
    fn offset_mapping() {
        let p = page(3, 10);
        assert_eq!(p.offset_of(0), 20);
        assert_eq!(p.offset_of(9), 29);

        let p = page(1, 25);
        assert_eq!(p.offset_of(0), 0);
        assert_eq!(p.offset_of(24), 24);
    }

    #[test]
    fn is_loaded_idle_tracks_params_and_loading() {
        let store = PageStore::new();
        assert!(!store.is_loaded_idle(1, 10));

        let ticket = store.begin_load();
        store.commit(ticket, page(1, 10));
        assert!(store.is_loaded_idle(1, 10));
        assert!(!store.is_loaded_idle(2, 10));
        assert!(!store.is_loaded_idle(1, 25));

        store.begin_load();
        assert!(!store.is_loaded_idle(1, 10));
    }
}
