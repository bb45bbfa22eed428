//! Overlapping-request behavior of the pagination controller.
//!
//! A page change issued while another is in flight supersedes it; only the
//! response matching the latest request may ever reach the store, whatever
//! order the network resolves them in.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use galleria_core::{
    Artwork, FetchError, IdScheme, LoadOutcome, Page, PageFetcher, PaginationController,
    SelectionSet,
};
use tokio::sync::oneshot;

fn make_page(page_number: u32, page_size: u32) -> Page {
    let artworks = (0..page_size)
        .map(|i| Artwork {
            id: u64::from(page_number) * 100 + u64::from(i),
            title: format!("Artwork {page_number}/{i}"),
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        })
        .collect();
    Page {
        artworks,
        page_number,
        page_size,
        total_records: 500,
    }
}

#[derive(Default)]
struct GateState {
    gates: Mutex<HashMap<u32, oneshot::Receiver<Result<Page, FetchError>>>>,
    started: Mutex<HashSet<u32>>,
}

/// Fetcher whose responses are released by the test through oneshot
/// channels, keyed by page number.
#[derive(Clone, Default)]
struct GatedFetcher(Arc<GateState>);

impl GatedFetcher {
    fn register(&self, page_number: u32) -> oneshot::Sender<Result<Page, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.0.gates.lock().unwrap().insert(page_number, rx);
        tx
    }

    async fn wait_started(&self, page_number: u32) {
        while !self.0.started.lock().unwrap().contains(&page_number) {
            tokio::task::yield_now().await;
        }
    }
}

impl PageFetcher for GatedFetcher {
    async fn fetch_page(&self, page_number: u32, _page_size: u32) -> Result<Page, FetchError> {
        let rx = {
            self.0.started.lock().unwrap().insert(page_number);
            self.0
                .gates
                .lock()
                .unwrap()
                .remove(&page_number)
                .expect("no gate registered for this page")
        };
        rx.await.expect("gate sender dropped")
    }
}

fn controller(fetcher: GatedFetcher) -> Arc<PaginationController<GatedFetcher>> {
    Arc::new(PaginationController::new(
        fetcher,
        IdScheme::ServerId,
        SelectionSet::new(),
    ))
}

#[tokio::test]
async fn later_request_wins_even_when_it_resolves_first() {
    let fetcher = GatedFetcher::default();
    let ctrl = controller(fetcher.clone());
    let release_a = fetcher.register(2);
    let release_b = fetcher.register(3);

    let a = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(2, 10).await }
    });
    fetcher.wait_started(2).await;
    assert!(ctrl.loading());

    let b = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(3, 10).await }
    });
    fetcher.wait_started(3).await;

    // B resolves first and commits.
    release_b.send(Ok(make_page(3, 10))).unwrap();
    assert_eq!(b.await.unwrap().unwrap(), LoadOutcome::Committed);
    assert_eq!(ctrl.current_page().unwrap().page_number, 3);

    // A resolves afterwards; its page must never overwrite B's.
    release_a.send(Ok(make_page(2, 10))).unwrap();
    assert_eq!(a.await.unwrap().unwrap(), LoadOutcome::Superseded);
    assert_eq!(ctrl.current_page().unwrap().page_number, 3);
    assert!(!ctrl.loading());
}

#[tokio::test]
async fn stale_resolution_leaves_loading_up_for_newer_request() {
    let fetcher = GatedFetcher::default();
    let ctrl = controller(fetcher.clone());
    let release_a = fetcher.register(2);
    let release_b = fetcher.register(3);

    let a = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(2, 10).await }
    });
    fetcher.wait_started(2).await;
    let b = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(3, 10).await }
    });
    fetcher.wait_started(3).await;

    // A resolves while B is still outstanding: dropped, loading stays up.
    release_a.send(Ok(make_page(2, 10))).unwrap();
    assert_eq!(a.await.unwrap().unwrap(), LoadOutcome::Superseded);
    assert!(ctrl.loading());
    assert!(ctrl.current_page().is_none());

    release_b.send(Ok(make_page(3, 10))).unwrap();
    assert_eq!(b.await.unwrap().unwrap(), LoadOutcome::Committed);
    assert!(!ctrl.loading());
    assert_eq!(ctrl.current_page().unwrap().page_number, 3);
}

#[tokio::test]
async fn stale_failure_is_never_surfaced() {
    let fetcher = GatedFetcher::default();
    let ctrl = controller(fetcher.clone());
    let release_a = fetcher.register(2);
    let release_b = fetcher.register(3);

    let a = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(2, 10).await }
    });
    fetcher.wait_started(2).await;
    let b = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(3, 10).await }
    });
    fetcher.wait_started(3).await;

    release_b.send(Ok(make_page(3, 10))).unwrap();
    assert_eq!(b.await.unwrap().unwrap(), LoadOutcome::Committed);

    // The superseded request fails on the wire; the caller sees a quiet
    // Superseded outcome, not an error, and no error is recorded.
    release_a.send(Err(FetchError::Transport {
        message: "socket closed".into(),
    }))
    .unwrap();
    assert_eq!(a.await.unwrap().unwrap(), LoadOutcome::Superseded);
    assert!(ctrl.last_error().is_none());
    assert_eq!(ctrl.current_page().unwrap().page_number, 3);
}

#[tokio::test]
async fn selection_is_mutable_while_fetch_is_in_flight() {
    let fetcher = GatedFetcher::default();
    let ctrl = controller(fetcher.clone());
    let release = fetcher.register(1);

    let load = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.change_page(1, 10).await }
    });
    fetcher.wait_started(1).await;
    assert!(ctrl.loading());

    // Selection mutations are synchronous and never touch the network.
    ctrl.selection().toggle(104);
    ctrl.apply_bulk_spec("101, 104");
    assert_eq!(ctrl.selected_ids(), vec![101, 104]);

    release.send(Ok(make_page(1, 10))).unwrap();
    assert_eq!(load.await.unwrap().unwrap(), LoadOutcome::Committed);

    // The completed fetch did not reset the selection.
    assert_eq!(ctrl.selected_ids(), vec![101, 104]);
    let checked: Vec<u64> = ctrl
        .rows()
        .into_iter()
        .filter(|r| r.checked)
        .map(|r| r.id)
        .collect();
    assert_eq!(checked, vec![101, 104]);
}
