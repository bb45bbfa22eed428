//! galleria-core: selection-aware pagination over a remote collection.
//!
//! The remote server owns an unbounded, authoritative dataset; this crate
//! keeps exactly one page of it resident and reconciles a locally-held
//! selection set against whatever window is currently loaded. Selections
//! survive page navigation without the full collection ever being
//! materialized locally.
//!
//! Three components, leaves first:
//! - [`PageStore`] — the current page plus a ticketed commit protocol that
//!   rejects responses from superseded requests.
//! - [`SelectionSet`] — the set of identifiers the user has marked,
//!   independent of what is currently loaded.
//! - [`PaginationController`] — sequencing of page-change requests and the
//!   per-row check-state view that binds the two together.
//!
//! Network transport lives behind the [`PageFetcher`] trait; the
//! `artic-client` crate provides the production implementation.

pub mod artwork;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod page;
pub mod selection;

pub use artwork::*;
pub use controller::*;
pub use error::*;
pub use fetch::*;
pub use page::*;
pub use selection::*;
