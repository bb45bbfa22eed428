//! Artwork domain model, normalized from the upstream collection API.

use serde::{Deserialize, Serialize};

/// One record of the remote collection.
///
/// The upstream API leaves most descriptive fields nullable; the adapter
/// normalizes them to `Option` rather than inventing placeholder text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    /// Server-assigned identifier, stable across page-size changes.
    pub id: u64,
    pub title: String,
    pub place_of_origin: Option<String>,
    pub artist_display: Option<String>,
    pub inscriptions: Option<String>,
    pub date_start: Option<i32>,
    pub date_end: Option<i32>,
}
