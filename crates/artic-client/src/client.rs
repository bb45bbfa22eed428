//! Art Institute of Chicago artworks API client.
//!
//! API docs: https://api.artic.edu/docs/
//! Listing endpoint: `GET /api/v1/artworks?page={n}&limit={size}`.

use serde::Deserialize;
use tracing::debug;

use galleria_core::{Artwork, FetchError, Page, PageFetcher};

use crate::http::HttpClient;

pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Raw listing response. Only the fields the core consumes are kept.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    data: Vec<ApiArtwork>,
    info: ApiInfo,
}

#[derive(Debug, Deserialize)]
struct ApiInfo {
    total_records: u64,
}

/// Wire shape of one artwork; descriptive fields are frequently null.
#[derive(Debug, Deserialize)]
struct ApiArtwork {
    id: u64,
    title: Option<String>,
    place_of_origin: Option<String>,
    artist_display: Option<String>,
    inscriptions: Option<String>,
    date_start: Option<i32>,
    date_end: Option<i32>,
}

impl From<ApiArtwork> for Artwork {
    fn from(raw: ApiArtwork) -> Self {
        Artwork {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            place_of_origin: raw.place_of_origin,
            artist_display: raw.artist_display,
            inscriptions: raw.inscriptions,
            date_start: raw.date_start,
            date_end: raw.date_end,
        }
    }
}

pub struct ArticClient {
    client: HttpClient,
    base_url: String,
}

impl ArticClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new("galleria/0.1 (https://github.com/galleria-app/galleria)"),
            base_url: base_url.into(),
        }
    }

    /// Normalize one artworks listing response into a [`Page`].
    ///
    /// The server reporting more records than the requested limit violates
    /// the page invariant and is treated as a malformed response.
    pub fn parse_page_response(
        json: &str,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page, FetchError> {
        let response: ApiResponse = serde_json::from_str(json).map_err(|e| FetchError::Parse {
            message: format!("invalid artworks JSON: {e}"),
        })?;

        if response.data.len() > page_size as usize {
            return Err(FetchError::Parse {
                message: format!(
                    "server returned {} records for a page of {}",
                    response.data.len(),
                    page_size
                ),
            });
        }

        Ok(Page {
            artworks: response.data.into_iter().map(Artwork::from).collect(),
            page_number,
            page_size,
            total_records: response.info.total_records,
        })
    }

    async fn fetch(&self, page_number: u32, page_size: u32) -> Result<Page, FetchError> {
        let url = format!("{}/artworks", self.base_url);
        let page = page_number.to_string();
        let limit = page_size.to_string();

        debug!(page_number, page_size, "fetching artworks page");
        let response = self
            .client
            .get_with_params(&url, &[("page", page.as_str()), ("limit", limit.as_str())])
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(FetchError::Transport {
                message: format!("HTTP {}", response.status),
            });
        }

        Self::parse_page_response(&response.body, page_number, page_size)
    }
}

impl PageFetcher for ArticClient {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> Result<Page, FetchError> {
        self.fetch(page_number, page_size).await
    }
}

impl Default for ArticClient {
    fn default() -> Self {
        Self::new()
    }
}
