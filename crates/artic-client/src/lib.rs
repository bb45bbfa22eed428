//! artic-client — Rust client for the Art Institute of Chicago artworks API.
//!
//! Implements `galleria-core`'s [`PageFetcher`](galleria_core::PageFetcher)
//! boundary against `https://api.artic.edu`: a thin reqwest-backed HTTP
//! layer plus pure JSON normalization into the core's page shape.

pub mod client;
pub mod http;

pub use client::*;
pub use http::*;
