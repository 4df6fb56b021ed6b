// Copyright (c) 2026 Obscursa Project
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/obscursa/obscursa-core

//! Cover photograph acquisition.
//!
//! Every encode needs a fresh cover photo to carry the hidden key; covers
//! are never reused across operations. The core depends only on the
//! [`CoverSource`] trait. [`PexelsCoverSource`] is the stock
//! implementation, fetching a random photo from the Pexels search API —
//! the API key and search query are explicit configuration, not process
//! environment reads.

use serde::Deserialize;

use crate::escrow::error::EscrowError;

/// Supplies cover photographs for key embedding.
///
/// Returned bytes must be decodable by the raster codec the pipeline was
/// constructed with.
pub trait CoverSource {
    fn fetch_cover(&self) -> Result<Vec<u8>, EscrowError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    photos: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    src: PhotoSrc,
}

#[derive(Deserialize)]
struct PhotoSrc {
    original: String,
}

/// Cover source backed by the Pexels photo search API.
pub struct PexelsCoverSource {
    api_key: String,
    query: String,
    client: reqwest::blocking::Client,
}

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

impl PexelsCoverSource {
    /// Create a source searching Pexels for `query` photos.
    pub fn new(api_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            query: query.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn search(&self) -> Result<Vec<Photo>, EscrowError> {
        let response = self
            .client
            .get(PEXELS_SEARCH_URL)
            .query(&[("query", self.query.as_str())])
            .header("Authorization", &self.api_key)
            .send()
            .map_err(|e| EscrowError::CoverSource(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EscrowError::CoverSource(format!(
                "photo search returned {}",
                response.status()
            )));
        }

        let body = response.bytes().map_err(|e| EscrowError::CoverSource(e.to_string()))?;
        let parsed: SearchResponse =
            serde_json::from_slice(&body).map_err(|e| EscrowError::CoverSource(e.to_string()))?;
        Ok(parsed.photos)
    }
}

impl CoverSource for PexelsCoverSource {
    fn fetch_cover(&self) -> Result<Vec<u8>, EscrowError> {
        use rand::Rng;

        let photos = self.search()?;
        if photos.is_empty() {
            return Err(EscrowError::CoverSource(format!(
                "no photos found for query '{}'",
                self.query
            )));
        }

        let pick = rand::thread_rng().gen_range(0..photos.len());
        let url = &photos[pick].src.original;
        log::debug!("fetching cover photo {} of {}", pick + 1, photos.len());

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| EscrowError::CoverSource(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EscrowError::CoverSource(format!(
                "cover download returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().map_err(|e| EscrowError::CoverSource(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
