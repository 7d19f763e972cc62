//! Client for the stock-photo search API.
//!
//! Zero results are a normal outcome, not an error: callers broaden the
//! query and retry. Download tracking is best-effort per the vendor's
//! attribution guidelines.

pub mod error;

pub use error::{Result, StockPhotoError};

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.stockphoto.dev/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotographerLinks {
    pub html: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photographer {
    pub name: String,
    pub links: PhotographerLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoLinks {
    pub download_location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub urls: PhotoUrls,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub user: Photographer,
    pub links: PhotoLinks,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

pub struct StockPhotoClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl StockPhotoClient {
    pub fn new(access_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_key: access_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Search landscape photos for a query. An empty result list is a valid
    /// response; the caller decides whether to broaden and retry.
    pub async fn search(&self, query: &str, per_page: u32) -> Result<Vec<Photo>> {
        let url = format!("{}/search/photos", self.base_url);

        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("query", query),
                ("per_page", &per_page.to_string()),
                ("orientation", "landscape"),
                ("content_filter", "high"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StockPhotoError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = resp.json().await?;
        debug!(query, count = parsed.results.len(), "Stock photo search");
        Ok(parsed.results)
    }

    /// Fire-and-forget download tracking per the vendor's guidelines, called
    /// for photos actually used. Failures are silently ignored; tracking is
    /// best-effort.
    pub async fn track_download(&self, download_location: &str) {
        let url = format!("{download_location}?client_id={}", self.access_key);
        let _ = self.http.get(&url).send().await;
    }
}
