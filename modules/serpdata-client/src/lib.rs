//! Client for the SerpData keyword-research API.
//!
//! Two request shapes against the same vendor: `suggest` fans a seed keyword
//! out into related-keyword discovery, `lookup` validates an exact keyword
//! batch with measured volume/difficulty. Both tolerate partial and zero
//! results; transient failures retry with backoff before degrading.

pub mod error;

pub use error::{Result, SerpdataError};

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.serpdata.io/v2";

/// Fixed delay between sequential requests to avoid burst rate-limiting.
const REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Max attempts for a single request before giving up on it.
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff; actual delay is base * 3^attempt plus 0-250ms jitter.
const RETRY_BASE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyVolume {
    pub year: i32,
    pub month: u32,
    pub search_volume: u64,
}

/// One keyword row as returned by the vendor. Every metric is optional;
/// the vendor routinely omits fields for low-traffic keywords.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    #[serde(default)]
    pub search_volume: Option<u64>,
    #[serde(default)]
    pub keyword_difficulty: Option<u8>,
    #[serde(default)]
    pub cpc: Option<f64>,
    #[serde(default)]
    pub serp_features: Vec<String>,
    #[serde(default)]
    pub search_intent: Option<String>,
    #[serde(default)]
    pub monthly_searches: Vec<MonthlyVolume>,
}

impl KeywordRecord {
    /// Direct volume when present, otherwise the monthly-history fallback.
    pub fn effective_volume(&self) -> u64 {
        derive_search_volume(self.search_volume, &self.monthly_searches)
    }
}

/// Derive search volume when the direct figure is absent or zero: the rounded
/// average of the most recent 12 monthly data points with nonzero volume.
pub fn derive_search_volume(direct: Option<u64>, monthly: &[MonthlyVolume]) -> u64 {
    if let Some(v) = direct {
        if v > 0 {
            return v;
        }
    }

    let mut with_data: Vec<&MonthlyVolume> =
        monthly.iter().filter(|m| m.search_volume > 0).collect();
    if with_data.is_empty() {
        return 0;
    }
    with_data.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    let recent = &with_data[..with_data.len().min(12)];

    let sum: u64 = recent.iter().map(|m| m.search_volume).sum();
    (sum as f64 / recent.len() as f64).round() as u64
}

#[derive(Serialize)]
struct SuggestRequest<'a> {
    seed: &'a str,
    limit: u32,
    include_serp_info: bool,
}

#[derive(Serialize)]
struct MetricsRequest<'a> {
    keywords: &'a [String],
}

#[derive(Deserialize)]
struct KeywordResponse {
    #[serde(default)]
    results: Vec<KeywordRecord>,
}

pub struct SerpdataClient {
    http: reqwest::Client,
    base_url: String,
    login: String,
    password: String,
    request_delay: Duration,
}

impl SerpdataClient {
    pub fn new(login: &str, password: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            login: login.to_string(),
            password: password.to_string(),
            request_delay: REQUEST_DELAY,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Broad discovery: related-keyword suggestions for each seed.
    ///
    /// One request per seed (vendor plan limits), spaced by the request
    /// delay. A seed that keeps failing is skipped with a warning rather
    /// than failing the batch; the result is deduplicated by lowercased
    /// keyword, first occurrence wins.
    pub async fn suggest(&self, seeds: &[String], limit_per_seed: u32) -> Result<Vec<KeywordRecord>> {
        let mut all = Vec::new();

        for (i, seed) in seeds.iter().enumerate() {
            let body = SuggestRequest {
                seed,
                limit: limit_per_seed,
                include_serp_info: true,
            };

            match self.post_with_retry("/keywords/suggestions", &body).await {
                Ok(response) => all.extend(response.results),
                Err(e) => warn!(seed = seed.as_str(), error = %e, "Suggestion request failed, skipping seed"),
            }

            if i + 1 < seeds.len() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let mut seen = HashSet::new();
        all.retain(|r| seen.insert(r.keyword.to_lowercase()));

        debug!(count = all.len(), "SerpData suggestions fetched");
        Ok(all)
    }

    /// Exact-match validation: measured metrics for the submitted keywords.
    /// Keywords the vendor has no data for are simply absent from the result.
    pub async fn lookup(&self, keywords: &[String]) -> Result<Vec<KeywordRecord>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let body = MetricsRequest { keywords };
        let response = self.post_with_retry("/keywords/metrics", &body).await?;

        debug!(
            submitted = keywords.len(),
            returned = response.results.len(),
            "SerpData exact lookup fetched"
        );
        Ok(response.results)
    }

    /// POST with retry on transient failures (connect errors, 429, 5xx).
    /// Backoff is exponential with jitter; non-transient API errors surface
    /// immediately.
    async fn post_with_retry<B: Serialize>(&self, path: &str, body: &B) -> Result<KeywordResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_err: Option<SerpdataError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let backoff = RETRY_BASE * 3u32.pow(attempt - 1);
                let jitter = Duration::from_millis(rand::rng().random_range(0..250));
                tokio::time::sleep(backoff + jitter).await;
            }

            let sent = self
                .http
                .post(&url)
                .basic_auth(&self.login, Some(&self.password))
                .json(body)
                .send()
                .await;

            match sent {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(resp.json().await?);
                    }
                    let message = resp.text().await.unwrap_or_default();
                    let err = SerpdataError::Api {
                        status: status.as_u16(),
                        message,
                    };
                    if status.as_u16() == 429 || status.is_server_error() {
                        warn!(attempt, %status, "Transient SerpData error, retrying");
                        last_err = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "SerpData request failed, retrying");
                    last_err = Some(e.into());
                }
            }
        }

        Err(last_err.expect("at least one attempt was made"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month_n: u32, volume: u64) -> MonthlyVolume {
        MonthlyVolume {
            year,
            month: month_n,
            search_volume: volume,
        }
    }

    #[test]
    fn direct_volume_wins() {
        let monthly = vec![month(2026, 1, 900)];
        assert_eq!(derive_search_volume(Some(500), &monthly), 500);
    }

    #[test]
    fn zero_direct_volume_falls_back_to_monthly() {
        let monthly = vec![month(2026, 1, 100), month(2026, 2, 200)];
        assert_eq!(derive_search_volume(Some(0), &monthly), 150);
    }

    #[test]
    fn missing_volume_averages_recent_nonzero_months() {
        let monthly = vec![
            month(2026, 3, 300),
            month(2026, 2, 0),
            month(2026, 1, 100),
        ];
        // Zero months are excluded from the average
        assert_eq!(derive_search_volume(None, &monthly), 200);
    }

    #[test]
    fn only_most_recent_twelve_months_count() {
        // 14 months of data; the two oldest (volume 10000) must be ignored
        let mut monthly = Vec::new();
        for m in 1..=12 {
            monthly.push(month(2026, m, 120));
        }
        monthly.push(month(2025, 11, 10000));
        monthly.push(month(2025, 12, 10000));
        assert_eq!(derive_search_volume(None, &monthly), 120);
    }

    #[test]
    fn average_is_rounded() {
        let monthly = vec![month(2026, 1, 100), month(2026, 2, 101)];
        // 100.5 rounds to 101 (round half away from zero)
        assert_eq!(derive_search_volume(None, &monthly), 101);
    }

    #[test]
    fn no_data_yields_zero() {
        assert_eq!(derive_search_volume(None, &[]), 0);
        assert_eq!(derive_search_volume(Some(0), &[month(2026, 1, 0)]), 0);
    }

    #[test]
    fn effective_volume_uses_fallback() {
        let record = KeywordRecord {
            keyword: "bankruptcy auction".to_string(),
            search_volume: None,
            keyword_difficulty: Some(30),
            cpc: Some(1.2),
            serp_features: vec![],
            search_intent: None,
            monthly_searches: vec![month(2026, 1, 40), month(2026, 2, 60)],
        };
        assert_eq!(record.effective_volume(), 50);
    }
}
