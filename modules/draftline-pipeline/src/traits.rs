// Trait abstractions for the pipeline's external collaborators.
//
// The orchestrators depend only on these traits; production adapters over
// the vendor clients live at the bottom of this file, and tests swap in
// deterministic in-memory implementations. No network, no keys, `cargo test`
// in seconds.

use anyhow::Result;
use async_trait::async_trait;
use typed_builder::TypedBuilder;

use draftline_common::types::{
    BlogIdea, BlogImage, Category, ContentProfile, DraftPayload, EnrichedKeyword, KeywordSignal,
    SearchIntent,
};

use serpdata_client::{KeywordRecord, SerpdataClient};
use stockphoto_client::{Photo, StockPhotoClient};

/// SERP feature name counted as a related question.
const PEOPLE_ALSO_ASK: &str = "people_also_ask";

/// Suggestions requested per seed keyword.
const SUGGESTIONS_PER_SEED: u32 = 20;

// ---------------------------------------------------------------------------
// Brainstorm / enrichment / generation services
// ---------------------------------------------------------------------------

/// Produces candidate topics for a category. No guarantee of real-world
/// search demand; candidates are validated downstream.
#[async_trait]
pub trait IdeaSource: Send + Sync {
    async fn brainstorm(&self, category: Category, count: usize) -> Result<Vec<BlogIdea>>;
}

/// Estimates demand and audience relevance for keywords the keyword-data
/// service had nothing on.
#[async_trait]
pub trait KeywordEnricher: Send + Sync {
    async fn estimate(
        &self,
        keywords: &[String],
        category: Category,
    ) -> Result<Vec<EnrichedKeyword>>;
}

/// One content item to generate.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DraftRequest {
    #[builder(setter(into))]
    pub topic: String,
    #[builder(default)]
    pub category: Option<Category>,
    pub profile: ContentProfile,
    /// Pre-gathered research context injected into the prompt (closure posts).
    #[builder(default)]
    pub context: Option<String>,
}

/// Per-attempt instructions from the retry orchestrator.
#[derive(Debug, Clone)]
pub struct AttemptDirectives {
    /// Minimum word count to demand of the generator.
    pub min_words: usize,
    /// Admonition describing the previous attempt's shortfall, if any.
    pub feedback: Option<String>,
}

/// The content-generation service. Non-deterministic; every response is
/// validated for structure and length by the caller.
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &DraftRequest,
        directives: &AttemptDirectives,
    ) -> Result<DraftPayload>;
}

// ---------------------------------------------------------------------------
// Keyword data service
// ---------------------------------------------------------------------------

/// The quantitative keyword-research service. Both paths tolerate partial
/// and zero results.
#[async_trait]
pub trait KeywordDataSource: Send + Sync {
    /// Broad discovery: related keywords seeded from category seed terms.
    async fn suggest(&self, seeds: &[String]) -> Result<Vec<KeywordSignal>>;

    /// Exact-match validation for known keywords.
    async fn lookup(&self, keywords: &[String]) -> Result<Vec<KeywordSignal>>;
}

#[async_trait]
impl KeywordDataSource for SerpdataClient {
    async fn suggest(&self, seeds: &[String]) -> Result<Vec<KeywordSignal>> {
        let records = SerpdataClient::suggest(self, seeds, SUGGESTIONS_PER_SEED).await?;
        Ok(records.into_iter().map(signal_from_record).collect())
    }

    async fn lookup(&self, keywords: &[String]) -> Result<Vec<KeywordSignal>> {
        let records = SerpdataClient::lookup(self, keywords).await?;
        Ok(records.into_iter().map(signal_from_record).collect())
    }
}

fn signal_from_record(record: KeywordRecord) -> KeywordSignal {
    let search_volume = record.effective_volume();
    let related_question_count = record
        .serp_features
        .iter()
        .filter(|f| f.as_str() == PEOPLE_ALSO_ASK)
        .count() as u32;

    KeywordSignal {
        search_volume,
        keyword_difficulty: record.keyword_difficulty.unwrap_or(0),
        cpc: record.cpc.unwrap_or(0.0),
        search_intent: SearchIntent::parse(record.search_intent.as_deref().unwrap_or("")),
        related_question_count,
        serp_features: record.serp_features,
        keyword: record.keyword,
    }
}

// ---------------------------------------------------------------------------
// Photo / illustration services
// ---------------------------------------------------------------------------

/// A search hit plus the vendor's attribution handle for it.
#[derive(Debug, Clone)]
pub struct PhotoHit {
    pub image: BlogImage,
    pub download_ref: Option<String>,
}

#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Zero results are valid; callers broaden the query and retry.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<PhotoHit>>;

    /// Attribution ping for a hit that was actually used. Best-effort.
    async fn mark_used(&self, _hit: &PhotoHit) {}
}

#[async_trait]
impl PhotoSource for StockPhotoClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<PhotoHit>> {
        let photos = StockPhotoClient::search(self, query, limit).await?;
        Ok(photos.iter().map(hit_from_photo).collect())
    }

    async fn mark_used(&self, hit: &PhotoHit) {
        if let Some(ref location) = hit.download_ref {
            self.track_download(location).await;
        }
    }
}

fn hit_from_photo(photo: &Photo) -> PhotoHit {
    let alt = photo
        .alt_description
        .clone()
        .or_else(|| photo.description.clone())
        .unwrap_or_else(|| "Blog illustration".to_string());
    let credit = format!(
        "Photo by [{}]({})",
        photo.user.name, photo.user.links.html
    );

    PhotoHit {
        image: BlogImage {
            url: photo.urls.regular.clone(),
            alt,
            credit,
        },
        download_ref: Some(photo.links.download_location.clone()),
    }
}

/// What the tier-3 generative override gets to work with.
#[derive(Debug, Clone)]
pub struct IllustrationBrief {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub primary_keyword: String,
    pub tags: Vec<String>,
}

/// Generative hero-image service (tier-3 override). Failures at this tier
/// are silent: the caller keeps whatever tiers 1-2 produced.
#[async_trait]
pub trait HeroIllustrator: Send + Sync {
    async fn illustrate(&self, brief: &IllustrationBrief) -> Result<BlogImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_from_record_counts_related_questions() {
        let record = KeywordRecord {
            keyword: "Bankruptcy Auction".to_string(),
            search_volume: Some(500),
            keyword_difficulty: Some(30),
            cpc: Some(2.5),
            serp_features: vec![
                "people_also_ask".to_string(),
                "featured_snippet".to_string(),
            ],
            search_intent: Some("commercial".to_string()),
            monthly_searches: vec![],
        };
        let signal = signal_from_record(record);
        assert_eq!(signal.search_volume, 500);
        assert_eq!(signal.related_question_count, 1);
        assert_eq!(signal.search_intent, SearchIntent::Commercial);
    }

    #[test]
    fn signal_from_record_defaults_missing_metrics() {
        let record = KeywordRecord {
            keyword: "orphan keyword".to_string(),
            search_volume: None,
            keyword_difficulty: None,
            cpc: None,
            serp_features: vec![],
            search_intent: None,
            monthly_searches: vec![],
        };
        let signal = signal_from_record(record);
        assert_eq!(signal.search_volume, 0);
        assert_eq!(signal.keyword_difficulty, 0);
        assert_eq!(signal.search_intent, SearchIntent::Informational);
    }
}
