use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content categories served by the blog. Each category carries its own seed
/// keywords and visual vocabulary; the slug doubles as the URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    IndustryAnalysis,
    AssetRecovery,
    BankruptcyGuide,
    WarnAct,
    DueDiligence,
    LiquidationStrategy,
    EquipmentRemarketing,
    DistressedInvesting,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::IndustryAnalysis,
        Category::AssetRecovery,
        Category::BankruptcyGuide,
        Category::WarnAct,
        Category::DueDiligence,
        Category::LiquidationStrategy,
        Category::EquipmentRemarketing,
        Category::DistressedInvesting,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Category::IndustryAnalysis => "industry-analysis",
            Category::AssetRecovery => "asset-recovery",
            Category::BankruptcyGuide => "bankruptcy-guide",
            Category::WarnAct => "warn-act",
            Category::DueDiligence => "due-diligence",
            Category::LiquidationStrategy => "liquidation-strategy",
            Category::EquipmentRemarketing => "equipment-remarketing",
            Category::DistressedInvesting => "distressed-investing",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::IndustryAnalysis => "Industry Analysis",
            Category::AssetRecovery => "Asset Recovery",
            Category::BankruptcyGuide => "Bankruptcy Guide",
            Category::WarnAct => "WARN Act",
            Category::DueDiligence => "Due Diligence",
            Category::LiquidationStrategy => "Liquidation Strategy",
            Category::EquipmentRemarketing => "Equipment Remarketing",
            Category::DistressedInvesting => "Distressed Investing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.slug() == s)
            .copied()
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Dominant search intent reported by the keyword-data vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntent {
    #[default]
    Informational,
    Commercial,
    Transactional,
    Navigational,
}

impl SearchIntent {
    /// Lenient parse for vendor strings; anything unrecognized is informational.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "commercial" => SearchIntent::Commercial,
            "transactional" => SearchIntent::Transactional,
            "navigational" => SearchIntent::Navigational,
            _ => SearchIntent::Informational,
        }
    }
}

/// Provenance of a search-volume figure. Estimates never outrank measured
/// data in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    Measured,
    Estimated,
    None,
}

/// One keyword/topic candidate with its quantitative attributes. Produced by
/// the keyword-data service or the estimator, consumed once per scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSignal {
    pub keyword: String,
    pub search_volume: u64,
    /// 0-100; 0 means "unknown" unless the source is measured.
    pub keyword_difficulty: u8,
    pub cpc: f64,
    pub serp_features: Vec<String>,
    pub search_intent: SearchIntent,
    pub related_question_count: u32,
}

/// Per-component sub-scores. Each is independently capped; the total is
/// capped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub search_volume: u32,
    pub keyword_difficulty: u32,
    pub serp_features: u32,
    pub related_questions: u32,
    pub keyword_quality: u32,
    pub relevance_bonus: u32,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> u32 {
        self.search_volume
            + self.keyword_difficulty
            + self.serp_features
            + self.related_questions
            + self.keyword_quality
            + self.relevance_bonus
    }
}

/// A fully scored topic candidate. Created per discovery run, discarded after
/// ranking; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredIdea {
    pub keyword: String,
    pub description: String,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
    pub search_volume: u64,
    pub keyword_difficulty: u8,
    pub cpc: f64,
    pub serp_features: Vec<String>,
    pub search_intent: SearchIntent,
    /// 0-10 relevance to the platform's audience.
    pub relevance_score: f64,
    pub volume_source: VolumeSource,
}

/// Normalized representation of one published post, used for overlap
/// detection. Rebuilt fresh on every pipeline run; read-only during a run.
#[derive(Debug, Clone)]
pub struct ContentFingerprint {
    pub slug: String,
    pub title: String,
    /// Significant words from title + description + primary keyword + tags.
    pub words: HashSet<String>,
    pub primary_keyword: String,
    /// Lowercased tags.
    pub tags: Vec<String>,
}

/// The closest existing post found during a duplicate check.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintMatch {
    pub slug: String,
    pub title: String,
    pub similarity: f64,
}

/// Outcome of comparing one candidate keyword against the fingerprint set.
/// Carries the best match found even when below the duplicate threshold so
/// callers can surface "similar but not duplicate" warnings.
#[derive(Debug, Clone)]
pub struct DuplicateVerdict {
    pub is_duplicate: bool,
    pub matched: Option<FingerprintMatch>,
    pub similarity: f64,
    pub reason: String,
}

impl DuplicateVerdict {
    pub fn not_duplicate(best: Option<FingerprintMatch>) -> Self {
        let similarity = best.as_ref().map(|m| m.similarity).unwrap_or(0.0);
        Self {
            is_duplicate: false,
            matched: best,
            similarity,
            reason: String::new(),
        }
    }

    pub fn duplicate(matched: FingerprintMatch, reason: String) -> Self {
        Self {
            is_duplicate: true,
            similarity: matched.similarity,
            matched: Some(matched),
            reason,
        }
    }
}

/// A brainstormed topic before any quantitative validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogIdea {
    pub keyword: String,
    pub description: String,
}

/// Estimator output for a keyword with no measured volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedKeyword {
    pub keyword: String,
    pub estimated_volume: u64,
    /// 0-10.
    pub relevance_score: f64,
}

/// Word-count profile for generated content. Long-form articles and
/// fast-turnaround closure posts have different length requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentProfile {
    LongForm,
    Closure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

/// The raw draft returned by the content-generation service, before images
/// and assembly. Field presence is validated on every attempt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftPayload {
    pub title: String,
    pub description: String,
    pub primary_keyword: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// Full markdown body, possibly containing [IMAGE_N] placeholders.
    pub body: String,
    pub faqs: Vec<Faq>,
    pub sources: Vec<SourceRef>,
}

/// One attempt in a generation retry chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationAttempt {
    pub attempt_number: u32,
    /// Minimum word count demanded of the generator on this attempt.
    pub min_words_required: usize,
    /// 0 when the attempt failed before a body was produced.
    pub produced_word_count: usize,
    pub accepted: bool,
}

/// An accepted draft plus the retry history that produced it.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub draft: DraftPayload,
    pub attempts: Vec<GenerationAttempt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogImage {
    pub url: String,
    pub alt: String,
    pub credit: String,
}

/// Resolved illustrations for one post: a hero slot plus a fixed number of
/// body slots. The resolver guarantees every slot is filled.
#[derive(Debug, Clone)]
pub struct ResolvedImageSet {
    pub hero: BlogImage,
    pub body: Vec<BlogImage>,
}

/// A publish-ready post as handed to the (external) publish step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDraft {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub primary_keyword: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub body: String,
    pub faqs: Vec<Faq>,
    pub sources: Vec<SourceRef>,
    pub word_count: usize,
    pub hero_image: BlogImage,
    pub body_images: Vec<BlogImage>,
    pub generated_at: DateTime<Utc>,
}

/// Pass/fail quality gate result. Errors block publishing; warnings don't.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_slug_round_trips() {
        for cat in Category::ALL {
            assert_eq!(Category::from_str(cat.slug()).unwrap(), cat);
        }
    }

    #[test]
    fn category_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Category::WarnAct).unwrap();
        assert_eq!(json, "\"warn-act\"");
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(Category::from_str("crypto-news").is_err());
    }

    #[test]
    fn search_intent_parse_is_lenient() {
        assert_eq!(SearchIntent::parse("COMMERCIAL"), SearchIntent::Commercial);
        assert_eq!(SearchIntent::parse("garbage"), SearchIntent::Informational);
    }

    #[test]
    fn breakdown_sum_adds_all_components() {
        let b = ScoreBreakdown {
            search_volume: 27,
            keyword_difficulty: 14,
            serp_features: 15,
            related_questions: 12,
            keyword_quality: 10,
            relevance_bonus: 8,
        };
        assert_eq!(b.sum(), 86);
    }

    #[test]
    fn verdict_without_match_has_zero_similarity() {
        let v = DuplicateVerdict::not_duplicate(None);
        assert!(!v.is_duplicate);
        assert_eq!(v.similarity, 0.0);
        assert!(v.matched.is_none());
    }
}
