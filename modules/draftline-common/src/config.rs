use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content-generation provider
    pub llm_api_key: String,
    pub llm_model: String,

    // Keyword-research vendor
    pub serpdata_login: String,
    pub serpdata_password: String,

    // Stock-photo vendor. Optional: without it the image resolver degrades
    // straight to the curated pool.
    pub stockphoto_access_key: Option<String>,

    /// Root of the published-content tree (index + per-post JSON).
    pub content_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            llm_api_key: required_env("LLM_API_KEY"),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            serpdata_login: required_env("SERPDATA_LOGIN"),
            serpdata_password: required_env("SERPDATA_PASSWORD"),
            stockphoto_access_key: env::var("STOCKPHOTO_ACCESS_KEY").ok(),
            content_dir: env::var("CONTENT_DIR")
                .unwrap_or_else(|_| "content".to_string())
                .into(),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

// ---------------------------------------------------------------------------
// Tuning: every hand-tuned constant in one place
// ---------------------------------------------------------------------------

/// Per-component caps for the opportunity score.
#[derive(Debug, Clone)]
pub struct ScoringCaps {
    pub max_search_volume: u32,
    /// Inverted: lower difficulty earns more points.
    pub max_keyword_difficulty: u32,
    pub max_serp_features: u32,
    pub max_related_questions: u32,
    pub max_keyword_quality: u32,
    pub max_relevance_bonus: u32,
    /// Estimated volumes cap at this fraction of max_search_volume;
    /// unvalidated estimates must never outrank measured data.
    pub estimated_volume_ratio: f64,
    /// Minimum score to auto-generate.
    pub min_opportunity_score: u32,
    /// Scores below this get a warning but aren't blocked.
    pub warn_threshold: u32,
}

impl Default for ScoringCaps {
    fn default() -> Self {
        Self {
            max_search_volume: 30,
            max_keyword_difficulty: 20,
            max_serp_features: 20,
            max_related_questions: 20,
            max_keyword_quality: 10,
            max_relevance_bonus: 10,
            estimated_volume_ratio: 0.6,
            min_opportunity_score: 35,
            warn_threshold: 45,
        }
    }
}

/// Thresholds for the suggestion relevance filter. Hand-tuned per deployment;
/// the defaults match the original calibration for the distressed-asset niche.
#[derive(Debug, Clone)]
pub struct RelevanceThresholds {
    /// Keep when the keyword has at least this many domain-vocabulary words.
    pub domain_only_hits: usize,
    /// Keep when it has at least this many domain words...
    pub domain_hits_with_seed: usize,
    /// ...combined with at least this many seed-derived words.
    pub seed_hits_with_domain: usize,
    /// Keep when it has at least this many seed-derived words alone.
    pub seed_only_hits: usize,
}

impl Default for RelevanceThresholds {
    fn default() -> Self {
        Self {
            domain_only_hits: 2,
            domain_hits_with_seed: 1,
            seed_hits_with_domain: 1,
            seed_only_hits: 2,
        }
    }
}

/// Word-count floors for one content profile. The requested minimum (what we
/// demand of the generator) is deliberately higher than the acceptance floor
/// (what we'll actually take), and the final attempt accepts lower still.
#[derive(Debug, Clone)]
pub struct WordFloors {
    pub requested_baseline: usize,
    pub requested_retry: usize,
    pub accept_floor: usize,
    pub final_accept_floor: usize,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub long_form: WordFloors,
    pub closure: WordFloors,
}

impl RetryPolicy {
    pub fn floors(&self, profile: crate::types::ContentProfile) -> &WordFloors {
        match profile {
            crate::types::ContentProfile::LongForm => &self.long_form,
            crate::types::ContentProfile::Closure => &self.closure,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            long_form: WordFloors {
                requested_baseline: 1500,
                requested_retry: 2000,
                accept_floor: 1400,
                final_accept_floor: 1000,
            },
            closure: WordFloors {
                requested_baseline: 800,
                requested_retry: 800,
                accept_floor: 750,
                final_accept_floor: 600,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DedupTuning {
    /// Jaccard similarity at or above which a candidate is a duplicate.
    pub jaccard_threshold: f64,
    /// Best-match similarity at or above which callers warn "similar topic".
    pub similar_warn_floor: f64,
}

impl Default for DedupTuning {
    fn default() -> Self {
        Self {
            jaccard_threshold: 0.5,
            similar_warn_floor: 0.30,
        }
    }
}

/// Structural quality gates for a finished draft.
#[derive(Debug, Clone)]
pub struct ContentRules {
    pub min_word_count: usize,
    pub max_title_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
    pub min_faqs: usize,
    pub min_headings: usize,
}

#[derive(Debug, Clone)]
pub struct Tuning {
    pub scoring: ScoringCaps,
    pub relevance: RelevanceThresholds,
    pub retry: RetryPolicy,
    pub dedup: DedupTuning,
    pub content: ContentRules,
    pub closure_content: ContentRules,
    /// How many ideas to request from the brainstorm service per category.
    pub ideas_per_category: usize,
    /// How many brainstormed keywords get exact-match validation.
    pub top_ideas_for_validation: usize,
    pub body_image_count: usize,
    /// Tier-3 generative hero override.
    pub hero_generation_enabled: bool,
    /// Worker cap for concurrent per-item generation.
    pub generation_concurrency: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scoring: ScoringCaps::default(),
            relevance: RelevanceThresholds::default(),
            retry: RetryPolicy::default(),
            dedup: DedupTuning::default(),
            content: ContentRules {
                min_word_count: 1000,
                max_title_length: 70,
                description_min_length: 120,
                description_max_length: 165,
                min_faqs: 5,
                min_headings: 8,
            },
            closure_content: ContentRules {
                min_word_count: 600,
                max_title_length: 70,
                description_min_length: 120,
                description_max_length: 165,
                min_faqs: 3,
                min_headings: 6,
            },
            ideas_per_category: 15,
            top_ideas_for_validation: 10,
            body_image_count: 3,
            hero_generation_enabled: false,
            generation_concurrency: 2,
        }
    }
}
