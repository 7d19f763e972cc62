//! Idea discovery: fuses brainstormed candidate topics with quantitative
//! keyword data, enriches gaps with estimates, filters irrelevant
//! suggestions, scores everything, drops duplicates, and ranks.
//!
//! A single unavailable data source never aborts a discovery run: each
//! external path has its own error boundary and degrades to whatever the
//! other paths produced.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use draftline_common::config::Tuning;
use draftline_common::types::{
    Category, ContentFingerprint, EnrichedKeyword, KeywordSignal, ScoredIdea, SearchIntent,
    VolumeSource,
};

use crate::dedup::check_duplicate;
use crate::relevance::{is_relevant_keyword, seed_vocabulary};
use crate::scoring::compute_opportunity_score;
use crate::seeds::seed_keywords;
use crate::traits::{IdeaSource, KeywordDataSource, KeywordEnricher};

/// Relevance assumed for keywords nobody estimated (vendor suggestions and
/// un-enriched brainstorms).
const DEFAULT_RELEVANCE: f64 = 5.0;

/// The two keyword-data paths, in merge-precedence order: entries from a
/// later source overwrite earlier ones under the same (lowercased) keyword.
/// Exact-match lookups are authoritative over broad suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataPath {
    Suggestions,
    ExactLookup,
}

const MERGE_PRECEDENCE: [DataPath; 2] = [DataPath::Suggestions, DataPath::ExactLookup];

pub struct IdeaDiscovery {
    ideas: Arc<dyn IdeaSource>,
    keywords: Arc<dyn KeywordDataSource>,
    enricher: Arc<dyn KeywordEnricher>,
    tuning: Tuning,
}

impl IdeaDiscovery {
    pub fn new(
        ideas: Arc<dyn IdeaSource>,
        keywords: Arc<dyn KeywordDataSource>,
        enricher: Arc<dyn KeywordEnricher>,
        tuning: Tuning,
    ) -> Self {
        Self {
            ideas,
            keywords,
            enricher,
            tuning,
        }
    }

    /// Discover and rank content opportunities for a category, dropping any
    /// that would duplicate existing published coverage. Highest score first;
    /// ties preserve discovery order.
    pub async fn discover(
        &self,
        category: Category,
        fingerprints: &[ContentFingerprint],
    ) -> Result<Vec<ScoredIdea>> {
        info!(category = %category, "Discovering content ideas");

        // Phase 1: brainstormed candidates. A failed brainstorm degrades to
        // suggestion-only discovery rather than aborting the run.
        let brainstormed = match self
            .ideas
            .brainstorm(category, self.tuning.ideas_per_category)
            .await
        {
            Ok(ideas) => ideas,
            Err(e) => {
                warn!(error = %e, "Brainstorm service failed, continuing with suggestions only");
                Vec::new()
            }
        };
        info!(count = brainstormed.len(), "Brainstormed ideas");

        let seeds: Vec<String> = seed_keywords(category)
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ai_keywords: Vec<String> = brainstormed
            .iter()
            .take(self.tuning.top_ideas_for_validation)
            .map(|idea| idea.keyword.clone())
            .collect();

        // Phase 2: the two data paths run concurrently, each inside its own
        // error boundary. One path failing degrades to the other's data.
        let (suggestions, exact) = tokio::join!(
            self.fetch_path(DataPath::Suggestions, &seeds),
            self.fetch_path(DataPath::ExactLookup, &ai_keywords),
        );
        if suggestions.is_empty() && exact.is_empty() {
            warn!("No keyword data from either path — scoring on estimates only");
        }

        let measured = merge_by_precedence(&suggestions, &exact);

        // Phase 3: estimate volume/relevance for brainstormed keywords the
        // vendor had nothing on.
        let gaps: Vec<String> = brainstormed
            .iter()
            .filter(|idea| {
                measured
                    .get(&idea.keyword.to_lowercase())
                    .map_or(true, |signal| signal.search_volume == 0)
            })
            .map(|idea| idea.keyword.clone())
            .collect();
        let enriched = self.enrich_gaps(&gaps, category).await;

        // Phase 4: score every brainstormed idea, measured data first,
        // estimates as fallback.
        let mut scored: Vec<ScoredIdea> = Vec::new();
        for idea in &brainstormed {
            let key = idea.keyword.to_lowercase();
            let measured_signal = measured.get(&key);
            let estimate = enriched.get(&key);

            let (search_volume, volume_source) =
                resolve_volume(measured_signal.map(|s| s.search_volume), estimate);

            let relevance = estimate
                .map(|e| e.relevance_score)
                .unwrap_or(DEFAULT_RELEVANCE);

            let signal = KeywordSignal {
                keyword: idea.keyword.clone(),
                search_volume,
                keyword_difficulty: measured_signal.map(|s| s.keyword_difficulty).unwrap_or(0),
                cpc: measured_signal.map(|s| s.cpc).unwrap_or(0.0),
                serp_features: measured_signal
                    .map(|s| s.serp_features.clone())
                    .unwrap_or_default(),
                search_intent: measured_signal
                    .map(|s| s.search_intent)
                    .unwrap_or(SearchIntent::Informational),
                related_question_count: measured_signal
                    .map(|s| s.related_question_count)
                    .unwrap_or(0),
            };

            scored.push(self.score_idea(&signal, &idea.description, relevance, volume_source));
        }

        // Phase 5: score vendor suggestions that weren't brainstormed, after
        // the relevance filter. Without it, tangential high-volume keywords
        // pollute niche categories.
        let mut seed_vocab_terms = seeds.clone();
        seed_vocab_terms.extend(ai_keywords.iter().cloned());
        let vocab = seed_vocabulary(&seed_vocab_terms, category);

        let mut filtered_out = 0usize;
        for signal in &suggestions {
            let key = signal.keyword.to_lowercase();
            if scored.iter().any(|s| s.keyword.to_lowercase() == key) {
                continue;
            }
            if !is_relevant_keyword(&signal.keyword, &vocab, &self.tuning.relevance) {
                filtered_out += 1;
                continue;
            }

            let volume_source = if signal.search_volume > 0 {
                VolumeSource::Measured
            } else {
                VolumeSource::None
            };
            let description = format!(
                "Keyword-service suggestion ({} vol, {} KD)",
                signal.search_volume, signal.keyword_difficulty
            );
            scored.push(self.score_idea(signal, &description, DEFAULT_RELEVANCE, volume_source));
        }
        if filtered_out > 0 {
            debug!(filtered_out, "Dropped irrelevant suggestions");
        }

        // Phase 6: drop ideas that overlap existing published coverage.
        let mut duplicates = 0usize;
        scored.retain(|idea| {
            let verdict = check_duplicate(&idea.keyword, fingerprints, &self.tuning.dedup);
            if verdict.is_duplicate {
                duplicates += 1;
                debug!(keyword = idea.keyword.as_str(), reason = verdict.reason.as_str(), "Dropped duplicate idea");
            }
            !verdict.is_duplicate
        });
        if duplicates > 0 {
            info!(duplicates, "Removed ideas overlapping existing posts");
        }

        // Stable sort: ties keep discovery order, so repeated runs over
        // unchanged inputs rank identically.
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        info!(count = scored.len(), "Discovery complete");
        Ok(scored)
    }

    /// Fetch one data path, degrading to empty on failure.
    async fn fetch_path(&self, path: DataPath, inputs: &[String]) -> Vec<KeywordSignal> {
        if inputs.is_empty() {
            return Vec::new();
        }
        let result = match path {
            DataPath::Suggestions => self.keywords.suggest(inputs).await,
            DataPath::ExactLookup => self.keywords.lookup(inputs).await,
        };
        match result {
            Ok(signals) => {
                debug!(?path, count = signals.len(), "Keyword data fetched");
                signals
            }
            Err(e) => {
                warn!(?path, error = %e, "Keyword data path failed, degrading");
                Vec::new()
            }
        }
    }

    async fn enrich_gaps(
        &self,
        gaps: &[String],
        category: Category,
    ) -> HashMap<String, EnrichedKeyword> {
        if gaps.is_empty() {
            return HashMap::new();
        }
        match self.enricher.estimate(gaps, category).await {
            Ok(estimates) => estimates
                .into_iter()
                .map(|e| (e.keyword.to_lowercase(), e))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Enrichment failed, scoring gaps without estimates");
                HashMap::new()
            }
        }
    }

    fn score_idea(
        &self,
        signal: &KeywordSignal,
        description: &str,
        relevance: f64,
        volume_source: VolumeSource,
    ) -> ScoredIdea {
        let (score, breakdown) =
            compute_opportunity_score(signal, relevance, volume_source, &self.tuning.scoring);
        ScoredIdea {
            keyword: signal.keyword.clone(),
            description: description.to_string(),
            score,
            breakdown,
            search_volume: signal.search_volume,
            keyword_difficulty: signal.keyword_difficulty,
            cpc: signal.cpc,
            serp_features: signal.serp_features.clone(),
            search_intent: signal.search_intent,
            relevance_score: relevance,
            volume_source,
        }
    }
}

/// Merge the data paths into a lookup keyed by lowercased keyword, applying
/// MERGE_PRECEDENCE: later paths overwrite earlier ones.
fn merge_by_precedence(
    suggestions: &[KeywordSignal],
    exact: &[KeywordSignal],
) -> HashMap<String, KeywordSignal> {
    let mut merged = HashMap::new();
    for path in MERGE_PRECEDENCE {
        let signals = match path {
            DataPath::Suggestions => suggestions,
            DataPath::ExactLookup => exact,
        };
        for signal in signals {
            merged.insert(signal.keyword.to_lowercase(), signal.clone());
        }
    }
    merged
}

/// Measured volume wins; a positive estimate fills the gap; otherwise the
/// idea carries no demand figure at all.
fn resolve_volume(measured: Option<u64>, estimate: Option<&EnrichedKeyword>) -> (u64, VolumeSource) {
    match measured {
        Some(v) if v > 0 => (v, VolumeSource::Measured),
        _ => match estimate {
            Some(e) if e.estimated_volume > 0 => (e.estimated_volume, VolumeSource::Estimated),
            _ => (0, VolumeSource::None),
        },
    }
}
