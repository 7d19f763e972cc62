//! Discovery orchestrator driven end-to-end against in-memory services:
//! merge precedence, degradation, relevance filtering, dedup, and ranking.

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;

use draftline_common::text::{significant_words, DEFAULT_MIN_WORD_LEN, OVERLAP_STOP_WORDS};
use draftline_common::types::{
    BlogIdea, Category, ContentFingerprint, EnrichedKeyword, KeywordSignal, SearchIntent,
    VolumeSource,
};
use draftline_common::Tuning;
use draftline_pipeline::ideation::IdeaDiscovery;
use draftline_pipeline::traits::{IdeaSource, KeywordDataSource, KeywordEnricher};

// --- mock services ---

struct FixedIdeas(Vec<BlogIdea>);

#[async_trait]
impl IdeaSource for FixedIdeas {
    async fn brainstorm(&self, _category: Category, _count: usize) -> Result<Vec<BlogIdea>> {
        Ok(self.0.clone())
    }
}

struct FailingIdeas;

#[async_trait]
impl IdeaSource for FailingIdeas {
    async fn brainstorm(&self, _category: Category, _count: usize) -> Result<Vec<BlogIdea>> {
        bail!("brainstorm service down")
    }
}

/// `None` for a path simulates that path's outage.
struct ScriptedKeywords {
    suggestions: Option<Vec<KeywordSignal>>,
    lookups: Option<Vec<KeywordSignal>>,
}

#[async_trait]
impl KeywordDataSource for ScriptedKeywords {
    async fn suggest(&self, _seeds: &[String]) -> Result<Vec<KeywordSignal>> {
        match &self.suggestions {
            Some(signals) => Ok(signals.clone()),
            None => bail!("suggestion endpoint unavailable"),
        }
    }

    async fn lookup(&self, _keywords: &[String]) -> Result<Vec<KeywordSignal>> {
        match &self.lookups {
            Some(signals) => Ok(signals.clone()),
            None => bail!("lookup endpoint unavailable"),
        }
    }
}

struct FixedEnricher(Vec<EnrichedKeyword>);

#[async_trait]
impl KeywordEnricher for FixedEnricher {
    async fn estimate(
        &self,
        keywords: &[String],
        _category: Category,
    ) -> Result<Vec<EnrichedKeyword>> {
        Ok(self
            .0
            .iter()
            .filter(|e| keywords.iter().any(|k| k.eq_ignore_ascii_case(&e.keyword)))
            .cloned()
            .collect())
    }
}

// --- helpers ---

fn idea(keyword: &str) -> BlogIdea {
    BlogIdea {
        keyword: keyword.to_string(),
        description: format!("A post about {keyword}"),
    }
}

fn signal(keyword: &str, volume: u64, difficulty: u8) -> KeywordSignal {
    KeywordSignal {
        keyword: keyword.to_string(),
        search_volume: volume,
        keyword_difficulty: difficulty,
        cpc: 1.5,
        serp_features: vec!["people_also_ask".to_string()],
        search_intent: SearchIntent::Informational,
        related_question_count: 1,
    }
}

fn estimate(keyword: &str, volume: u64, relevance: f64) -> EnrichedKeyword {
    EnrichedKeyword {
        keyword: keyword.to_string(),
        estimated_volume: volume,
        relevance_score: relevance,
    }
}

fn fingerprint(slug: &str, title: &str, keyword: &str) -> ContentFingerprint {
    ContentFingerprint {
        slug: slug.to_string(),
        title: title.to_string(),
        words: significant_words(
            &format!("{title} {keyword}"),
            OVERLAP_STOP_WORDS,
            DEFAULT_MIN_WORD_LEN,
        ),
        primary_keyword: keyword.to_string(),
        tags: vec![],
    }
}

fn discovery(
    ideas: impl IdeaSource + 'static,
    keywords: ScriptedKeywords,
    enricher: FixedEnricher,
) -> IdeaDiscovery {
    IdeaDiscovery::new(
        Arc::new(ideas),
        Arc::new(keywords),
        Arc::new(enricher),
        Tuning::default(),
    )
}

// --- tests ---

#[tokio::test]
async fn measured_estimated_and_suggested_ideas_all_rank() {
    let d = discovery(
        FixedIdeas(vec![
            idea("bankruptcy asset auction"),
            idea("warn act filing tracker"),
        ]),
        ScriptedKeywords {
            suggestions: Some(vec![
                signal("business asset auction", 900, 20),
                signal("non-erosive reflux disease", 9000, 10), // irrelevant junk
            ]),
            lookups: Some(vec![signal("bankruptcy asset auction", 500, 30)]),
        },
        FixedEnricher(vec![estimate("warn act filing tracker", 400, 8.0)]),
    );

    let ranked = d.discover(Category::AssetRecovery, &[]).await.unwrap();
    let keywords: Vec<&str> = ranked.iter().map(|i| i.keyword.as_str()).collect();

    assert!(keywords.contains(&"bankruptcy asset auction"));
    assert!(keywords.contains(&"warn act filing tracker"));
    assert!(keywords.contains(&"business asset auction"));
    assert!(
        !keywords.contains(&"non-erosive reflux disease"),
        "irrelevant suggestion must be filtered"
    );

    let measured = ranked.iter().find(|i| i.keyword == "bankruptcy asset auction").unwrap();
    assert_eq!(measured.volume_source, VolumeSource::Measured);
    assert_eq!(measured.search_volume, 500);

    let estimated = ranked.iter().find(|i| i.keyword == "warn act filing tracker").unwrap();
    assert_eq!(estimated.volume_source, VolumeSource::Estimated);
    assert_eq!(estimated.search_volume, 400);
    assert_eq!(estimated.relevance_score, 8.0);

    // Ranked strictly by score
    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn exact_lookup_is_authoritative_over_suggestions() {
    let d = discovery(
        FixedIdeas(vec![idea("bankruptcy asset auction")]),
        ScriptedKeywords {
            suggestions: Some(vec![signal("bankruptcy asset auction", 50, 80)]),
            lookups: Some(vec![signal("bankruptcy asset auction", 500, 30)]),
        },
        FixedEnricher(vec![]),
    );

    let ranked = d.discover(Category::BankruptcyGuide, &[]).await.unwrap();
    let item = ranked.iter().find(|i| i.keyword == "bankruptcy asset auction").unwrap();
    assert_eq!(item.search_volume, 500, "lookup data must overwrite the suggestion");
    assert_eq!(item.keyword_difficulty, 30);
}

#[tokio::test]
async fn one_failing_path_degrades_to_the_other() {
    let d = discovery(
        FixedIdeas(vec![idea("bankruptcy asset auction")]),
        ScriptedKeywords {
            suggestions: None, // outage
            lookups: Some(vec![signal("bankruptcy asset auction", 500, 30)]),
        },
        FixedEnricher(vec![]),
    );

    let ranked = d.discover(Category::BankruptcyGuide, &[]).await.unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].volume_source, VolumeSource::Measured);
}

#[tokio::test]
async fn both_paths_failing_falls_back_to_estimates() {
    let d = discovery(
        FixedIdeas(vec![idea("bankruptcy asset auction")]),
        ScriptedKeywords {
            suggestions: None,
            lookups: None,
        },
        FixedEnricher(vec![estimate("bankruptcy asset auction", 350, 9.0)]),
    );

    let ranked = d.discover(Category::BankruptcyGuide, &[]).await.unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].volume_source, VolumeSource::Estimated);
    assert_eq!(ranked[0].search_volume, 350);
}

#[tokio::test]
async fn failed_brainstorm_still_scores_suggestions() {
    let d = discovery(
        FailingIdeas,
        ScriptedKeywords {
            suggestions: Some(vec![signal("distressed asset recovery", 700, 25)]),
            lookups: Some(vec![]),
        },
        FixedEnricher(vec![]),
    );

    let ranked = d.discover(Category::AssetRecovery, &[]).await.unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].keyword, "distressed asset recovery");
}

#[tokio::test]
async fn duplicate_ideas_are_dropped() {
    let fingerprints = vec![fingerprint(
        "existing",
        "Bankruptcy Asset Auctions for Buyers",
        "bankruptcy asset auction",
    )];
    let d = discovery(
        FixedIdeas(vec![
            idea("bankruptcy asset auction"), // exact duplicate of published post
            idea("equipment remarketing channels"),
        ]),
        ScriptedKeywords {
            suggestions: Some(vec![]),
            lookups: Some(vec![]),
        },
        FixedEnricher(vec![
            estimate("bankruptcy asset auction", 500, 9.0),
            estimate("equipment remarketing channels", 300, 7.0),
        ]),
    );

    let ranked = d.discover(Category::EquipmentRemarketing, &fingerprints).await.unwrap();
    let keywords: Vec<&str> = ranked.iter().map(|i| i.keyword.as_str()).collect();
    assert!(!keywords.contains(&"bankruptcy asset auction"));
    assert!(keywords.contains(&"equipment remarketing channels"));
}

#[tokio::test]
async fn discovery_is_idempotent_and_ties_keep_discovery_order() {
    // Two ideas with identical inputs → identical scores → brainstorm order
    let make = || {
        discovery(
            FixedIdeas(vec![idea("orderly liquidation value"), idea("forced liquidation value")]),
            ScriptedKeywords {
                suggestions: Some(vec![]),
                lookups: Some(vec![]),
            },
            FixedEnricher(vec![
                estimate("orderly liquidation value", 200, 6.0),
                estimate("forced liquidation value", 200, 6.0),
            ]),
        )
    };

    let first = make().discover(Category::LiquidationStrategy, &[]).await.unwrap();
    let second = make().discover(Category::LiquidationStrategy, &[]).await.unwrap();

    let order: Vec<&str> = first.iter().map(|i| i.keyword.as_str()).collect();
    assert_eq!(order, vec!["orderly liquidation value", "forced liquidation value"]);
    assert_eq!(first[0].score, first[1].score, "setup should produce a tie");
    assert_eq!(
        order,
        second.iter().map(|i| i.keyword.as_str()).collect::<Vec<_>>(),
        "unchanged inputs must rank identically"
    );
}
