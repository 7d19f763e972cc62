//! Relevance filter for keyword-service suggestions.
//!
//! The suggestion endpoint happily returns tangential "related" keywords, and
//! an unrelated high-volume health term must not pollute a niche-category
//! result set just because the vendor thinks it's adjacent. A suggestion is
//! kept only when its words overlap the domain vocabulary and/or the
//! category's seed-derived vocabulary past configurable thresholds.

use std::collections::HashSet;

use draftline_common::config::RelevanceThresholds;
use draftline_common::text::{significant_words, GENERAL_STOP_WORDS};
use draftline_common::types::Category;

/// Vocabulary that marks a keyword as belonging to the corporate-distress
/// domain.
pub const DOMAIN_WORDS: &[&str] = &[
    "distress", "distressed", "bankruptcy", "liquidation", "liquidate", "asset", "assets",
    "disposition", "acquisition", "restructuring", "insolvency", "insolvent", "foreclosure",
    "receivership", "creditor", "debtor", "auction", "remarketing", "remarket", "surplus",
    "salvage", "decommission", "decommissioned", "layoff", "layoffs", "closure", "closing",
    "shutdown", "warn", "chapter", "trustee", "corporate", "company", "companies", "business",
    "equipment", "inventory", "valuation", "appraisal", "diligence", "investment", "investing",
    "investor", "deal", "deals", "merger", "mergers", "turnaround", "recovery", "private",
    "equity", "debt", "loan", "npl", "performing", "special", "situations",
];

/// Build the seed-derived vocabulary for a category: significant words from
/// every seed keyword plus the category slug itself.
pub fn seed_vocabulary(seeds: &[String], category: Category) -> HashSet<String> {
    let mut vocab = HashSet::new();
    for seed in seeds {
        vocab.extend(significant_words(seed, GENERAL_STOP_WORDS, 3));
    }
    vocab.extend(significant_words(category.slug(), GENERAL_STOP_WORDS, 3));
    vocab
}

/// Whether a suggested keyword is relevant enough to score.
pub fn is_relevant_keyword(
    keyword: &str,
    seed_vocab: &HashSet<String>,
    thresholds: &RelevanceThresholds,
) -> bool {
    let kw_words: Vec<String> = keyword
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| w.len() > 1)
        .map(str::to_string)
        .collect();

    let domain_hits = kw_words
        .iter()
        .filter(|w| DOMAIN_WORDS.contains(&w.as_str()))
        .count();
    let seed_hits = kw_words.iter().filter(|w| seed_vocab.contains(*w)).count();

    // Strong domain signal alone (e.g. "distressed asset auction")
    if domain_hits >= thresholds.domain_only_hits {
        return true;
    }
    // Domain word anchored by category vocabulary (e.g. "asset liquidation timeline")
    if domain_hits >= thresholds.domain_hits_with_seed && seed_hits >= thresholds.seed_hits_with_domain {
        return true;
    }
    // Category vocabulary alone (keywords built from the seed terms)
    if seed_hits >= thresholds.seed_only_hits {
        return true;
    }

    false
}
