//! Topic-overlap detection against published content.
//!
//! An ordered cascade of matching heuristics, most confident first; the
//! first match wins. The order encodes an implicit confidence ranking
//! (exact keyword > reordered word-set > title containment > tag match >
//! Jaccard overlap) and must not be re-sorted without domain review.

use std::collections::HashSet;

use draftline_common::config::DedupTuning;
use draftline_common::text::{significant_words, DEFAULT_MIN_WORD_LEN, OVERLAP_STOP_WORDS};
use draftline_common::types::{ContentFingerprint, DuplicateVerdict, FingerprintMatch};

/// Similarity assigned by each cascade step.
const SIM_EXACT_KEYWORD: f64 = 1.0;
const SIM_WORD_SET: f64 = 0.95;
const SIM_TITLE_SUBSTRING: f64 = 0.9;
const SIM_TAG_MATCH: f64 = 0.8;

/// Leading characters of an existing title that, found inside the candidate,
/// count as containment.
const TITLE_PREFIX_CHARS: usize = 30;

/// Jaccard similarity |A ∩ B| / |A ∪ B|, defined as 0 when both sets are
/// empty.
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn matched(fp: &ContentFingerprint, similarity: f64) -> FingerprintMatch {
    FingerprintMatch {
        slug: fp.slug.clone(),
        title: fp.title.clone(),
        similarity,
    }
}

/// Check whether a candidate keyword would duplicate an existing post.
///
/// Ties within steps 1-4 go to the first fingerprint in input order; the
/// Jaccard fallback takes the strict maximum (first-encountered on exact
/// ties). Stateless; an empty fingerprint set yields a non-duplicate verdict
/// with no match.
pub fn check_duplicate(
    keyword: &str,
    fingerprints: &[ContentFingerprint],
    tuning: &DedupTuning,
) -> DuplicateVerdict {
    if fingerprints.is_empty() {
        return DuplicateVerdict::not_duplicate(None);
    }

    let keyword_lower = keyword.to_lowercase();
    let keyword_words = significant_words(keyword, OVERLAP_STOP_WORDS, DEFAULT_MIN_WORD_LEN);

    // Step 1: exact primary-keyword match.
    for fp in fingerprints {
        if !fp.primary_keyword.is_empty() && fp.primary_keyword.to_lowercase() == keyword_lower {
            return DuplicateVerdict::duplicate(
                matched(fp, SIM_EXACT_KEYWORD),
                format!("exact primary keyword match with \"{}\"", fp.title),
            );
        }
    }

    // Step 2: same significant words in a different order, i.e. one word set
    // contains the other, both having at least two words. Catches
    // "distressed debt investing" vs "investing in distressed debt".
    for fp in fingerprints {
        if fp.primary_keyword.is_empty() {
            continue;
        }
        let fp_words =
            significant_words(&fp.primary_keyword, OVERLAP_STOP_WORDS, DEFAULT_MIN_WORD_LEN);
        if keyword_words.len() >= 2 && fp_words.len() >= 2 {
            let candidate_in_existing = keyword_words.is_subset(&fp_words);
            let existing_in_candidate = fp_words.is_subset(&keyword_words);
            if candidate_in_existing || existing_in_candidate {
                return DuplicateVerdict::duplicate(
                    matched(fp, SIM_WORD_SET),
                    format!("same keywords (different order) as \"{}\"", fp.title),
                );
            }
        }
    }

    // Step 3: candidate contained in an existing title, or the existing
    // title's prefix contained in the candidate.
    for fp in fingerprints {
        let title_lower = fp.title.to_lowercase();
        let title_prefix: String = title_lower.chars().take(TITLE_PREFIX_CHARS).collect();
        if title_lower.contains(&keyword_lower)
            || (!title_prefix.is_empty() && keyword_lower.contains(&title_prefix))
        {
            return DuplicateVerdict::duplicate(
                matched(fp, SIM_TITLE_SUBSTRING),
                format!("keyword contained in existing title \"{}\"", fp.title),
            );
        }
    }

    // Step 4: candidate equals an existing tag verbatim.
    for fp in fingerprints {
        if fp.tags.iter().any(|t| t == &keyword_lower) {
            return DuplicateVerdict::duplicate(
                matched(fp, SIM_TAG_MATCH),
                format!("keyword matches tag in \"{}\"", fp.title),
            );
        }
    }

    // Step 5: Jaccard word overlap against each fingerprint's full word set.
    let mut best: Option<FingerprintMatch> = None;
    for fp in fingerprints {
        let sim = jaccard_similarity(&keyword_words, &fp.words);
        if best.as_ref().map_or(true, |b| sim > b.similarity) {
            best = Some(matched(fp, sim));
        }
    }

    match best {
        Some(b) if b.similarity >= tuning.jaccard_threshold => {
            let reason = format!(
                "{}% topic overlap with \"{}\"",
                (b.similarity * 100.0).round() as u32,
                b.title
            );
            DuplicateVerdict::duplicate(b, reason)
        }
        // The best match rides along even below threshold so callers can
        // show "similar but not duplicate" warnings.
        other => DuplicateVerdict::not_duplicate(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint(slug: &str, title: &str, keyword: &str, tags: &[&str]) -> ContentFingerprint {
        let all_text = format!("{title} {keyword} {}", tags.join(" "));
        ContentFingerprint {
            slug: slug.to_string(),
            title: title.to_string(),
            words: significant_words(&all_text, OVERLAP_STOP_WORDS, DEFAULT_MIN_WORD_LEN),
            primary_keyword: keyword.to_string(),
            tags: tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    fn tuning() -> DedupTuning {
        DedupTuning::default()
    }

    // --- jaccard_similarity ---

    #[test]
    fn jaccard_identical_sets_is_one() {
        let a = significant_words("distressed asset auction", OVERLAP_STOP_WORDS, 3);
        assert_eq!(jaccard_similarity(&a, &a), 1.0);
    }

    #[test]
    fn jaccard_with_empty_set_is_zero() {
        let a = significant_words("distressed asset auction", OVERLAP_STOP_WORDS, 3);
        let empty = HashSet::new();
        assert_eq!(jaccard_similarity(&a, &empty), 0.0);
        assert_eq!(jaccard_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn jaccard_half_overlap() {
        let a: HashSet<String> = ["auction", "process"].iter().map(|s| s.to_string()).collect();
        let b: HashSet<String> = ["auction", "timeline"].iter().map(|s| s.to_string()).collect();
        // 1 shared / 3 total
        assert!((jaccard_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    // --- cascade ---

    #[test]
    fn exact_keyword_match_is_duplicate_at_one() {
        let fps = vec![fingerprint("a", "Bankruptcy Asset Auctions Explained", "bankruptcy asset auction", &[])];
        let v = check_duplicate("Bankruptcy Asset Auction", &fps, &tuning());
        assert!(v.is_duplicate);
        assert_eq!(v.similarity, 1.0);
        assert!(v.reason.contains("exact primary keyword"));
    }

    #[test]
    fn reordered_word_set_fires_step_two() {
        let fps = vec![fingerprint(
            "restructuring",
            "Restructuring Under Chapter 11",
            "restructuring chapter 11",
            &[],
        )];
        let v = check_duplicate("chapter 11 restructuring", &fps, &tuning());
        assert!(v.is_duplicate);
        assert_eq!(v.similarity, 0.95);
        assert!(v.reason.contains("different order"));
    }

    #[test]
    fn exact_match_wins_over_title_containment() {
        // One fingerprint matches by exact keyword, another by title substring;
        // the cascade must report the exact match even though the substring
        // fingerprint comes first in input order.
        let fps = vec![
            fingerprint("by-title", "Bankruptcy asset auction timeline for buyers", "liquidation channels", &[]),
            fingerprint("by-keyword", "Auction Guide", "bankruptcy asset auction", &[]),
        ];
        let v = check_duplicate("bankruptcy asset auction", &fps, &tuning());
        assert!(v.is_duplicate);
        assert_eq!(v.similarity, 1.0);
        assert_eq!(v.matched.unwrap().slug, "by-keyword");
    }

    #[test]
    fn candidate_inside_existing_title_is_duplicate() {
        let fps = vec![fingerprint("t", "The Complete WARN Act Filing Tracker Guide", "", &[])];
        let v = check_duplicate("WARN Act filing tracker", &fps, &tuning());
        assert!(v.is_duplicate);
        assert_eq!(v.similarity, 0.9);
    }

    #[test]
    fn existing_title_prefix_inside_candidate_is_duplicate() {
        let fps = vec![fingerprint("t", "Equipment liquidation pricing", "", &[])];
        let v = check_duplicate("understanding equipment liquidation pricing today", &fps, &tuning());
        assert!(v.is_duplicate);
        assert_eq!(v.similarity, 0.9);
    }

    #[test]
    fn tag_match_is_duplicate_at_point_eight() {
        let fps = vec![fingerprint(
            "t",
            "Due Diligence for Distressed Deals",
            "distressed deal due diligence checklist",
            &["valuation basics"],
        )];
        let v = check_duplicate("Valuation Basics", &fps, &tuning());
        assert!(v.is_duplicate);
        assert_eq!(v.similarity, 0.8);
        assert!(v.reason.contains("tag"));
    }

    #[test]
    fn jaccard_above_threshold_is_duplicate() {
        let fps = vec![fingerprint(
            "t",
            "Corporate Liquidation Auction Strategy",
            "liquidation auction strategy",
            &[],
        )];
        // Shares liquidation + auction + strategy against a 4-word set
        let v = check_duplicate("corporate liquidation auction strategy", &fps, &tuning());
        assert!(v.is_duplicate);
    }

    #[test]
    fn below_threshold_carries_best_match_for_warnings() {
        let fps = vec![
            fingerprint("far", "Heavy Equipment Resale Value", "heavy equipment resale value", &[]),
            fingerprint("near", "Bankruptcy Auction Timelines", "bankruptcy auction timelines", &[]),
        ];
        let v = check_duplicate("bankruptcy process overview", &fps, &tuning());
        assert!(!v.is_duplicate);
        let m = v.matched.expect("best match must ride along");
        assert_eq!(m.slug, "near");
        assert!(m.similarity > 0.0 && m.similarity < 0.5);
        assert_eq!(v.similarity, m.similarity);
    }

    #[test]
    fn first_fingerprint_wins_ties_in_exact_step() {
        let fps = vec![
            fingerprint("first", "First Post", "distressed pe opportunities", &[]),
            fingerprint("second", "Second Post", "distressed pe opportunities", &[]),
        ];
        let v = check_duplicate("distressed pe opportunities", &fps, &tuning());
        assert_eq!(v.matched.unwrap().slug, "first");
    }

    #[test]
    fn jaccard_tie_keeps_first_encountered() {
        let fps = vec![
            fingerprint("alpha", "Alpha Heading Words", "surplus inventory channels", &[]),
            fingerprint("beta", "Beta Heading Words", "surplus inventory channels", &[]),
        ];
        // Word sets differ only by title words, so both fingerprints tie on
        // similarity; the strict max keeps the first encountered.
        let v = check_duplicate("surplus deals", &fps, &tuning());
        assert!(!v.is_duplicate);
        assert_eq!(v.matched.unwrap().slug, "alpha");
    }

    #[test]
    fn no_fingerprints_is_never_duplicate() {
        let v = check_duplicate("anything at all", &[], &tuning());
        assert!(!v.is_duplicate);
        assert!(v.matched.is_none());
        assert_eq!(v.similarity, 0.0);
        assert!(v.reason.is_empty());
    }

    #[test]
    fn single_word_candidate_skips_word_set_step() {
        // One significant word on the candidate side: step 2 requires ≥2 on
        // both sides, so this must not fire at 0.95.
        let fps = vec![fingerprint("t", "Some Unrelated Title", "liquidation timeline", &[])];
        let v = check_duplicate("liquidation", &fps, &tuning());
        assert!(v.similarity < 0.95);
    }

    #[test]
    fn configurable_threshold_is_honored() {
        let fps = vec![fingerprint("t", "Unrelated Heading Entirely", "asset auction process", &[])];
        let strict = DedupTuning { jaccard_threshold: 0.2, similar_warn_floor: 0.1 };
        let loose = DedupTuning { jaccard_threshold: 0.99, similar_warn_floor: 0.30 };
        // "asset auction guide" vs {asset, auction, process}: J = 2/4 = 0.5
        let candidate = "asset auction guide";
        assert!(check_duplicate(candidate, &fps, &strict).is_duplicate);
        assert!(!check_duplicate(candidate, &fps, &loose).is_duplicate);
    }
}
