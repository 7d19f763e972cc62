//! Quality gate for assembled drafts.
//!
//! Errors block the hand-off to publishing; warnings surface in the run
//! report. Business-rule failures here are terminal: they are never
//! retried, per the error taxonomy.

use regex::Regex;

use draftline_common::config::{ContentRules, DedupTuning};
use draftline_common::types::{ContentFingerprint, GeneratedDraft, ValidationResult};

use crate::dedup::check_duplicate;

/// Validate a draft against the structural rules for its profile and the
/// published-content fingerprints.
pub fn validate_draft(
    draft: &GeneratedDraft,
    rules: &ContentRules,
    fingerprints: &[ContentFingerprint],
    dedup: &DedupTuning,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    let errors = &mut result.errors;
    let warnings = &mut result.warnings;

    // Required fields
    if draft.slug.is_empty() {
        errors.push("Missing slug".to_string());
    }
    if draft.title.is_empty() {
        errors.push("Missing title".to_string());
    }
    if draft.description.is_empty() {
        errors.push("Missing description".to_string());
    }
    if draft.body.is_empty() {
        errors.push("Missing body".to_string());
    }
    if draft.primary_keyword.is_empty() {
        errors.push("Missing primary keyword".to_string());
    }
    if draft.hero_image.url.is_empty() {
        errors.push("Missing hero image URL".to_string());
    }

    // Title length
    if draft.title.chars().count() > rules.max_title_length {
        errors.push(format!(
            "Title too long: {} chars (max {})",
            draft.title.chars().count(),
            rules.max_title_length
        ));
    }

    // Description length band
    if !draft.description.is_empty() {
        let len = draft.description.chars().count();
        if len < rules.description_min_length {
            errors.push(format!(
                "Description too short: {len} chars (min {})",
                rules.description_min_length
            ));
        }
        if len > rules.description_max_length {
            errors.push(format!(
                "Description too long: {len} chars (max {})",
                rules.description_max_length
            ));
        }
    }

    // Word count
    if draft.word_count < rules.min_word_count {
        errors.push(format!(
            "Word count too low: {} (min {})",
            draft.word_count, rules.min_word_count
        ));
    }

    // FAQs and headings
    if draft.faqs.len() < rules.min_faqs {
        errors.push(format!(
            "Not enough FAQs: {} (min {})",
            draft.faqs.len(),
            rules.min_faqs
        ));
    }
    let headings = draft
        .body
        .lines()
        .filter(|line| line.trim_start().starts_with("##"))
        .count();
    if headings < rules.min_headings {
        errors.push(format!(
            "Not enough headings: {headings} (min {})",
            rules.min_headings
        ));
    }

    // Keyword placement is warnings only
    if !draft.primary_keyword.is_empty() {
        let keyword = draft.primary_keyword.to_lowercase();
        if !draft.title.to_lowercase().contains(&keyword) {
            warnings.push("Primary keyword not found in title".to_string());
        }
        if !draft.description.to_lowercase().contains(&keyword) {
            warnings.push("Primary keyword not found in description".to_string());
        }
    }

    // Unresolved image placeholders
    let placeholder_re = Regex::new(r"\[IMAGE_\d+\]").expect("placeholder regex");
    if placeholder_re.is_match(&draft.body) {
        errors.push("Unresolved [IMAGE_N] placeholders in body".to_string());
    }

    // Slug collision with published content
    if fingerprints.iter().any(|fp| fp.slug == draft.slug) {
        errors.push(format!("Duplicate slug: \"{}\" already exists", draft.slug));
    }

    // Topic overlap: duplicates are errors, near-misses are warnings
    if !draft.primary_keyword.is_empty() && !fingerprints.is_empty() {
        let verdict = check_duplicate(&draft.primary_keyword, fingerprints, dedup);
        if verdict.is_duplicate {
            let title = verdict
                .matched
                .as_ref()
                .map(|m| m.title.as_str())
                .unwrap_or("existing post");
            errors.push(format!(
                "Topic duplicate: \"{}\" overlaps \"{title}\" ({}% match — {})",
                draft.primary_keyword,
                (verdict.similarity * 100.0).round() as u32,
                verdict.reason
            ));
        } else if let Some(m) = verdict.matched {
            if m.similarity >= dedup.similar_warn_floor {
                warnings.push(format!(
                    "Similar topic: {}% overlap with \"{}\"",
                    (m.similarity * 100.0).round() as u32,
                    m.title
                ));
            }
        }
    }

    // Hero URL must be remote HTTPS or a locally generated asset
    if !draft.hero_image.url.is_empty()
        && !draft.hero_image.url.starts_with("https://")
        && !draft.hero_image.url.starts_with("/blog/images/")
    {
        errors.push("Hero image URL must be HTTPS or a local /blog/images/ path".to_string());
    }

    result
}
