//! Opportunity scoring: fuses demand, difficulty, SERP richness, question
//! volume, keyword shape, and audience relevance into a single 0-100 score
//! with a per-component breakdown.
//!
//! Pure and total: it never fails, so callers can score both brainstormed
//! ideas and raw keyword-service suggestions with the same function.

use draftline_common::config::ScoringCaps;
use draftline_common::types::{KeywordSignal, ScoreBreakdown, VolumeSource};

/// Keyword shapes outside this word-count range get partial credit: overly
/// short head-terms and overly long invented phrases both rank lower, never
/// zero.
const IDEAL_WORDS_MIN: usize = 2;
const IDEAL_WORDS_MAX: usize = 6;
const OFF_SHAPE_CREDIT: u32 = 5;

pub fn compute_opportunity_score(
    signal: &KeywordSignal,
    relevance_score: f64,
    volume_source: VolumeSource,
    caps: &ScoringCaps,
) -> (u32, ScoreBreakdown) {
    // Volume is logarithmic: 10 vol ≈ 10pts, 100 ≈ 20pts, 1000 ≈ 30pts.
    let mut volume_score = 0;
    if signal.search_volume > 0 {
        let raw = (((signal.search_volume + 1) as f64).log10() * 10.0).round() as u32;
        let raw = raw.min(caps.max_search_volume);
        // Unvalidated estimates must never outrank measured data.
        volume_score = if volume_source == VolumeSource::Estimated {
            let estimate_cap =
                (caps.max_search_volume as f64 * caps.estimated_volume_ratio).round() as u32;
            raw.min(estimate_cap)
        } else {
            raw
        };
    }

    // Difficulty, inverted: lower difficulty earns more points. A reported
    // zero from measured data means genuinely easy; zero from anywhere else
    // means unknown and gets half credit.
    let difficulty_score = if signal.keyword_difficulty > 0 {
        (((100 - signal.keyword_difficulty as u32) as f64 / 100.0)
            * caps.max_keyword_difficulty as f64)
            .round() as u32
    } else if volume_source == VolumeSource::Measured {
        caps.max_keyword_difficulty
    } else {
        (caps.max_keyword_difficulty as f64 * 0.5).round() as u32
    };

    let serp_score = caps
        .max_serp_features
        .min(signal.serp_features.len() as u32 * 5);

    let questions_score = caps.max_related_questions.min(
        ((signal.related_question_count as f64 / 10.0) * caps.max_related_questions as f64)
            .round() as u32,
    );

    let word_count = signal.keyword.split_whitespace().count();
    let quality_score = if (IDEAL_WORDS_MIN..=IDEAL_WORDS_MAX).contains(&word_count) {
        caps.max_keyword_quality
    } else {
        OFF_SHAPE_CREDIT
    };

    let relevance = relevance_score.clamp(0.0, 10.0);
    let relevance_bonus = caps
        .max_relevance_bonus
        .min(((relevance / 10.0) * 10.0).round() as u32);

    let breakdown = ScoreBreakdown {
        search_volume: volume_score,
        keyword_difficulty: difficulty_score,
        serp_features: serp_score,
        related_questions: questions_score,
        keyword_quality: quality_score,
        relevance_bonus,
    };

    (breakdown.sum().min(100), breakdown)
}
