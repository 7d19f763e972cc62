//! Generation retry orchestration.
//!
//! The policy is asymmetric on purpose: ask the generator for more words
//! than we'll accept, accept slightly fewer than we asked for, and accept
//! fewer still on the final attempt. A near-miss draft beats total failure.
//! Structural validation is exempt from all leniency.
//!
//! The retry decision, the escalation schedule, and the feedback text are
//! pure functions; the driver loop just composes them.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use draftline_common::config::RetryPolicy;
use draftline_common::text::{slugify, word_count};
use draftline_common::types::{
    ContentProfile, DraftPayload, GeneratedDraft, GenerationAttempt, GenerationOutcome,
    ResolvedImageSet,
};
use draftline_common::DraftlineError;

use crate::traits::{AttemptDirectives, DraftGenerator, DraftRequest};

/// Minimum word count demanded of the generator on a given attempt. Retries
/// escalate the demand: the generator is told to try harder, not just asked
/// to resubmit.
pub fn requested_min_words(policy: &RetryPolicy, profile: ContentProfile, attempt: u32) -> usize {
    let floors = policy.floors(profile);
    if attempt <= 1 {
        floors.requested_baseline
    } else {
        floors.requested_retry
    }
}

/// Word count at which a produced body is accepted. Looser than the request,
/// and loosest on the final attempt.
pub fn acceptance_floor(
    policy: &RetryPolicy,
    profile: ContentProfile,
    attempt: u32,
    max_attempts: u32,
) -> usize {
    let floors = policy.floors(profile);
    if attempt >= max_attempts {
        floors.final_accept_floor
    } else {
        floors.accept_floor
    }
}

/// Admonition fed into the next attempt's prompt after an under-length body.
pub fn build_feedback(last: &GenerationAttempt) -> String {
    format!(
        "Your previous attempt was only {} words. That is too short — expand every \
         section with specific examples, statistics, and concrete guidance.",
        last.produced_word_count
    )
}

/// Required-field check, applied on every attempt with no leniency: a
/// structurally invalid response always retries regardless of budget
/// position.
pub fn structural_error(payload: &DraftPayload) -> Option<String> {
    let mut missing = Vec::new();
    if payload.title.trim().is_empty() {
        missing.push("title");
    }
    if payload.body.trim().is_empty() {
        missing.push("body");
    }
    if payload.primary_keyword.trim().is_empty() {
        missing.push("primary_keyword");
    }
    if missing.is_empty() {
        None
    } else {
        Some(format!("missing required fields: {}", missing.join(", ")))
    }
}

pub struct DraftRunner {
    generator: Arc<dyn DraftGenerator>,
    policy: RetryPolicy,
}

impl DraftRunner {
    pub fn new(generator: Arc<dyn DraftGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Drive one generation request through the bounded retry loop.
    ///
    /// Fails with `GenerationExhausted` only after every attempt in the
    /// budget failed validation, carrying the last attempt's error message.
    pub async fn generate_with_retry(
        &self,
        request: &DraftRequest,
    ) -> Result<GenerationOutcome, DraftlineError> {
        let mut attempts: Vec<GenerationAttempt> = Vec::new();
        let mut last_measured: Option<GenerationAttempt> = None;
        let mut last_error = String::from("no attempts made");

        for attempt in 1..=self.policy.max_attempts {
            let min_words = requested_min_words(&self.policy, request.profile, attempt);
            let directives = AttemptDirectives {
                min_words,
                feedback: last_measured.as_ref().map(build_feedback),
            };

            info!(
                topic = request.topic.as_str(),
                attempt,
                max = self.policy.max_attempts,
                min_words,
                "Generation attempt"
            );

            match self.generator.generate(request, &directives).await {
                Ok(payload) => {
                    if let Some(err) = structural_error(&payload) {
                        warn!(attempt, error = err.as_str(), "Structurally invalid response");
                        last_error = err;
                        attempts.push(GenerationAttempt {
                            attempt_number: attempt,
                            min_words_required: min_words,
                            produced_word_count: 0,
                            accepted: false,
                        });
                        continue;
                    }

                    let produced = word_count(&payload.body);
                    let floor = acceptance_floor(
                        &self.policy,
                        request.profile,
                        attempt,
                        self.policy.max_attempts,
                    );
                    let record = GenerationAttempt {
                        attempt_number: attempt,
                        min_words_required: min_words,
                        produced_word_count: produced,
                        accepted: produced >= floor,
                    };
                    attempts.push(record.clone());

                    if record.accepted {
                        info!(attempt, produced, "Draft accepted");
                        return Ok(GenerationOutcome {
                            draft: payload,
                            attempts,
                        });
                    }

                    last_error = format!("body too short: {produced} words (need {floor}+)");
                    warn!(attempt, produced, floor, "Draft rejected, retrying");
                    last_measured = Some(record);
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(attempt, error = last_error.as_str(), "Generation call failed");
                    attempts.push(GenerationAttempt {
                        attempt_number: attempt,
                        min_words_required: min_words,
                        produced_word_count: 0,
                        accepted: false,
                    });
                }
            }
        }

        Err(DraftlineError::GenerationExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }
}

/// Substitute `[IMAGE_N]` placeholders with markdown image blocks, in slot
/// order.
pub fn replace_image_placeholders(body: &str, images: &[draftline_common::types::BlogImage]) -> String {
    let mut result = body.to_string();
    for (i, image) in images.iter().enumerate() {
        let tag = format!("[IMAGE_{}]", i + 1);
        let markdown = format!("![{}]({})\n*{}*", image.alt, image.url, image.credit);
        result = result.replace(&tag, &markdown);
    }
    result
}

/// Assemble a publish-ready draft from an accepted payload and its resolved
/// images.
pub fn assemble_draft(payload: DraftPayload, images: ResolvedImageSet) -> GeneratedDraft {
    let body = replace_image_placeholders(&payload.body, &images.body);
    let word_count = word_count(&body);

    GeneratedDraft {
        id: Uuid::new_v4(),
        slug: slugify(&payload.title),
        title: payload.title,
        description: payload.description,
        primary_keyword: payload.primary_keyword,
        category: payload.category,
        tags: payload.tags,
        body,
        faqs: payload.faqs,
        sources: payload.sources,
        word_count,
        hero_image: images.hero,
        body_images: images.body,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftline_common::types::{BlogImage, Category};

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[test]
    fn baseline_then_escalated_request() {
        let p = policy();
        assert_eq!(requested_min_words(&p, ContentProfile::LongForm, 1), 1500);
        assert_eq!(requested_min_words(&p, ContentProfile::LongForm, 2), 2000);
        assert_eq!(requested_min_words(&p, ContentProfile::LongForm, 4), 2000);
    }

    #[test]
    fn requested_minimum_never_drops_below_baseline() {
        let p = policy();
        for profile in [ContentProfile::LongForm, ContentProfile::Closure] {
            let baseline = requested_min_words(&p, profile, 1);
            for attempt in 2..=p.max_attempts {
                assert!(requested_min_words(&p, profile, attempt) >= baseline);
            }
        }
    }

    #[test]
    fn final_attempt_floor_is_never_stricter() {
        let p = policy();
        for profile in [ContentProfile::LongForm, ContentProfile::Closure] {
            let earlier = acceptance_floor(&p, profile, p.max_attempts - 1, p.max_attempts);
            let last = acceptance_floor(&p, profile, p.max_attempts, p.max_attempts);
            assert!(last <= earlier);
        }
    }

    #[test]
    fn long_form_floors_match_policy() {
        let p = policy();
        assert_eq!(acceptance_floor(&p, ContentProfile::LongForm, 1, 4), 1400);
        assert_eq!(acceptance_floor(&p, ContentProfile::LongForm, 3, 4), 1400);
        assert_eq!(acceptance_floor(&p, ContentProfile::LongForm, 4, 4), 1000);
        assert_eq!(acceptance_floor(&p, ContentProfile::Closure, 1, 4), 750);
        assert_eq!(acceptance_floor(&p, ContentProfile::Closure, 4, 4), 600);
    }

    #[test]
    fn feedback_names_the_previous_word_count() {
        let last = GenerationAttempt {
            attempt_number: 1,
            min_words_required: 1500,
            produced_word_count: 1200,
            accepted: false,
        };
        let feedback = build_feedback(&last);
        assert!(feedback.contains("1200 words"));
    }

    #[test]
    fn structural_error_lists_missing_fields() {
        let payload = DraftPayload {
            title: String::new(),
            description: "d".to_string(),
            primary_keyword: "k".to_string(),
            category: Category::BankruptcyGuide,
            tags: vec![],
            body: "b".to_string(),
            faqs: vec![],
            sources: vec![],
        };
        let err = structural_error(&payload).unwrap();
        assert!(err.contains("title"));
        assert!(!err.contains("body"));
    }

    #[test]
    fn placeholders_replaced_in_slot_order() {
        let images = vec![
            BlogImage {
                url: "https://img/one".to_string(),
                alt: "one".to_string(),
                credit: "c1".to_string(),
            },
            BlogImage {
                url: "https://img/two".to_string(),
                alt: "two".to_string(),
                credit: "c2".to_string(),
            },
        ];
        let body = "intro\n[IMAGE_1]\nmiddle\n[IMAGE_2]\nend";
        let replaced = replace_image_placeholders(body, &images);
        assert!(replaced.contains("![one](https://img/one)"));
        assert!(replaced.contains("![two](https://img/two)"));
        assert!(!replaced.contains("[IMAGE_"));
    }

    #[test]
    fn unmatched_placeholders_are_left_for_validation() {
        let replaced = replace_image_placeholders("a\n[IMAGE_1]\n[IMAGE_2]", &[]);
        assert!(replaced.contains("[IMAGE_1]"));
    }
}
