//! Retry orchestrator driven against a scripted generator: escalation,
//! feedback, final-attempt leniency, structural strictness, and exhaustion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use draftline_common::config::RetryPolicy;
use draftline_common::types::{Category, ContentProfile, DraftPayload};
use draftline_common::DraftlineError;
use draftline_pipeline::generation::DraftRunner;
use draftline_pipeline::traits::{AttemptDirectives, DraftGenerator, DraftRequest};

/// What the scripted generator does on each successive call.
#[derive(Clone)]
enum Step {
    /// Produce a structurally valid draft with a body of exactly N words.
    Words(usize),
    /// Produce a long body but omit the title.
    MissingTitle,
    /// Fail the call outright (transport-level error).
    Fail(&'static str),
}

struct ScriptedGenerator {
    steps: Mutex<VecDeque<Step>>,
    seen: Mutex<Vec<AttemptDirectives>>,
}

impl ScriptedGenerator {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn directives_seen(&self) -> Vec<AttemptDirectives> {
        self.seen.lock().unwrap().clone()
    }
}

fn payload(words: usize, title: &str) -> DraftPayload {
    DraftPayload {
        title: title.to_string(),
        description: "A description of the draft".to_string(),
        primary_keyword: "bankruptcy asset auction".to_string(),
        category: Category::BankruptcyGuide,
        tags: vec!["auctions".to_string()],
        body: vec!["word"; words].join(" "),
        faqs: vec![],
        sources: vec![],
    }
}

#[async_trait]
impl DraftGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _request: &DraftRequest,
        directives: &AttemptDirectives,
    ) -> Result<DraftPayload> {
        self.seen.lock().unwrap().push(directives.clone());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .expect("generator called more times than scripted");
        match step {
            Step::Words(n) => Ok(payload(n, "Scripted Draft")),
            Step::MissingTitle => Ok(payload(5000, "")),
            Step::Fail(msg) => bail!("{msg}"),
        }
    }
}

fn request(profile: ContentProfile) -> DraftRequest {
    DraftRequest::builder()
        .topic("bankruptcy asset auction")
        .category(Some(Category::BankruptcyGuide))
        .profile(profile)
        .build()
}

fn runner(generator: &Arc<ScriptedGenerator>) -> DraftRunner {
    DraftRunner::new(generator.clone(), RetryPolicy::default())
}

#[tokio::test]
async fn under_length_draft_retries_with_escalated_demand_and_feedback() {
    // Attempt 1 produces 1200 words (< 1400 floor); attempts 2-3 stay short;
    // attempt 4 produces 1050, above the relaxed 1000-word final floor.
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Step::Words(1200),
        Step::Words(900),
        Step::Words(950),
        Step::Words(1050),
    ]));
    let outcome = runner(&generator)
        .generate_with_retry(&request(ContentProfile::LongForm))
        .await
        .expect("final attempt should be accepted");

    assert_eq!(outcome.attempts.len(), 4);
    assert!(outcome.attempts[3].accepted);
    assert_eq!(outcome.attempts[0].produced_word_count, 1200);
    assert!(!outcome.attempts[0].accepted);

    let seen = generator.directives_seen();
    assert_eq!(seen[0].min_words, 1500, "baseline demand on attempt 1");
    assert!(seen[0].feedback.is_none());
    assert_eq!(seen[1].min_words, 2000, "escalated demand on retry");
    assert!(
        seen[1].feedback.as_deref().unwrap().contains("1200 words"),
        "feedback must cite the previous attempt's word count"
    );
    assert!(seen[3].feedback.as_deref().unwrap().contains("950 words"));
}

#[tokio::test]
async fn adequate_first_attempt_is_accepted_without_retry() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Step::Words(1600)]));
    let outcome = runner(&generator)
        .generate_with_retry(&request(ContentProfile::LongForm))
        .await
        .unwrap();

    assert_eq!(outcome.attempts.len(), 1);
    assert!(outcome.attempts[0].accepted);
    assert_eq!(generator.directives_seen().len(), 1);
}

#[tokio::test]
async fn word_count_between_floors_is_rejected_early_but_accepted_late() {
    // 1050 words: under the 1400 running floor, over the 1000 final floor
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Step::Words(1050),
        Step::Words(1050),
        Step::Words(1050),
        Step::Words(1050),
    ]));
    let outcome = runner(&generator)
        .generate_with_retry(&request(ContentProfile::LongForm))
        .await
        .unwrap();

    assert_eq!(outcome.attempts.len(), 4, "identical output only passes on the final attempt");
    assert!(outcome.attempts[3].accepted);
}

#[tokio::test]
async fn closure_profile_uses_short_form_floors() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Step::Words(700), // < 750 running floor
        Step::Words(700),
        Step::Words(700),
        Step::Words(610), // ≥ 600 final floor
    ]));
    let outcome = runner(&generator)
        .generate_with_retry(&request(ContentProfile::Closure))
        .await
        .unwrap();

    assert!(outcome.attempts[3].accepted);
    assert!(!outcome.attempts[0].accepted);
}

#[tokio::test]
async fn structurally_invalid_response_never_gets_leniency() {
    // The final response is long enough to clear any floor, but has no
    // title. Structural validation is exempt from end-of-budget leniency.
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Step::Words(900),
        Step::Words(900),
        Step::Words(900),
        Step::MissingTitle,
    ]));
    let err = runner(&generator)
        .generate_with_retry(&request(ContentProfile::LongForm))
        .await
        .unwrap_err();

    match err {
        DraftlineError::GenerationExhausted { attempts, last_error } => {
            assert_eq!(attempts, 4);
            assert!(last_error.contains("missing required fields"), "got: {last_error}");
            assert!(last_error.contains("title"));
        }
        other => panic!("expected GenerationExhausted, got {other}"),
    }
}

#[tokio::test]
async fn exhaustion_carries_the_last_attempts_error() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Step::Words(800),
        Step::Words(800),
        Step::Words(800),
        Step::Words(800),
    ]));
    let err = runner(&generator)
        .generate_with_retry(&request(ContentProfile::LongForm))
        .await
        .unwrap_err();

    match err {
        DraftlineError::GenerationExhausted { attempts, last_error } => {
            assert_eq!(attempts, 4);
            assert!(last_error.contains("800 words"), "got: {last_error}");
        }
        other => panic!("expected GenerationExhausted, got {other}"),
    }
}

#[tokio::test]
async fn transport_error_retries_without_fabricating_feedback() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Step::Fail("service unavailable"),
        Step::Words(1600),
    ]));
    let outcome = runner(&generator)
        .generate_with_retry(&request(ContentProfile::LongForm))
        .await
        .unwrap();

    assert_eq!(outcome.attempts.len(), 2);
    assert!(outcome.attempts[1].accepted);

    let seen = generator.directives_seen();
    assert!(
        seen[1].feedback.is_none(),
        "a failed call produced no word count to feed back"
    );
}
