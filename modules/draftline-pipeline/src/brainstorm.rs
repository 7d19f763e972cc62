//! LLM-backed implementations of the brainstorm, enrichment, and generation
//! services.
//!
//! The model is a collaborator, not a trusted source: every response goes
//! through defensive parsing with per-item defaults, and the generation
//! payload is validated again by the retry orchestrator.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use draftline_common::types::{BlogIdea, Category, ContentProfile, DraftPayload, EnrichedKeyword};
use llm_client::{util, LlmClient};

use crate::traits::{AttemptDirectives, DraftGenerator, DraftRequest, IdeaSource, KeywordEnricher};

const BRAINSTORM_TEMPERATURE: f32 = 0.3;
const ENRICH_TEMPERATURE: f32 = 0.2;
const GENERATE_TEMPERATURE: f32 = 0.7;

const RESEARCH_SYSTEM: &str = "You are a research assistant specializing in corporate distress, \
bankruptcy, asset disposition, and business intelligence. Provide accurate, verifiable \
information. The audience is liquidation firms, distressed PE, equipment remarketers, and \
wholesale asset buyers.";

// ---------------------------------------------------------------------------
// Brainstorming
// ---------------------------------------------------------------------------

pub struct LlmIdeaSource {
    llm: Arc<LlmClient>,
}

impl LlmIdeaSource {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IdeaSource for LlmIdeaSource {
    async fn brainstorm(&self, category: Category, count: usize) -> Result<Vec<BlogIdea>> {
        let prompt = format!(
            "For a corporate distress intelligence platform blog, suggest {count} SEO keyword \
             phrases in the \"{}\" category.\n\n\
             Each keyword must be a SHORT search phrase (2-6 words) that someone would actually \
             type into a search engine — not a blog title, and not an invented compound phrase. \
             Prefer existing queries that already have search demand.\n\n\
             GOOD examples: \"bankruptcy asset auction\", \"equipment liquidation pricing\", \
             \"chapter 7 vs chapter 11\".\n\
             BAD examples: \"How to Track Bankruptcy Filings for Liquidation Opportunities\", \
             \"multi-signal distress detection platform\".\n\n\
             For each keyword provide the exact phrase and a one-line description of the post \
             you'd write for it.\n\
             Format as a numbered list, one entry per line:\n\
             N. **keyword phrase** — description",
            category.name()
        );

        let response = self
            .llm
            .chat(RESEARCH_SYSTEM, &prompt, BRAINSTORM_TEMPERATURE)
            .await
            .context("brainstorm request failed")?;

        let ideas = parse_idea_list(&response);
        debug!(count = ideas.len(), "Parsed brainstormed ideas");
        Ok(ideas)
    }
}

/// Parse a numbered "N. **keyword** — description" list, tolerating missing
/// bold markers and any dash variant. Unparseable lines are skipped.
pub fn parse_idea_list(text: &str) -> Vec<BlogIdea> {
    let line_re = Regex::new(r"(?m)^\s*\d+\.\s+\*{0,2}(.+?)\*{0,2}\s*[—–-]\s*(.+)$")
        .expect("idea list regex");

    line_re
        .captures_iter(text)
        .map(|caps| BlogIdea {
            keyword: caps[1].replace('*', "").trim().to_string(),
            description: caps[2].trim().to_string(),
        })
        .filter(|idea| !idea.keyword.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Relevance assigned to keywords the model failed to estimate.
const FALLBACK_RELEVANCE: f64 = 5.0;

pub struct LlmKeywordEnricher {
    llm: Arc<LlmClient>,
}

impl LlmKeywordEnricher {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl KeywordEnricher for LlmKeywordEnricher {
    async fn estimate(
        &self,
        keywords: &[String],
        category: Category,
    ) -> Result<Vec<EnrichedKeyword>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let listing = keywords
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{}. {k}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "For these corporate distress and asset disposition blog keywords, estimate monthly \
             US search demand and relevance to distressed-asset buyers.\n\n\
             Keywords:\n{listing}\n\n\
             For each keyword estimate:\n\
             - Monthly US search volume (approximate, 0-10000)\n\
             - Relevance (1-10) for a blog in the \"{}\" category\n\n\
             Return ONLY a JSON array, no other text:\n\
             [{{\"keyword\": \"...\", \"volume\": 100, \"relevance\": 8}}, ...]",
            category.name()
        );

        let response = self
            .llm
            .chat(RESEARCH_SYSTEM, &prompt, ENRICH_TEMPERATURE)
            .await
            .context("enrichment request failed")?;

        Ok(parse_enrichment(&response, keywords))
    }
}

#[derive(serde::Deserialize)]
struct RawEstimate {
    keyword: String,
    #[serde(default)]
    volume: u64,
    #[serde(default)]
    relevance: Option<f64>,
}

/// Parse the estimate array, then backfill every requested keyword the model
/// skipped with zero volume and a neutral relevance.
pub fn parse_enrichment(response: &str, keywords: &[String]) -> Vec<EnrichedKeyword> {
    let parsed: Vec<RawEstimate> = util::extract_json_array(response)
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default();

    let mut enriched: Vec<EnrichedKeyword> = Vec::new();
    for raw in parsed {
        // Match back to a requested keyword so casing stays canonical
        let canonical = keywords
            .iter()
            .find(|k| k.eq_ignore_ascii_case(&raw.keyword))
            .cloned()
            .unwrap_or(raw.keyword);
        enriched.push(EnrichedKeyword {
            keyword: canonical,
            estimated_volume: raw.volume,
            relevance_score: raw.relevance.unwrap_or(FALLBACK_RELEVANCE),
        });
    }

    for keyword in keywords {
        if !enriched
            .iter()
            .any(|e| e.keyword.eq_ignore_ascii_case(keyword))
        {
            enriched.push(EnrichedKeyword {
                keyword: keyword.clone(),
                estimated_volume: 0,
                relevance_score: FALLBACK_RELEVANCE,
            });
        }
    }

    enriched
}

// ---------------------------------------------------------------------------
// Draft generation
// ---------------------------------------------------------------------------

pub struct LlmDraftGenerator {
    llm: Arc<LlmClient>,
}

impl LlmDraftGenerator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

fn generation_system(profile: ContentProfile) -> &'static str {
    match profile {
        ContentProfile::LongForm => {
            "You are an expert content writer for a corporate distress intelligence platform. \
             The audience is experienced professionals in distressed asset acquisition, \
             corporate liquidation, and asset remarketing.\n\n\
             Respond with a JSON object containing: title (max 70 chars, containing the primary \
             keyword), description (140-165 chars, containing the primary keyword), \
             primary_keyword, category, tags (5-8), body (full markdown article), faqs, and \
             sources (3-5 credible references).\n\n\
             Body structure, as ## headings: an unheaded 2-3 sentence hook, Quick Answer, \
             Market Snapshot (include [IMAGE_1] on its own line), Step-by-Step Guide (include \
             [IMAGE_2]), Decision Framework, Opportunity Playbook (include [IMAGE_3]), Common \
             Mistakes, Frequently Asked Questions (mirrored in the faqs array), Action Plan, \
             and Disclaimer.\n\n\
             Write in a professional, authoritative tone with concrete examples, specific \
             numbers, and real timeframes. No HTML tags."
        }
        ContentProfile::Closure => {
            "You are an expert content writer for a corporate distress intelligence platform, \
             writing a fast-turnaround company-closure brief for asset buyers. Concise, \
             news-style, factual.\n\n\
             Respond with a JSON object containing: title (max 70 chars, containing the company \
             name), description (140-165 chars), primary_keyword, category, tags (5-8), body \
             (markdown), faqs, and sources.\n\n\
             Body structure, as ## headings: an unheaded hook, What Happened, Assets Becoming \
             Available, Who's Handling the Liquidation, Timeline & Key Dates, How to Position, \
             Frequently Asked Questions (mirrored in the faqs array), and Disclaimer. No \
             [IMAGE_N] placeholders. No HTML tags."
        }
    }
}

#[async_trait]
impl DraftGenerator for LlmDraftGenerator {
    async fn generate(
        &self,
        request: &DraftRequest,
        directives: &AttemptDirectives,
    ) -> Result<DraftPayload> {
        let mut user = format!(
            "Write a comprehensive article (MINIMUM {} words in the body) about: \"{}\".\n\
             The body MUST contain at least {} words — write multiple detailed paragraphs per \
             section, with specific examples, real company names, dollar amounts, and precise \
             timelines.",
            directives.min_words, request.topic, directives.min_words
        );
        if let Some(category) = request.category {
            user.push_str(&format!("\nCategory: {category}"));
        }
        if let Some(ref context) = request.context {
            user.push_str(&format!(
                "\n\nRESEARCH DATA (ground your writing in these facts):\n{context}"
            ));
        }
        if let Some(ref feedback) = directives.feedback {
            user.push_str(&format!("\n\n{feedback}"));
        }

        let mut payload: DraftPayload = self
            .llm
            .structured(generation_system(request.profile), &user, GENERATE_TEMPERATURE)
            .await
            .context("generation request failed")?;

        // The caller's category decision is authoritative over the model's
        if let Some(category) = request.category {
            payload.category = category;
        }

        Ok(payload)
    }
}
