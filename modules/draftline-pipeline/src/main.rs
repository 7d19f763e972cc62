use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use draftline_common::types::{Category, ContentProfile, ScoredIdea, VolumeSource};
use draftline_common::{Config, Tuning};
use llm_client::LlmClient;
use serpdata_client::SerpdataClient;
use stockphoto_client::StockPhotoClient;

use draftline_pipeline::batch::generate_batch;
use draftline_pipeline::brainstorm::{LlmDraftGenerator, LlmIdeaSource, LlmKeywordEnricher};
use draftline_pipeline::fingerprint::FingerprintStore;
use draftline_pipeline::generation::{assemble_draft, DraftRunner};
use draftline_pipeline::ideation::IdeaDiscovery;
use draftline_pipeline::images::{ImageRequest, ImageResolver, QueryCache};
use draftline_pipeline::traits::{DraftRequest, PhotoSource};
use draftline_pipeline::validate::validate_draft;

#[derive(Parser)]
#[command(name = "draftline", about = "Automated content opportunity pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover and rank content opportunities for a category
    Discover {
        #[arg(long)]
        category: Category,
        /// How many ranked ideas to show
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Discover, then generate the top-scoring ideas end to end
    Auto {
        #[arg(long)]
        category: Category,
        /// How many posts to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Generate a single post for a manually chosen topic
    Generate {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Generate a fast-turnaround closure brief for a company
    Closure {
        #[arg(long)]
        company: String,
        #[arg(long)]
        category: Option<Category>,
    },
}

/// Stand-in photo source when no vendor key is configured: tier 1 always
/// comes up empty and the resolver degrades to the curated pool.
struct NoPhotoService;

#[async_trait::async_trait]
impl PhotoSource for NoPhotoService {
    async fn search(
        &self,
        _query: &str,
        _limit: u32,
    ) -> Result<Vec<draftline_pipeline::traits::PhotoHit>> {
        Ok(Vec::new())
    }
}

struct Pipeline {
    config: Config,
    tuning: Tuning,
    discovery: IdeaDiscovery,
    runner: Arc<DraftRunner>,
    resolver: ImageResolver,
    store: FingerprintStore,
}

impl Pipeline {
    fn from_env() -> Self {
        let config = Config::from_env();
        let tuning = Tuning::default();

        let llm = Arc::new(LlmClient::new(&config.llm_api_key, &config.llm_model));
        let serp = Arc::new(SerpdataClient::new(
            &config.serpdata_login,
            &config.serpdata_password,
        ));
        let photos: Arc<dyn PhotoSource> = match config.stockphoto_access_key {
            Some(ref key) => Arc::new(StockPhotoClient::new(key)),
            None => {
                warn!("No STOCKPHOTO_ACCESS_KEY — images will come from the curated pool");
                Arc::new(NoPhotoService)
            }
        };

        let discovery = IdeaDiscovery::new(
            Arc::new(LlmIdeaSource::new(llm.clone())),
            serp,
            Arc::new(LlmKeywordEnricher::new(llm.clone())),
            tuning.clone(),
        );
        let runner = Arc::new(DraftRunner::new(
            Arc::new(LlmDraftGenerator::new(llm)),
            tuning.retry.clone(),
        ));
        let resolver = ImageResolver::new(photos);
        let store = FingerprintStore::new(&config.content_dir);

        Self {
            config,
            tuning,
            discovery,
            runner,
            resolver,
            store,
        }
    }

    async fn discover(&self, category: Category, top: usize) -> Result<Vec<ScoredIdea>> {
        let fingerprints = self.store.load();
        let ideas = self.discovery.discover(category, &fingerprints).await?;

        println!("{}", format_scored_ideas(&ideas, top));
        let min = self.tuning.scoring.min_opportunity_score;
        let qualified = ideas.iter().filter(|i| i.score >= min).count();
        println!("Ideas scored: {} — above threshold ({min}): {qualified}", ideas.len());

        Ok(ideas)
    }

    async fn generate(&self, requests: Vec<DraftRequest>) -> Result<()> {
        let fingerprints = self.store.load();
        let profiles: Vec<ContentProfile> = requests.iter().map(|r| r.profile).collect();
        let outcomes = generate_batch(
            self.runner.clone(),
            requests,
            self.tuning.generation_concurrency,
        )
        .await;

        // One cache for the whole batch, so repeated queries hit the vendor once
        let mut cache = QueryCache::new();

        for (outcome, profile) in outcomes.into_iter().zip(profiles) {
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Item failed generation");
                    continue;
                }
            };

            let draft = &outcome.draft;
            let body_count = match profile {
                ContentProfile::LongForm => self.tuning.body_image_count,
                ContentProfile::Closure => 0,
            };

            let images = self
                .resolver
                .resolve(
                    &ImageRequest {
                        title: draft.title.clone(),
                        description: draft.description.clone(),
                        primary_keyword: draft.primary_keyword.clone(),
                        category: draft.category,
                        tags: draft.tags.clone(),
                        company_name: None,
                    },
                    body_count,
                    &mut cache,
                )
                .await;

            let assembled = assemble_draft(outcome.draft, images);
            let rules = match profile {
                ContentProfile::LongForm => &self.tuning.content,
                ContentProfile::Closure => &self.tuning.closure_content,
            };
            let result = validate_draft(&assembled, rules, &fingerprints, &self.tuning.dedup);

            for warning in &result.warnings {
                println!("  warning: {warning}");
            }
            if !result.valid() {
                for error in &result.errors {
                    println!("  error: {error}");
                }
                warn!(slug = assembled.slug.as_str(), "Draft failed validation, not handed off");
                continue;
            }

            // Hand-off artifact for the (external) publish step
            let drafts_dir = self.config.content_dir.join("drafts");
            fs::create_dir_all(&drafts_dir).context("creating drafts dir")?;
            let path = drafts_dir.join(format!("{}.json", assembled.slug));
            fs::write(&path, serde_json::to_string_pretty(&assembled)?)
                .with_context(|| format!("writing {}", path.display()))?;

            info!(
                slug = assembled.slug.as_str(),
                words = assembled.word_count,
                attempts = outcome.attempts.len(),
                "Draft ready: {}",
                path.display()
            );
        }

        Ok(())
    }
}

fn format_scored_ideas(ideas: &[ScoredIdea], limit: usize) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:>4} {:>5} {:>9} {:>4} {:>7}  {}",
        "rank", "score", "volume", "kd", "cpc", "keyword"
    ));
    for (i, idea) in ideas.iter().take(limit).enumerate() {
        let volume = if idea.search_volume > 0 {
            let marker = if idea.volume_source == VolumeSource::Estimated { "~" } else { " " };
            format!("{}{marker}", idea.search_volume)
        } else {
            "n/a".to_string()
        };
        let kd = if idea.keyword_difficulty > 0 {
            idea.keyword_difficulty.to_string()
        } else {
            "n/a".to_string()
        };
        let cpc = if idea.cpc > 0.0 {
            format!("${:.2}", idea.cpc)
        } else {
            "n/a".to_string()
        };
        lines.push(format!(
            "{:>4} {:>5} {:>9} {:>4} {:>7}  {}",
            i + 1,
            idea.score,
            volume,
            kd,
            cpc,
            idea.keyword
        ));
    }
    lines.push(String::new());
    lines.push("volume with ~ = estimated (no measured data)".to_string());
    lines.join("\n")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("draftline_pipeline=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let pipeline = Pipeline::from_env();

    match cli.command {
        Command::Discover { category, top } => {
            pipeline.discover(category, top).await?;
        }
        Command::Auto { category, count } => {
            let ideas = pipeline.discover(category, count).await?;
            let min = pipeline.tuning.scoring.min_opportunity_score;
            let warn_at = pipeline.tuning.scoring.warn_threshold;

            let requests: Vec<DraftRequest> = ideas
                .iter()
                .filter(|idea| idea.score >= min)
                .take(count)
                .map(|idea| {
                    if idea.score < warn_at {
                        warn!(keyword = idea.keyword.as_str(), score = idea.score, "Low-score idea selected");
                    }
                    DraftRequest::builder()
                        .topic(idea.keyword.clone())
                        .category(Some(category))
                        .profile(ContentProfile::LongForm)
                        .build()
                })
                .collect();

            if requests.is_empty() {
                println!("No ideas above the score threshold ({min}); nothing to generate.");
                return Ok(());
            }
            pipeline.generate(requests).await?;
        }
        Command::Generate { topic, category } => {
            let request = DraftRequest::builder()
                .topic(topic)
                .category(category)
                .profile(ContentProfile::LongForm)
                .build();
            pipeline.generate(vec![request]).await?;
        }
        Command::Closure { company, category } => {
            let request = DraftRequest::builder()
                .topic(format!("{company} closing: what asset buyers need to know"))
                .category(Some(category.unwrap_or(Category::LiquidationStrategy)))
                .profile(ContentProfile::Closure)
                .context(Some(format!("Company: {company}")))
                .build();
            pipeline.generate(vec![request]).await?;
        }
    }

    Ok(())
}
