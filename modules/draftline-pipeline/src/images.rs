//! Tiered image resolution.
//!
//! Tier 1: the photo service, queried most-specific-first with one broadened
//! category-level retry on zero results. Tier 2: the curated local pool,
//! scored by theme overlap. Tier 3: an optional generative override that
//! replaces the hero only and fails silently. A hard-coded default backstops
//! everything; no slot is ever left empty.
//!
//! The per-run query cache is an explicit object passed in by the caller,
//! scoped to one pipeline invocation; it is never a process-wide singleton.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use draftline_common::types::{BlogImage, Category, ResolvedImageSet};

use crate::curated::{curated_for_category, default_image};
use crate::traits::{HeroIllustrator, IllustrationBrief, PhotoHit, PhotoSource};

/// Results requested per photo search.
const SEARCH_LIMIT: u32 = 10;

/// Words that don't translate to useful photographic results.
const NON_VISUAL_WORDS: &[&str] = &[
    "the", "and", "for",
    "strategy", "strategies", "guide", "analysis", "framework", "overview", "comprehensive",
    "complete", "ultimate", "essential", "introduction", "best", "practices", "tips", "trends",
    "insights", "approach", "understanding", "explained", "everything", "need", "know", "what",
    "when", "where", "which", "that", "this", "with", "from", "into", "about", "your", "their",
    "more", "most", "will", "does", "should", "could", "would", "have", "been", "than", "also",
    "just", "only", "very", "much", "many", "some", "other", "each", "every", "both", "such",
];

/// Concrete photographic scenes per category, ordered by specificity.
fn visual_scenes(category: Category) -> &'static [&'static str; 3] {
    match category {
        Category::WarnAct => &[
            "corporate layoff office empty desks",
            "government building filing documents",
            "factory workers leaving plant",
        ],
        Category::BankruptcyGuide => &[
            "courthouse gavel legal proceedings",
            "bankruptcy filing documents desk",
            "judge courtroom law",
        ],
        Category::IndustryAnalysis => &[
            "business analyst dashboard charts",
            "corporate boardroom presentation data",
            "market trading floor screens",
        ],
        Category::AssetRecovery => &[
            "warehouse pallets inventory storage",
            "auction house bidding crowd",
            "salvage yard equipment recovery",
        ],
        Category::DueDiligence => &[
            "lawyer reviewing documents magnifying",
            "audit financial paperwork inspection",
            "contract negotiation conference table",
        ],
        Category::LiquidationStrategy => &[
            "store closing sale retail signs",
            "warehouse clearance auction crowd",
            "commercial property vacant building",
        ],
        Category::EquipmentRemarketing => &[
            "industrial machinery factory floor",
            "heavy equipment construction site",
            "server room technology hardware",
        ],
        Category::DistressedInvesting => &[
            "stock market trading financial charts",
            "wall street finance district",
            "investment portfolio risk analysis",
        ],
    }
}

/// Per-run photo search cache keyed by query string. Passed explicitly into
/// `resolve` so batch runs share lookups without any global state.
#[derive(Default)]
pub struct QueryCache {
    entries: HashMap<String, Vec<PhotoHit>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, query: &str) -> Option<&Vec<PhotoHit>> {
        self.entries.get(query)
    }

    fn insert(&mut self, query: &str, hits: Vec<PhotoHit>) {
        self.entries.insert(query.to_string(), hits);
    }
}

/// What the resolver knows about the item being illustrated.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub title: String,
    pub description: String,
    pub primary_keyword: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// Closure posts anchor the hero query on the company name.
    pub company_name: Option<String>,
}

/// Extract visually concrete words, filtering abstract business jargon.
pub fn extract_visual_terms(text: &str, max_words: usize) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    cleaned
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| w.len() > 2 && !NON_VISUAL_WORDS.contains(w))
        .take(max_words)
        .map(str::to_string)
        .collect()
}

/// The hero query is the most specific: concrete terms from the title, then
/// the keyword, falling back to the category's signature scene.
pub fn build_hero_query(request: &ImageRequest) -> String {
    if let Some(ref company) = request.company_name {
        return format!("{company} store closing");
    }

    let title_terms = extract_visual_terms(&request.title, 4);
    let keyword_terms = extract_visual_terms(&request.primary_keyword, 3);

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for term in title_terms.into_iter().chain(keyword_terms) {
        if seen.insert(term.clone()) {
            merged.push(term);
        }
    }

    if merged.len() >= 2 {
        merged.truncate(4);
        return merged.join(" ");
    }

    visual_scenes(request.category)[0].to_string()
}

/// One distinct query per body slot, each taking a different angle: tag
/// terms anchored by the category's signature scene word, then rotated
/// category scenes to fill out.
pub fn build_body_queries(tags: &[String], category: Category, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let scenes = visual_scenes(category);
    let anchor = scenes[0].split_whitespace().next().unwrap_or("corporate");
    let mut queries: Vec<String> = Vec::new();

    for tag in tags {
        if queries.len() >= count {
            break;
        }
        let mut terms = extract_visual_terms(tag, 3);
        if terms.is_empty() {
            continue;
        }
        terms.push(anchor.to_string());
        let query = terms.join(" ");

        // Near-duplicate queries waste a search and return the same photos
        let near_duplicate = queries.iter().any(|existing| {
            let existing_words: HashSet<&str> = existing.split(' ').collect();
            query.split(' ').filter(|w| existing_words.contains(w)).count() >= 2
        });
        if !near_duplicate {
            queries.push(query);
        }
    }

    let mut scene_idx = 1; // scenes[0] already anchors the tag queries
    while queries.len() < count && scene_idx < scenes.len() {
        queries.push(scenes[scene_idx].to_string());
        scene_idx += 1;
    }
    while queries.len() < count {
        queries.push(scenes[0].to_string());
    }

    queries.truncate(count);
    queries
}

fn broadened_query(category: Category) -> String {
    visual_scenes(category)[0].to_string()
}

pub struct ImageResolver {
    photos: Arc<dyn PhotoSource>,
    illustrator: Option<Arc<dyn HeroIllustrator>>,
}

impl ImageResolver {
    pub fn new(photos: Arc<dyn PhotoSource>) -> Self {
        Self {
            photos,
            illustrator: None,
        }
    }

    /// Enable the tier-3 generative hero override.
    pub fn with_illustrator(mut self, illustrator: Arc<dyn HeroIllustrator>) -> Self {
        self.illustrator = Some(illustrator);
        self
    }

    /// Resolve a hero plus exactly `body_count` body images for one item.
    pub async fn resolve(
        &self,
        request: &ImageRequest,
        body_count: usize,
        cache: &mut QueryCache,
    ) -> ResolvedImageSet {
        let mut used: HashSet<String> = HashSet::new();

        // --- Tier 1: photo service, hero first ---
        let hero_query = build_hero_query(request);
        let mut hero_hits = self.search_cached(&hero_query, cache).await;
        if hero_hits.is_empty() {
            let fallback = broadened_query(request.category);
            debug!(query = hero_query.as_str(), fallback = fallback.as_str(), "Hero query empty, broadening");
            hero_hits = self.search_cached(&fallback, cache).await;
        }

        let mut hero: Option<BlogImage> = None;
        if let Some(hit) = hero_hits.first() {
            self.photos.mark_used(hit).await;
            used.insert(hit.image.url.clone());
            hero = Some(hit.image.clone());
        }

        // Body slots, one angled query per slot
        let mut body: Vec<BlogImage> = Vec::new();
        for query in build_body_queries(&request.tags, request.category, body_count) {
            if body.len() >= body_count {
                break;
            }
            let hits = self.search_cached(&query, cache).await;
            if let Some(hit) = hits.iter().find(|h| !used.contains(&h.image.url)) {
                self.photos.mark_used(hit).await;
                used.insert(hit.image.url.clone());
                body.push(hit.image.clone());
            }
        }

        // Unfilled slots pull spares from the hero search before leaving tier 1
        for hit in &hero_hits {
            if body.len() >= body_count {
                break;
            }
            if !used.contains(&hit.image.url) {
                self.photos.mark_used(hit).await;
                used.insert(hit.image.url.clone());
                body.push(hit.image.clone());
            }
        }

        // --- Tier 2: curated pool backfill ---
        if hero.is_none() {
            if let Some(image) = curated_for_category(request.category, 1, &used).into_iter().next() {
                used.insert(image.url.clone());
                hero = Some(image);
            }
        }
        if body.len() < body_count {
            for image in curated_for_category(request.category, body_count - body.len(), &used) {
                used.insert(image.url.clone());
                body.push(image);
            }
        }

        // Backstop: never leave a slot empty
        let mut hero = hero.unwrap_or_else(default_image);
        while body.len() < body_count {
            body.push(default_image());
        }

        // --- Tier 3: generative override, hero slot only ---
        if let Some(ref illustrator) = self.illustrator {
            let brief = IllustrationBrief {
                title: request.title.clone(),
                description: request.description.clone(),
                category: request.category,
                primary_keyword: request.primary_keyword.clone(),
                tags: request.tags.clone(),
            };
            match illustrator.illustrate(&brief).await {
                Ok(image) => hero = image,
                Err(e) => debug!(error = %e, "Hero override failed, keeping tiered result"),
            }
        }

        ResolvedImageSet { hero, body }
    }

    /// Cached photo search. Failures are not cached, so a later item in the
    /// same run can retry the query.
    async fn search_cached(&self, query: &str, cache: &mut QueryCache) -> Vec<PhotoHit> {
        if let Some(hits) = cache.get(query) {
            return hits.clone();
        }
        match self.photos.search(query, SEARCH_LIMIT).await {
            Ok(hits) => {
                cache.insert(query, hits.clone());
                hits
            }
            Err(e) => {
                warn!(query, error = %e, "Photo search failed");
                Vec::new()
            }
        }
    }
}
