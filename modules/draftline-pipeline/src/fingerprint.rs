//! Loads published-content metadata and builds per-post fingerprints for
//! overlap detection.
//!
//! The store is rebuilt fresh on every pipeline run and is read-only within
//! a run; the publish step (external) owns all index mutation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use draftline_common::text::{significant_words, DEFAULT_MIN_WORD_LEN, OVERLAP_STOP_WORDS};
use draftline_common::types::ContentFingerprint;

const INDEX_FILE: &str = "_system/content_index.json";
const POSTS_DIR: &str = "blog";

/// One row of the published-content index.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_draft: bool,
}

/// The slice of a stored post the fingerprint needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPost {
    #[serde(default)]
    primary_keyword: String,
}

pub struct FingerprintStore {
    content_dir: PathBuf,
}

impl FingerprintStore {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Load fingerprints for all published (non-draft) posts. A missing
    /// index means no published content yet: an empty set, not an error.
    pub fn load(&self) -> Vec<ContentFingerprint> {
        let index_path = self.content_dir.join(INDEX_FILE);
        let entries: Vec<IndexEntry> = match fs::read_to_string(&index_path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %index_path.display(), error = %e, "Unreadable content index, treating as empty");
                    return Vec::new();
                }
            },
            Err(_) => return Vec::new(),
        };

        let fingerprints: Vec<ContentFingerprint> = entries
            .iter()
            .filter(|e| !e.is_draft)
            .map(|e| {
                let primary_keyword = self.read_primary_keyword(&e.slug);
                build_fingerprint(e, &primary_keyword)
            })
            .collect();

        debug!(count = fingerprints.len(), "Loaded content fingerprints");
        fingerprints
    }

    /// The full post file carries the primary keyword; the index doesn't.
    /// A missing or malformed post file degrades to the index data alone.
    fn read_primary_keyword(&self, slug: &str) -> String {
        let path = self.content_dir.join(POSTS_DIR).join(format!("{slug}.json"));
        read_stored_post(&path)
            .map(|p| p.primary_keyword)
            .unwrap_or_default()
    }
}

fn read_stored_post(path: &Path) -> Option<StoredPost> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Build one fingerprint: the word set is the union of significant words
/// from title, description, primary keyword, and tags.
pub fn build_fingerprint(entry: &IndexEntry, primary_keyword: &str) -> ContentFingerprint {
    let all_text = format!(
        "{} {} {} {}",
        entry.title,
        entry.description,
        primary_keyword,
        entry.tags.join(" ")
    );
    let words: HashSet<String> =
        significant_words(&all_text, OVERLAP_STOP_WORDS, DEFAULT_MIN_WORD_LEN);

    ContentFingerprint {
        slug: entry.slug.clone(),
        title: entry.title.clone(),
        words,
        primary_keyword: primary_keyword.to_string(),
        tags: entry.tags.iter().map(|t| t.to_lowercase()).collect(),
    }
}
