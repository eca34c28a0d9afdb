//! Name index and three-tier exercise name resolution.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::Catalog;

/// Which resolution tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Case-insensitive equality with a catalog name.
    Exact,
    /// Query contained in a catalog name, or the other way around.
    Substring,
    /// Best shared-word count between query and catalog name.
    TokenOverlap,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Substring => write!(f, "substring"),
            Self::TokenOverlap => write!(f, "token_overlap"),
        }
    }
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub template_id: String,
    /// Catalog display name of the matched entry
    pub matched_name: String,
    pub tier: MatchTier,
    /// Words shared between query and matched name
    pub score: usize,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    key: String,
    display_name: String,
    template_id: String,
    tokens: HashSet<String>,
}

/// Case-folded name → identifier index over a [`Catalog`].
///
/// Built once; read-only afterwards, so one index can be shared by
/// reference across threads.
///
/// Entries are kept sorted by (name length, name, identifier). The
/// substring and token-overlap tiers scan in that order and keep the first
/// best candidate, so ties always go to the shortest catalog name and the
/// result does not depend on the order the catalog was supplied in.
///
/// # Examples
///
/// ```
/// use routine_import_catalog::CatalogIndex;
///
/// let index = CatalogIndex::from_names([
///     ("ex1", "Bench Press"),
///     ("ex2", "Incline Bench Press"),
/// ]);
///
/// assert_eq!(index.resolve("BENCH PRESS").as_deref(), Some("ex1"));
/// // Substring: ties go to the shortest name
/// assert_eq!(index.resolve("Bench").as_deref(), Some("ex1"));
/// assert_eq!(index.resolve("Cable Fly"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexEntry>,
    exact: HashMap<String, usize>,
}

impl CatalogIndex {
    /// Builds the index from a catalog. Records with a blank name are skipped.
    pub fn new(catalog: &Catalog) -> Self {
        Self::build(
            catalog
                .iter()
                .map(|(id, record)| (id.to_string(), record.name.clone())),
        )
    }

    /// Builds the index from `(identifier, display name)` pairs.
    pub fn from_names<I, K, V>(names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::build(names.into_iter().map(|(id, name)| (id.into(), name.into())))
    }

    fn build(names: impl Iterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<IndexEntry> = names
            .filter_map(|(template_id, display_name)| {
                let key = normalize_name(&display_name);
                if key.is_empty() {
                    return None;
                }
                let tokens = tokenize(&key).map(str::to_string).collect();
                Some(IndexEntry {
                    key,
                    display_name,
                    template_id,
                    tokens,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            a.key
                .chars()
                .count()
                .cmp(&b.key.chars().count())
                .then_with(|| a.key.cmp(&b.key))
                .then_with(|| a.template_id.cmp(&b.template_id))
        });

        let mut exact = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            exact.entry(entry.key.clone()).or_insert(idx);
        }

        Self { entries, exact }
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a free-text exercise name to a catalog identifier.
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.resolve_match(name).map(|hit| hit.template_id)
    }

    /// Resolves a free-text exercise name, reporting which tier matched.
    ///
    /// 1. Exact: case-folded, whitespace-normalized equality.
    /// 2. Substring: the query is part of a catalog name or vice versa.
    /// 3. Token overlap: most shared words, at least one.
    pub fn resolve_match(&self, name: &str) -> Option<Resolution> {
        let query = normalize_name(name);
        if query.is_empty() {
            return None;
        }
        let query_tokens: HashSet<&str> = tokenize(&query).collect();

        let hit = if let Some(&idx) = self.exact.get(&query) {
            Some((idx, MatchTier::Exact))
        } else if let Some(idx) = self
            .entries
            .iter()
            .position(|entry| entry.key.contains(&query) || query.contains(&entry.key))
        {
            Some((idx, MatchTier::Substring))
        } else {
            self.best_token_overlap(&query_tokens)
                .map(|idx| (idx, MatchTier::TokenOverlap))
        };

        let Some((idx, tier)) = hit else {
            debug!(query = %name, "No catalog match for exercise name");
            return None;
        };

        let entry = &self.entries[idx];
        let score = shared_tokens(entry, &query_tokens);
        debug!(
            query = %name,
            template_id = %entry.template_id,
            matched = %entry.display_name,
            tier = %tier,
            "Resolved exercise name"
        );

        Some(Resolution {
            template_id: entry.template_id.clone(),
            matched_name: entry.display_name.clone(),
            tier,
            score,
        })
    }

    fn best_token_overlap(&self, query_tokens: &HashSet<&str>) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            let score = shared_tokens(entry, query_tokens);
            if score > best.map_or(0, |(_, best_score)| best_score) {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }
}

impl From<&Catalog> for CatalogIndex {
    fn from(catalog: &Catalog) -> Self {
        Self::new(catalog)
    }
}

fn shared_tokens(entry: &IndexEntry, query_tokens: &HashSet<&str>) -> usize {
    entry
        .tokens
        .iter()
        .filter(|token| query_tokens.contains(token.as_str()))
        .count()
}

/// Whitespace-separated words of a normalized name. Punctuation stays part
/// of the word, so `(barbell)` does not overlap `barbell`.
fn tokenize(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace()
}

/// Lowercases, trims and collapses inner whitespace.
fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
