//! Search layer: ranks catalog entries against a type-shaped query.
//!
//! The query is parsed once, then each entry with a parsed signature is tried
//! with up to three strategies: the whole signature, the return type alone,
//! and (for simple queries) each parameter. Hits at or below the minimum score
//! are dropped; the rest are sorted by score (stable) and truncated.

use crate::config::Config;
use crate::parser::QueryParser;
use crate::types::{CatalogEntry, MatchResult, TypeTree};
use crate::unify::unify;
use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_MIN_SCORE: f64 = 30.0;

const RETURN_ONLY_FACTOR: f64 = 0.75;
const PARAMETER_ONLY_FACTOR: f64 = 0.6;
const MAX_SUGGESTIONS: usize = 5;

/// Canonical example queries offered while the user types.
const SUGGESTIONS: &[&str] = &[
    "A -> Effect<B>",
    "Effect<A, E, R>",
    "Effect<A> -> Effect<B>",
    "Option<A>",
    "A -> Option<B>",
    "Option<A> -> A",
    "Either<A, E>",
    "Stream<A, E, R>",
    "Layer<A, E, R>",
    "Array<A> -> A",
    "(A, B) -> A",
    "A -> B",
    "string -> number",
    "* -> Effect<A>",
    "Effect<A> | Option<A>",
    "[A, B]",
];

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Which strategy produced a hit. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// The query matched the whole signature.
    Signature,
    /// The query matched the return type alone.
    ReturnType,
    /// The query matched the parameter at `index`.
    Parameter { index: usize },
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Signature => write!(f, "signature"),
            MatchStrategy::ReturnType => write!(f, "return"),
            MatchStrategy::Parameter { index } => write!(f, "param#{index}"),
        }
    }
}

/// One ranked catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub entry: &'a CatalogEntry,
    pub result: MatchResult,
    pub strategy: MatchStrategy,
}

impl SearchHit<'_> {
    pub fn score(&self) -> f64 {
        self.result.score
    }
}

// ---------------------------------------------------------------------------
// TypeSearch
// ---------------------------------------------------------------------------

/// A configured search. Holds no per-query state, so one instance can serve
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct TypeSearch {
    parser: QueryParser,
    default_limit: usize,
    min_score: f64,
}

impl Default for TypeSearch {
    fn default() -> Self {
        Self {
            parser: QueryParser::default(),
            default_limit: DEFAULT_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl TypeSearch {
    pub fn from_config(config: &Config) -> Self {
        Self {
            parser: QueryParser::from_config(&config.parser),
            default_limit: config.search.default_limit,
            min_score: config.search.min_score,
        }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Search with the configured default limit.
    pub fn search<'a>(&self, query: &str, entries: &'a [CatalogEntry]) -> Vec<SearchHit<'a>> {
        self.search_with_limit(query, entries, self.default_limit)
    }

    pub fn search_with_limit<'a>(
        &self,
        query: &str,
        entries: &'a [CatalogEntry],
        limit: usize,
    ) -> Vec<SearchHit<'a>> {
        let Some(parsed) = self.parser.parse(query) else {
            return Vec::new();
        };
        tracing::trace!(query, tree = %parsed.outline(), "search: parsed query");

        let mut hits: Vec<SearchHit<'a>> = entries
            .iter()
            .filter_map(|entry| match_entry(&parsed, entry))
            .filter(|hit| hit.score() > self.min_score)
            .collect();

        // `sort_by` is stable: equal scores keep catalog order.
        hits.sort_by(|a, b| b.score().total_cmp(&a.score()));
        let qualifying = hits.len();
        hits.truncate(limit);

        tracing::debug!(
            query,
            candidates = entries.len(),
            qualifying,
            returned = hits.len(),
            "search: type search complete"
        );
        hits
    }
}

/// Rank `entries` against `query` with built-in defaults.
pub fn search_by_type<'a>(
    query: &str,
    entries: &'a [CatalogEntry],
    limit: usize,
) -> Vec<SearchHit<'a>> {
    TypeSearch::default().search_with_limit(query, entries, limit)
}

/// Up to five canonical queries containing `partial` (case-insensitive).
pub fn get_type_suggestions(partial: &str) -> Vec<&'static str> {
    let needle = partial.to_lowercase();
    SUGGESTIONS
        .iter()
        .copied()
        .filter(|s| s.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Try each strategy in order; every attempt starts with fresh bindings.
fn match_entry<'a>(query: &TypeTree, entry: &'a CatalogEntry) -> Option<SearchHit<'a>> {
    let signature = entry.parsed.as_ref()?;
    let hit = |result: MatchResult, strategy| SearchHit {
        entry,
        result,
        strategy,
    };

    let whole = unify(query, &signature.as_function());
    if whole.matches {
        return Some(hit(whole, MatchStrategy::Signature));
    }

    let ret = unify(query, &signature.return_type);
    if ret.matches {
        return Some(hit(ret.scaled(RETURN_ONLY_FACTOR), MatchStrategy::ReturnType));
    }

    if query.is_complex() {
        return None;
    }
    signature
        .parameters
        .iter()
        .enumerate()
        .map(|(index, param)| (index, unify(query, &param.ty)))
        .find(|(_, result)| result.matches)
        .map(|(index, result)| {
            hit(
                result.scaled(PARAMETER_ONLY_FACTOR),
                MatchStrategy::Parameter { index },
            )
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
