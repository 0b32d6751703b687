//! Query parser: turns a type-shaped query string into a [`TypeTree`].
//!
//! Parsing is best effort. Rules are tried in a fixed order (parenthesized
//! function, bare arrow, union, wildcard, constructor, tuple, type variable,
//! primitive) and anything left over becomes a `reference` leaf. Only empty
//! input or pathological nesting produce no tree at all.

use crate::config::ParserConfig;
use crate::types::TypeTree;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Recursion guard for bracket nesting. Union and arrow chains do not count.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Core container names of the indexed library; `Name<...>` with one of these
/// names is parsed as an `effect` node.
pub(crate) static CORE_CONTAINERS: phf::Set<&'static str> = phf::phf_set! {
    "Effect", "Stream", "Layer", "Option", "Either", "Exit", "Cause",
    "Schedule", "Scope", "Fiber", "Ref", "Queue", "PubSub", "Deferred",
    "Chunk", "Context", "Schema", "Config", "Sink", "Channel", "STM",
};

static PRIMITIVES: phf::Set<&'static str> = phf::phf_set! {
    "string", "number", "boolean", "bigint", "symbol", "void",
    "undefined", "null", "never", "unknown", "any", "object",
};

static SPACED_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+->\s+").expect("arrow pattern is valid"));

static TYPE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9]?$").expect("type variable pattern is valid"));

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$.]*$").expect("identifier pattern is valid"));

static TYPE_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>()\[\]|*]|=>").expect("syntax pattern is valid"));

static DEFAULT_PARSER: LazyLock<QueryParser> = LazyLock::new(QueryParser::default);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a (sub-)expression produced no tree. Never escapes [`QueryParser::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty type expression")]
    Empty,
    #[error("type expression nested deeper than {0} levels")]
    TooDeep(usize),
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Parse `query` with the built-in container names. `None` for blank or
/// unparsable input.
pub fn parse(query: &str) -> Option<TypeTree> {
    DEFAULT_PARSER.parse(query)
}

/// Classification hint for callers choosing UI affordances. Never affects
/// matching.
pub fn looks_like_type_query(query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }
    if TYPE_SYNTAX.is_match(query) || TYPE_VARIABLE.is_match(query) {
        return true;
    }
    let lower = query.to_lowercase();
    CORE_CONTAINERS
        .iter()
        .any(|name| lower.starts_with(&name.to_lowercase()))
}

/// Rewrite every whitespace-delimited `->` to `=>`.
///
/// Plain text substitution: brackets are not tracked here.
pub fn normalize_arrows(query: &str) -> String {
    SPACED_ARROW.replace_all(query, " => ").into_owned()
}

// ---------------------------------------------------------------------------
// QueryParser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QueryParser {
    effect_names: HashSet<String>,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(CORE_CONTAINERS.iter().copied())
    }
}

impl QueryParser {
    pub fn new<I, S>(effect_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            effect_names: effect_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.effect_constructors.iter().cloned())
    }

    pub fn is_effect_name(&self, name: &str) -> bool {
        self.effect_names.contains(name)
    }

    pub fn parse(&self, query: &str) -> Option<TypeTree> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = normalize_arrows(trimmed);
        match self.parse_expr(&normalized, 0) {
            Ok(tree) => Some(tree),
            Err(err) => {
                tracing::debug!(query = %trimmed, error = %err, "parser: query rejected");
                None
            }
        }
    }

    fn parse_expr(&self, input: &str, depth: usize) -> Result<TypeTree, ParseError> {
        if depth > MAX_PARSE_DEPTH {
            return Err(ParseError::TooDeep(MAX_PARSE_DEPTH));
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        if let Some(tree) = self.parse_parenthesized(text, depth)? {
            return Ok(tree);
        }

        if let Some(arrow) = find_top_level(text, "=>") {
            let ret = text[arrow + 2..].trim();
            if !ret.is_empty() {
                let params = self.parse_list(&text[..arrow], depth)?;
                let ret = self.parse_expr(ret, depth)?;
                return Ok(function_node(text, params, ret));
            }
        }

        if let Some(bar) = find_top_level(text, "|") {
            let (left, right) = (text[..bar].trim(), text[bar + 1..].trim());
            if !left.is_empty() && !right.is_empty() {
                return Ok(TypeTree::Union {
                    text: text.to_string(),
                    members: vec![self.parse_expr(left, depth)?, self.parse_expr(right, depth)?],
                });
            }
        }

        if text == "*" {
            return Ok(TypeTree::Wildcard);
        }

        if let Some((name, inner)) = split_constructor(text) {
            let args = self.parse_list(inner, depth)?;
            let (text, name) = (text.to_string(), name.to_string());
            return Ok(if self.is_effect_name(&name) {
                TypeTree::Effect { text, name, args }
            } else {
                TypeTree::Generic { text, name, args }
            });
        }

        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if is_balanced(inner) {
                return Ok(TypeTree::Tuple {
                    text: text.to_string(),
                    elements: self.parse_list(inner, depth)?,
                });
            }
        }

        if TYPE_VARIABLE.is_match(text) {
            return Ok(TypeTree::type_variable(text));
        }

        if PRIMITIVES.contains(text.to_lowercase().as_str()) {
            return Ok(TypeTree::primitive(text));
        }

        Ok(TypeTree::reference(text))
    }

    /// `(params) => ret`, or a parenthesized sub-expression. `None` when the
    /// text is not one of those shapes and later rules should run.
    fn parse_parenthesized(&self, text: &str, depth: usize) -> Result<Option<TypeTree>, ParseError> {
        if !text.starts_with('(') {
            return Ok(None);
        }
        let Some(close) = matching_paren(text) else {
            return Ok(None);
        };
        let inner = &text[1..close];
        let rest = text[close + 1..].trim_start();

        if let Some(ret) = rest.strip_prefix("=>").map(str::trim) {
            if ret.is_empty() {
                return Ok(None);
            }
            let params = self.parse_list(inner, depth)?;
            let ret = self.parse_expr(ret, depth)?;
            return Ok(Some(function_node(text, params, ret)));
        }
        if rest.is_empty() && !inner.trim().is_empty() {
            return self.parse_expr(inner, depth + 1).map(Some);
        }
        Ok(None)
    }

    /// Comma-separated list at the top level of `text`; empty segments are
    /// dropped.
    fn parse_list(&self, text: &str, depth: usize) -> Result<Vec<TypeTree>, ParseError> {
        split_top_level(text)
            .into_iter()
            .map(|part| self.parse_expr(part, depth + 1))
            .collect()
    }
}

fn function_node(text: &str, params: Vec<TypeTree>, ret: TypeTree) -> TypeTree {
    TypeTree::Function {
        text: text.to_string(),
        params,
        ret: Box::new(ret),
    }
}

// ---------------------------------------------------------------------------
// Depth-aware scanning
// ---------------------------------------------------------------------------

/// Walk `text` tracking `<([` / `>)]` nesting. The `>` of `=>` and `->` is an
/// arrow, never a closer. `visit` receives the byte offset and the depth
/// before that position; returning `true` stops the walk.
fn scan(text: &str, mut visit: impl FnMut(usize, i32) -> bool) -> i32 {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        if visit(i, depth) {
            return depth;
        }
        match bytes[i] {
            b'=' | b'-' if bytes.get(i + 1) == Some(&b'>') => {
                i += 2;
                continue;
            }
            b'<' | b'(' | b'[' => depth += 1,
            b'>' | b')' | b']' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    depth
}

fn find_top_level(text: &str, pattern: &str) -> Option<usize> {
    let mut found = None;
    scan(text, |i, depth| {
        if depth == 0 && text.as_bytes()[i..].starts_with(pattern.as_bytes()) {
            found = Some(i);
            true
        } else {
            false
        }
    });
    found
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut cuts = Vec::new();
    scan(text, |i, depth| {
        if depth == 0 && text.as_bytes()[i] == b',' {
            cuts.push(i);
        }
        false
    });

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(text.len())) {
        let part = text[start..cut].trim();
        if !part.is_empty() {
            parts.push(part);
        }
        start = cut + 1;
    }
    parts
}

/// Nesting never dips below zero and ends at zero.
fn is_balanced(text: &str) -> bool {
    let mut dipped = false;
    let end = scan(text, |_, depth| {
        dipped |= depth < 0;
        false
    });
    !dipped && end == 0
}

/// Byte offset of the `)` closing the `(` at offset 0. Only parens count.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `Name<inner>` → `(Name, inner)` when the outer angle brackets pair up.
fn split_constructor(text: &str) -> Option<(&str, &str)> {
    let open = text.find('<')?;
    let name = text[..open].trim();
    if !IDENTIFIER.is_match(name) {
        return None;
    }
    let inner = text.strip_suffix('>')?.get(open + 1..)?;
    is_balanced(inner).then_some((name, inner))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
