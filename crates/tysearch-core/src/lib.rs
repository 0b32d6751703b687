//! tysearch-core: Hoogle-style type search core.
//!
//! This crate exposes the pipeline layers as public modules, plus the shared
//! types used across all of them.
//!
//! # Architecture
//!
//! ```text
//! query ──► Parser ──► TypeTree ──► Unifier (per catalog entry) ──► Search ranking
//! ```
//!
//! Everything here is synchronous and free of I/O; catalogs are handed in by
//! the caller as `&[CatalogEntry]`.

pub mod config;
pub mod parser;
pub mod search;
pub mod types;
pub mod unify;

pub use parser::{looks_like_type_query, parse, QueryParser};
pub use search::{get_type_suggestions, search_by_type, MatchStrategy, SearchHit, TypeSearch};
pub use types::{
    Bindings, CatalogEntry, MatchResult, Parameter, ParsedSignature, TypeKind, TypeParameter,
    TypeTree,
};
pub use unify::{unify, unify_with};
