//! tysearch-catalog: loads indexed signature catalogs for tysearch.
//!
//! The offline indexer writes a JSON document: either a bare array of
//! [`CatalogEntry`] values or an object with an `entries` array. Type trees
//! inside it are tagged by `kind`, exactly as [`tysearch_core::TypeTree`]
//! serializes.

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tysearch_core::CatalogEntry;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Bare(Vec<CatalogEntry>),
    Wrapped { entries: Vec<CatalogEntry> },
}

impl From<CatalogDocument> for Vec<CatalogEntry> {
    fn from(doc: CatalogDocument) -> Self {
        match doc {
            CatalogDocument::Bare(entries) | CatalogDocument::Wrapped { entries } => entries,
        }
    }
}

/// Read and decode the catalog at `path`.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CatalogEntry>, CatalogError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = decode(std::io::BufReader::new(file), path)?;
    let stats = CatalogStats::of(&entries);
    tracing::debug!(
        path = %path.display(),
        entries = stats.total,
        with_signature = stats.with_signature,
        "catalog: loaded"
    );
    Ok(entries)
}

/// Decode a catalog from any reader; errors report the path as `<reader>`.
pub fn from_reader(reader: impl Read) -> Result<Vec<CatalogEntry>, CatalogError> {
    decode(reader, Path::new("<reader>"))
}

pub fn from_str(json: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    serde_json::from_str::<CatalogDocument>(json)
        .map(Into::into)
        .map_err(|source| CatalogError::Json {
            path: PathBuf::from("<string>"),
            source,
        })
}

fn decode(reader: impl Read, path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    serde_json::from_reader::<_, CatalogDocument>(reader)
        .map(Into::into)
        .map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Entry counts for a loaded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total: usize,
    /// Entries visible to type search.
    pub with_signature: usize,
}

impl CatalogStats {
    pub fn of(entries: &[CatalogEntry]) -> Self {
        Self {
            total: entries.len(),
            with_signature: entries.iter().filter(|e| e.parsed.is_some()).count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
