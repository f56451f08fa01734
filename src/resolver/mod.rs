//! # Chemical Identifier Resolution
//!
//! Maps free-form chemical names (and InChI keys) to structure identifiers:
//! SMILES, CAS registry numbers, standard InChI keys, and IUPAC names.
//!
//! The external service is reached through the [`Resolve`] trait so the
//! pipeline never depends on a concrete backend. [`CirClient`] talks to a
//! CACTUS-style structure-resolver endpoint over HTTP; [`CachedResolver`]
//! wraps any backend with a durable on-disk cache keyed by `(input, kind)`.
//! The cache is an explicitly opened and closed object handed to the
//! adapter, never ambient process state, and it records failed lookups too,
//! so a warmed cache issues no external requests at all on a re-run.
//!
//! Lookup failures (no match, network trouble) surface as `Ok(None)`: the
//! pipeline drops the affected rows afterward instead of aborting.

use std::fmt;

use serde::{Deserialize, Serialize};

mod cache;
mod cir;

pub use cache::{CachedResolver, ResolverCache};
pub use cir::{CirClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Errors that can occur inside the resolver layer.
///
/// A lookup that simply finds nothing is not an error; it is an `Ok(None)`
/// result.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// I/O error while reading or persisting the cache
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache file is not valid JSON
    #[error("Cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Resolver endpoint URL cannot be used as a base
    #[error("Invalid resolver base URL: {0}")]
    InvalidBaseUrl(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The identifier representations the pipeline asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    Smiles,
    Cas,
    StdInchiKey,
    IupacName,
}

impl IdentifierKind {
    /// Stable wire name, also used as the cache key component.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Smiles => "smiles",
            IdentifierKind::Cas => "cas",
            IdentifierKind::StdInchiKey => "stdinchikey",
            IdentifierKind::IupacName => "iupac_name",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful resolution: one or more candidate identifiers.
///
/// Some kinds (CAS numbers in particular) legitimately return several
/// candidates; [`Resolution::first`] selects the first one deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    candidates: Vec<String>,
}

impl Resolution {
    /// Build a resolution from candidate strings; `None` when empty.
    pub fn new(candidates: Vec<String>) -> Option<Self> {
        if candidates.is_empty() {
            None
        } else {
            Some(Self { candidates })
        }
    }

    /// A single-candidate resolution.
    pub fn single(candidate: impl Into<String>) -> Self {
        Self {
            candidates: vec![candidate.into()],
        }
    }

    /// First candidate, the deterministic choice for multi-valued kinds.
    pub fn first(&self) -> &str {
        &self.candidates[0]
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

/// Backend seam for identifier resolution.
pub trait Resolve {
    /// Resolve `input` into the requested identifier kind. `Ok(None)` means
    /// the lookup found nothing (or failed); callers filter those out.
    fn resolve(
        &mut self,
        input: &str,
        kind: IdentifierKind,
    ) -> Result<Option<Resolution>, ResolverError>;
}
