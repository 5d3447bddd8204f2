//! patsim-cases
//!
//! The case catalog: an immutable, ordered list of clinical cases that
//! sessions draw from. Pure data — no network dependency.

mod builtin;
pub mod error;

use std::collections::HashSet;
use std::path::Path;

use patsim_core::models::case::Case;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use error::CatalogError;

/// Read-only catalog shared by every session.
#[derive(Debug, Clone, Default)]
pub struct CaseCatalog {
    cases: Vec<Case>,
}

impl CaseCatalog {
    /// Build a catalog from records, rejecting duplicate ids.
    ///
    /// An empty list is accepted here; it only fails when a session tries
    /// to draw a case.
    pub fn new(cases: Vec<Case>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for case in &cases {
            if !seen.insert(case.id) {
                return Err(CatalogError::DuplicateId(case.id));
            }
        }
        Ok(Self { cases })
    }

    /// The reference cases shipped with the simulator.
    pub fn builtin() -> Self {
        Self {
            cases: builtin::BUILTIN_CASES.clone(),
        }
    }

    /// Parse a JSON array of case records.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cases: Vec<Case> = serde_json::from_str(json)?;
        Self::new(cases)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&contents)?;
        info!(path = %path.display(), count = catalog.len(), "loaded case catalog");
        Ok(catalog)
    }

    /// Select one case uniformly at random.
    ///
    /// The caller binds the returned case to a session once; it is never
    /// re-drawn per request.
    pub fn pick_case<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Case, CatalogError> {
        self.cases.choose(rng).cloned().ok_or(CatalogError::Empty)
    }

    pub fn pick_case_random(&self) -> Result<Case, CatalogError> {
        self.pick_case(&mut rand::thread_rng())
    }

    pub fn get(&self, id: u32) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Case> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
