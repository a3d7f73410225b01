//! The fact catalog - every fact available for rotation, indexed by id.
//!
//! The catalog is built once and is read-only afterwards. Selection never
//! errors: an empty catalog or a fully excluded one simply yields `None`.

mod loader;

pub use loader::*;

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::{CatalogError, Fact, FactId};

/// Facts bundled with the crate, used when no facts directory is configured.
const BUILTIN_FACTS: &str = include_str!("../../data/builtin_facts.json");

/// All known facts, keyed by id, plus the order they were loaded in.
#[derive(Debug, Clone, Default)]
pub struct FactCatalog {
    /// All facts stored by ID.
    facts: HashMap<FactId, Fact>,

    /// IDs in load order, for deterministic enumeration.
    order: Vec<FactId>,
}

impl FactCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from facts in the given order.
    ///
    /// Later facts reusing an earlier id are dropped with a warning.
    pub fn from_facts(facts: impl IntoIterator<Item = Fact>) -> Self {
        let mut catalog = Self::new();
        for fact in facts {
            if let Err(err) = catalog.insert(fact, "in-memory facts") {
                warn!(error = %err, "skipping fact");
            }
        }
        catalog
    }

    /// Build a catalog from a JSON document holding one fact or an array of facts.
    ///
    /// Malformed records are reported in the returned [`LoadReport`]; the
    /// well-formed ones still make it into the catalog.
    pub fn from_json(origin: &str, content: &str) -> (Self, LoadReport) {
        let mut catalog = Self::new();
        let mut report = LoadReport::default();
        catalog.absorb(origin, content, &mut report);
        (catalog, report)
    }

    /// The facts compiled into this crate.
    pub fn builtin() -> Self {
        let (catalog, report) = Self::from_json("builtin facts", BUILTIN_FACTS);
        for failure in &report.failures {
            warn!(error = %failure, "bundled fact rejected");
        }
        catalog
    }

    /// Add a fact, rejecting duplicate ids.
    pub(crate) fn insert(&mut self, fact: Fact, origin: &str) -> Result<(), CatalogError> {
        if self.facts.contains_key(&fact.id) {
            return Err(CatalogError::DuplicateId {
                id: fact.id,
                origin: origin.to_string(),
            });
        }

        self.order.push(fact.id.clone());
        self.facts.insert(fact.id.clone(), fact);
        Ok(())
    }

    /// Get the total number of facts.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All fact ids in load order.
    pub fn all_ids(&self) -> &[FactId] {
        &self.order
    }

    /// Get fact by ID.
    pub fn get_fact(&self, id: &FactId) -> Option<&Fact> {
        self.facts.get(id)
    }

    /// Check if a fact id is known.
    pub fn contains(&self, id: &FactId) -> bool {
        self.facts.contains_key(id)
    }

    /// Iterate over facts in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.order.iter().filter_map(|id| self.facts.get(id))
    }

    /// Pick a random fact whose id is not in `exclude`.
    pub fn random_fact(&self, exclude: &[FactId]) -> Option<&Fact> {
        self.random_fact_with_rng(exclude, &mut rand::thread_rng())
    }

    /// Pick a random fact whose id is not in `exclude`, using a specific RNG.
    ///
    /// Every eligible fact is equally likely. Returns `None` when nothing is
    /// eligible.
    pub fn random_fact_with_rng<R: Rng + ?Sized>(
        &self,
        exclude: &[FactId],
        rng: &mut R,
    ) -> Option<&Fact> {
        let excluded: HashSet<&FactId> = exclude.iter().collect();
        let eligible: Vec<&FactId> = self
            .order
            .iter()
            .filter(|id| !excluded.contains(id))
            .collect();

        eligible
            .choose(rng)
            .and_then(|id| self.facts.get(*id))
    }
}
