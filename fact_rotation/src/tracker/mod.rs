//! Shown-fact tracker - remembers which facts the current rotation cycle has
//! already presented.
//!
//! State lives in an injected [`StateStore`] under [`SHOWN_FACTS_KEY`] as a
//! JSON list of ids. Every mutation is written through before returning.

mod store;

pub use store::*;

use fact_catalog::FactId;
use std::collections::HashSet;
use tracing::warn;

/// Store key holding the shown-fact list.
pub const SHOWN_FACTS_KEY: &str = "fact_rotation.shown_facts";

/// Tracks facts shown in the current rotation cycle.
#[derive(Debug)]
pub struct ShownFactTracker<S> {
    store: S,
}

impl<S: StateStore> ShownFactTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The shown ids, in the order they were recorded.
    ///
    /// A stored value that cannot be read as a list of ids counts as an empty
    /// cycle; the next write replaces it.
    pub fn shown(&self) -> Result<Vec<FactId>, StoreError> {
        let value = match self.store.get(SHOWN_FACTS_KEY) {
            Ok(value) => value,
            Err(err @ StoreError::Corrupt { .. }) => {
                warn!(error = %err, "shown-fact state unreadable, starting a fresh cycle");
                None
            }
            Err(err) => return Err(err),
        };

        let Some(value) = value else {
            return Ok(Vec::new());
        };

        match serde_json::from_value::<Vec<FactId>>(value) {
            Ok(ids) => {
                // Hand-edited state may repeat ids.
                let mut seen = HashSet::new();
                Ok(ids.into_iter().filter(|id| seen.insert(id.clone())).collect())
            }
            Err(err) => {
                warn!(error = %err, "shown-fact state has the wrong shape, starting a fresh cycle");
                Ok(Vec::new())
            }
        }
    }

    /// Check whether a single fact was shown this cycle.
    pub fn is_shown(&self, id: &FactId) -> Result<bool, StoreError> {
        Ok(self.shown()?.contains(id))
    }

    /// Record `id` as shown. Recording an id twice is a no-op.
    pub fn add_shown(&mut self, id: &FactId) -> Result<(), StoreError> {
        let mut shown = self.shown()?;
        if shown.contains(id) {
            return Ok(());
        }

        shown.push(id.clone());
        self.persist(&shown)
    }

    /// Forget every shown fact, starting a new cycle.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.persist(&[])
    }

    /// True when every id in `all_ids` has been shown. Vacuously true for an
    /// empty slice.
    pub fn has_shown_all(&self, all_ids: &[FactId]) -> Result<bool, StoreError> {
        let shown: HashSet<FactId> = self.shown()?.into_iter().collect();
        Ok(all_ids.iter().all(|id| shown.contains(id)))
    }

    /// Drop recorded ids that are not in `known`, returning how many were
    /// removed. Only writes when something changed.
    pub fn retain_known(&mut self, known: &[FactId]) -> Result<usize, StoreError> {
        let known: HashSet<&FactId> = known.iter().collect();
        let shown = self.shown()?;
        let before = shown.len();

        let kept: Vec<FactId> = shown.into_iter().filter(|id| known.contains(id)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.persist(&kept)?;
        }
        Ok(removed)
    }

    fn persist(&mut self, ids: &[FactId]) -> Result<(), StoreError> {
        let value = serde_json::to_value(ids)?;
        self.store.set(SHOWN_FACTS_KEY, value)
    }
}
