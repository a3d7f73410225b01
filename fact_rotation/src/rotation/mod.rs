//! Rotation - choose the next fact without repeating one until every fact has
//! been shown, then start over.
//!
//! Each rotation runs two steps in order:
//! 1. **Check exhaustion**: if every catalog id is in the shown set, reset it
//! 2. **Select and record**: pick a random unshown fact and record it as shown
//!
//! Persistence problems never stop a fact from being shown. They are logged and
//! reported in [`Selection::recorded`].

use fact_catalog::{Fact, FactCatalog, FactId};
use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::presentation::Presenter;
use crate::tracker::{ShownFactTracker, StateStore, StoreError};

/// A fact picked by a rotation.
#[derive(Debug)]
pub struct Selection {
    pub fact: Fact,

    /// Whether this rotation started a new cycle.
    pub cycle_reset: bool,

    /// Whether the fact was durably recorded as shown. Carries the reset
    /// error when a new cycle could not be started.
    pub recorded: Result<(), StoreError>,
}

/// Result of one rotation.
#[derive(Debug)]
pub enum RotationOutcome {
    Selected(Selection),
    /// The catalog has no facts. A normal outcome, not a failure.
    NothingToShow,
}

impl RotationOutcome {
    pub fn fact(&self) -> Option<&Fact> {
        match self {
            RotationOutcome::Selected(selection) => Some(&selection.fact),
            RotationOutcome::NothingToShow => None,
        }
    }

    pub fn is_nothing_to_show(&self) -> bool {
        matches!(self, RotationOutcome::NothingToShow)
    }
}

/// Cycles through a catalog, tracking progress in a shown-fact tracker.
///
/// Not synchronized; callers serialize rotations.
pub struct FactRotator<S, R = ThreadRng> {
    catalog: FactCatalog,
    tracker: ShownFactTracker<S>,
    rng: R,
}

impl<S: StateStore> FactRotator<S, ThreadRng> {
    /// Create a rotator using the thread-local RNG.
    pub fn new(catalog: FactCatalog, tracker: ShownFactTracker<S>) -> Self {
        Self::with_rng(catalog, tracker, rand::thread_rng())
    }
}

impl<S: StateStore, R: Rng> FactRotator<S, R> {
    /// Create a rotator with a specific RNG.
    ///
    /// Shown ids the catalog no longer knows are pruned from the tracker. An
    /// empty catalog leaves the tracker alone.
    pub fn with_rng(catalog: FactCatalog, mut tracker: ShownFactTracker<S>, rng: R) -> Self {
        if !catalog.is_empty() {
            match tracker.retain_known(catalog.all_ids()) {
                Ok(0) => {}
                Ok(removed) => info!(removed, "dropped shown ids missing from the catalog"),
                Err(err) => warn!(error = %err, "could not prune shown-fact state"),
            }
        }

        Self {
            catalog,
            tracker,
            rng,
        }
    }

    pub fn catalog(&self) -> &FactCatalog {
        &self.catalog
    }

    pub fn tracker(&self) -> &ShownFactTracker<S> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ShownFactTracker<S> {
        &mut self.tracker
    }

    /// Pick the next fact and record it as shown.
    pub fn rotate(&mut self) -> RotationOutcome {
        if self.catalog.is_empty() {
            debug!("catalog is empty, nothing to show");
            return RotationOutcome::NothingToShow;
        }

        // Step 1: check exhaustion
        let all_ids = self.catalog.all_ids();
        let exhausted = self.tracker.has_shown_all(all_ids).unwrap_or_else(|err| {
            warn!(error = %err, "could not read shown facts");
            false
        });

        let mut cycle_reset = false;
        let mut reset_error = None;
        if exhausted {
            match self.tracker.reset() {
                Ok(()) => info!(total = all_ids.len(), "all facts shown, starting a new cycle"),
                Err(err) => {
                    warn!(error = %err, "could not reset shown facts");
                    reset_error = Some(err);
                }
            }
            cycle_reset = true;
        }

        // Step 2: select and record
        let shown: Vec<FactId> = if reset_error.is_some() {
            Vec::new()
        } else {
            self.tracker.shown().unwrap_or_else(|err| {
                warn!(error = %err, "could not read shown facts");
                Vec::new()
            })
        };

        let Some(fact) = self.catalog.random_fact_with_rng(&shown, &mut self.rng) else {
            return RotationOutcome::NothingToShow;
        };
        let fact = fact.clone();

        // The stored cycle is still the exhausted one, so recording would be
        // a silent no-op.
        let recorded = match reset_error {
            Some(err) => Err(err),
            None => self.tracker.add_shown(&fact.id),
        };
        if let Err(err) = &recorded {
            warn!(fact = %fact.id, error = %err, "could not record shown fact");
        }
        debug!(fact = %fact.id, cycle_reset, "selected fact");

        RotationOutcome::Selected(Selection {
            fact,
            cycle_reset,
            recorded,
        })
    }

    /// Rotate and hand the selected fact, if any, to `presenter`.
    pub fn rotate_and_present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> RotationOutcome {
        let outcome = self.rotate();
        if let Some(fact) = outcome.fact() {
            presenter.present(fact);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;
    use std::collections::HashSet;

    fn catalog(ids: &[&str]) -> FactCatalog {
        FactCatalog::from_facts(ids.iter().map(|id| Fact::new(*id, id.to_uppercase())))
    }

    fn rotator(ids: &[&str], seed: u64) -> FactRotator<MemoryStore, StdRng> {
        FactRotator::with_rng(
            catalog(ids),
            ShownFactTracker::new(MemoryStore::new()),
            StdRng::seed_from_u64(seed),
        )
    }

    fn selected(outcome: RotationOutcome) -> Selection {
        match outcome {
            RotationOutcome::Selected(selection) => selection,
            RotationOutcome::NothingToShow => panic!("expected a fact"),
        }
    }

    #[test]
    fn test_three_fact_cycle() {
        let mut rotator = rotator(&["a", "b", "c"], 1);
        let mut seen = HashSet::new();

        for _ in 0..3 {
            let selection = selected(rotator.rotate());
            assert!(!selection.cycle_reset);
            assert!(selection.recorded.is_ok());
            assert!(seen.insert(selection.fact.id));
        }
        assert_eq!(seen.len(), 3);
        assert!(rotator.tracker().has_shown_all(rotator.catalog().all_ids()).unwrap());

        let fourth = selected(rotator.rotate());
        assert!(fourth.cycle_reset);
        assert_eq!(rotator.tracker().shown().unwrap(), vec![fourth.fact.id]);
    }

    #[test]
    fn test_no_repeats_before_exhaustion_across_seeds() {
        for seed in 0..20 {
            let ids = ["a", "b", "c", "d", "e", "f"];
            let mut rotator = rotator(&ids, seed);
            let mut seen = HashSet::new();

            for _ in 0..ids.len() {
                let selection = selected(rotator.rotate());
                assert!(seen.insert(selection.fact.id), "repeat with seed {seed}");
            }
        }
    }

    #[test]
    fn test_empty_catalog_reports_nothing_and_leaves_state_alone() {
        let mut store = MemoryStore::new();
        store
            .set(crate::tracker::SHOWN_FACTS_KEY, serde_json::json!(["old"]))
            .unwrap();

        let mut rotator = FactRotator::with_rng(
            FactCatalog::new(),
            ShownFactTracker::new(store),
            StdRng::seed_from_u64(0),
        );

        assert!(rotator.rotate().is_nothing_to_show());
        assert_eq!(rotator.tracker().shown().unwrap(), vec![FactId::new("old")]);
    }

    #[test]
    fn test_stale_ids_are_pruned_on_construction() {
        let mut tracker = ShownFactTracker::new(MemoryStore::new());
        tracker.add_shown(&FactId::new("removed")).unwrap();
        tracker.add_shown(&FactId::new("a")).unwrap();

        let rotator = FactRotator::with_rng(catalog(&["a", "b"]), tracker, StdRng::seed_from_u64(0));
        assert_eq!(rotator.tracker().shown().unwrap(), vec![FactId::new("a")]);
    }

    #[test]
    fn test_resumes_from_persisted_progress() {
        let mut tracker = ShownFactTracker::new(MemoryStore::new());
        tracker.add_shown(&FactId::new("a")).unwrap();
        tracker.add_shown(&FactId::new("b")).unwrap();

        let mut rotator =
            FactRotator::with_rng(catalog(&["a", "b", "c"]), tracker, StdRng::seed_from_u64(9));
        assert_eq!(selected(rotator.rotate()).fact.id, FactId::new("c"));
    }

    /// Reads work, writes always fail.
    struct BrokenWrites(MemoryStore);

    impl StateStore for BrokenWrites {
        fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".into()))
        }
    }

    struct Recorder(Vec<FactId>);

    impl Presenter for Recorder {
        fn present(&mut self, fact: &Fact) {
            self.0.push(fact.id.clone());
        }
    }

    #[test]
    fn test_write_failure_still_presents_the_fact() {
        let mut rotator = FactRotator::with_rng(
            catalog(&["a"]),
            ShownFactTracker::new(BrokenWrites(MemoryStore::new())),
            StdRng::seed_from_u64(0),
        );
        let mut recorder = Recorder(Vec::new());

        let outcome = rotator.rotate_and_present(&mut recorder);

        let selection = selected(outcome);
        assert!(matches!(selection.recorded, Err(StoreError::Unavailable(_))));
        assert_eq!(recorder.0, vec![FactId::new("a")]);
    }

    #[test]
    fn test_failed_reset_still_selects_from_full_catalog() {
        let mut inner = MemoryStore::new();
        inner
            .set(crate::tracker::SHOWN_FACTS_KEY, serde_json::json!(["a", "b"]))
            .unwrap();

        let mut rotator = FactRotator::with_rng(
            catalog(&["a", "b"]),
            ShownFactTracker::new(BrokenWrites(inner)),
            StdRng::seed_from_u64(3),
        );

        let selection = selected(rotator.rotate());
        assert!(selection.cycle_reset);
        assert!(rotator.catalog().contains(&selection.fact.id));
        assert!(matches!(selection.recorded, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_nothing_presented_for_empty_catalog() {
        let mut rotator = FactRotator::with_rng(
            FactCatalog::new(),
            ShownFactTracker::new(MemoryStore::new()),
            StdRng::seed_from_u64(0),
        );
        let mut recorder = Recorder(Vec::new());

        assert!(rotator.rotate_and_present(&mut recorder).is_nothing_to_show());
        assert!(recorder.0.is_empty());
    }
}
