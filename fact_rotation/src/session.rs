//! Session - one interactive run: triggers in, facts out.

use rand::rngs::ThreadRng;
use rand::Rng;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use crate::config::RotationConfig;
use crate::presentation::Presenter;
use crate::rotation::{FactRotator, RotationOutcome};
use crate::tracker::{JsonFileStore, ShownFactTracker, StateStore};
use crate::trigger::{Trigger, TriggerGate};

/// Routes triggers through the gate to the rotator and presenter.
pub struct FactSession<S, P, R = ThreadRng> {
    gate: TriggerGate,
    rotator: FactRotator<S, R>,
    presenter: P,
}

impl<P: Presenter> FactSession<JsonFileStore, P> {
    /// Build a session from config: its catalog, state file and gate.
    pub fn from_config(config: &RotationConfig, presenter: P) -> Self {
        let catalog = config.load_catalog();
        let store = JsonFileStore::open(config.state_path());
        debug!(state = %store.path().display(), "opened state store");

        let rotator = FactRotator::new(catalog, ShownFactTracker::new(store));
        Self::new(config.trigger_gate(), rotator, presenter)
    }
}

impl<S: StateStore, P: Presenter, R: Rng> FactSession<S, P, R> {
    pub fn new(gate: TriggerGate, rotator: FactRotator<S, R>, presenter: P) -> Self {
        Self {
            gate,
            rotator,
            presenter,
        }
    }

    /// Handle a trigger arriving at `now`.
    ///
    /// Returns `None` when the gate filtered the trigger out.
    pub fn handle(&mut self, trigger: &Trigger, now: Instant) -> Option<RotationOutcome> {
        if !self.gate.admit(trigger, now) {
            return None;
        }
        Some(self.rotator.rotate_and_present(&mut self.presenter))
    }

    /// Send one `FileOpened` trigger per path, all arriving at `now`.
    ///
    /// Returns the outcome of the first admitted open, if any.
    pub fn open_files<I>(&mut self, paths: I, now: Instant) -> Option<RotationOutcome>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut first = None;
        for path in paths {
            let outcome = self.handle(&Trigger::FileOpened { path }, now);
            first = first.or(outcome);
        }
        first
    }

    pub fn rotator(&self) -> &FactRotator<S, R> {
        &self.rotator
    }

    pub fn rotator_mut(&mut self) -> &mut FactRotator<S, R> {
        &mut self.rotator
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}
