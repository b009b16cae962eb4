//! Session: owns the workout store and keeps it in step with durable storage.
//!
//! Front ends construct one `Session` at startup and route every user action
//! through it.

use crate::error::{Error, Result};
use crate::factory::{self, WorkoutFactory, WorkoutInput};
use crate::id::IdGenerator;
use crate::persistence::{Persistence, SlotStore};
use crate::store::WorkoutStore;
use crate::workout::{Coords, Workout};

pub struct Session<S, G> {
    store: WorkoutStore,
    persistence: Persistence<S>,
    factory: WorkoutFactory<G>,
}

impl<S: SlotStore, G: IdGenerator> Session<S, G> {
    /// Restore workouts from `persistence`.
    ///
    /// Repeated ids in persisted data keep the first occurrence.
    pub fn open(persistence: Persistence<S>, ids: G) -> Self {
        let mut store = WorkoutStore::new();
        for w in persistence.load() {
            let id = w.id().to_string();
            if let Err(e) = store.add(w) {
                tracing::warn!(id = %id, err = %e, "dropping persisted workout");
            }
        }
        tracing::info!(slot = %persistence.key(), workouts = store.len(), "session opened");

        Self {
            store,
            persistence,
            factory: WorkoutFactory::new(ids),
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        self.store.all()
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.store.find_by_id(id)
    }

    pub const fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Validate input, create the workout at `coords` and persist.
    pub fn log_workout(&mut self, coords: Coords, input: &WorkoutInput) -> Result<&Workout> {
        let workout = self.factory.create(coords, input)?;
        let id = workout.id().to_string();
        let mut next = self.store.clone();
        next.add(workout)?;
        self.commit(next)?;
        tracing::info!(id = %id, kind = %input.kind, "logged workout");
        self.store
            .find_by_id(&id)
            .ok_or(Error::NotFound(id))
    }

    /// Register a selection of the workout, returning its click count.
    pub fn click(&mut self, id: &str) -> Result<u32> {
        let mut next = self.store.clone();
        let clicks = next.click(id)?;
        self.commit(next)?;
        Ok(clicks)
    }

    pub fn remove(&mut self, id: &str) -> Result<Workout> {
        let mut next = self.store.clone();
        let removed = next.remove_by_id(id)?;
        self.commit(next)?;
        tracing::info!(id = %id, "removed workout");
        Ok(removed)
    }

    /// Replace a workout's numbers (and possibly its kind) in place.
    ///
    /// The id, location, date and click count are kept. Invalid input leaves
    /// the existing workout untouched.
    pub fn edit(&mut self, id: &str, input: &WorkoutInput) -> Result<&Workout> {
        let current = self
            .store
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let clicks = current.clicks();
        let edited = factory::rebuild(id.to_string(), current.coords(), input, current.date())?
            .with_clicks(clicks);

        let mut next = self.store.clone();
        next.replace(id, edited)?;
        self.commit(next)?;
        tracing::info!(id = %id, kind = %input.kind, "edited workout");
        self.store
            .find_by_id(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Drop every workout and the persisted slot.
    pub fn reset(&mut self) -> Result<()> {
        self.persistence.clear()?;
        self.store.clear();
        Ok(())
    }

    /// Persist `next` and only then make it the live store, so a failed save
    /// leaves memory matching what is on disk.
    fn commit(&mut self, next: WorkoutStore) -> Result<()> {
        self.persistence.save(next.all())?;
        self.store = next;
        Ok(())
    }
}
