//! In-session collection of workouts, kept in creation order.

use crate::error::{Error, Result};
use crate::workout::Workout;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub const fn new() -> Self {
        Self {
            workouts: Vec::new(),
        }
    }

    /// Build a store from an ordered sequence, rejecting repeated ids.
    pub fn from_workouts(workouts: impl IntoIterator<Item = Workout>) -> Result<Self> {
        let mut store = Self::new();
        for w in workouts {
            store.add(w)?;
        }
        Ok(store)
    }

    /// Append a workout. Fails with [`Error::DuplicateId`] if the id is taken.
    pub fn add(&mut self, workout: Workout) -> Result<()> {
        if self.contains(workout.id()) {
            return Err(Error::DuplicateId(workout.id().to_string()));
        }
        self.workouts.push(workout);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Remove and return the workout with `id`.
    ///
    /// Absence is reported as [`Error::NotFound`] and leaves the store untouched.
    pub fn remove_by_id(&mut self, id: &str) -> Result<Workout> {
        let idx = self
            .position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(self.workouts.remove(idx))
    }

    /// Increment the click counter of `id`, returning the new count.
    pub fn click(&mut self, id: &str) -> Result<u32> {
        let w = self
            .workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        w.click();
        Ok(w.clicks())
    }

    /// Swap the workout with `id` for `replacement`, keeping its position.
    ///
    /// The replacement may only change the id if the new id is unused.
    pub fn replace(&mut self, id: &str, replacement: Workout) -> Result<Workout> {
        let idx = self
            .position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if replacement.id() != id && self.contains(replacement.id()) {
            return Err(Error::DuplicateId(replacement.id().to_string()));
        }
        Ok(std::mem::replace(&mut self.workouts[idx], replacement))
    }

    /// Read-only view in insertion order.
    pub fn all(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Coords;
    use chrono::Utc;

    fn run(id: &str) -> Workout {
        Workout::running(id.into(), Coords::new(1.0, 2.0), 5.0, 30.0, 180, Utc::now()).unwrap()
    }

    fn ride(id: &str) -> Workout {
        Workout::cycling(id.into(), Coords::new(1.0, 2.0), 20.0, 60.0, 120.0, Utc::now()).unwrap()
    }

    fn ids(store: &WorkoutStore) -> Vec<&str> {
        store.all().iter().map(Workout::id).collect()
    }

    #[test]
    fn add_then_find_returns_same_workout() {
        let mut store = WorkoutStore::new();
        let w = run("a");
        store.add(w.clone()).unwrap();
        assert_eq!(store.find_by_id("a"), Some(&w));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = WorkoutStore::new();
        for id in ["c", "a", "b"] {
            store.add(run(id)).unwrap();
        }
        assert_eq!(ids(&store), vec!["c", "a", "b"]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut store = WorkoutStore::new();
        store.add(run("a")).unwrap();
        let err = store.add(ride("a")).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "a"));
        assert_eq!(store.len(), 1);
        assert!(WorkoutStore::from_workouts([run("x"), run("x")]).is_err());
    }

    #[test]
    fn remove_then_find_is_not_found() {
        let mut store = WorkoutStore::from_workouts([run("a"), ride("b")]).unwrap();
        let removed = store.remove_by_id("a").unwrap();
        assert_eq!(removed.id(), "a");
        assert!(store.find_by_id("a").is_none());
        assert_eq!(ids(&store), vec!["b"]);
    }

    #[test]
    fn remove_missing_is_not_found_and_no_op() {
        let mut store = WorkoutStore::from_workouts([run("a")]).unwrap();
        let err = store.remove_by_id("zzz").unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id == "zzz"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn click_increments_in_place() {
        let mut store = WorkoutStore::from_workouts([run("a")]).unwrap();
        assert_eq!(store.click("a").unwrap(), 1);
        assert_eq!(store.click("a").unwrap(), 2);
        assert_eq!(store.find_by_id("a").unwrap().clicks(), 2);
        assert!(matches!(store.click("b"), Err(Error::NotFound(_))));
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = WorkoutStore::from_workouts([run("a"), run("b"), run("c")]).unwrap();
        let old = store.replace("b", ride("b")).unwrap();
        assert_eq!(old.kind(), crate::workout::WorkoutKind::Running);
        assert_eq!(ids(&store), vec!["a", "b", "c"]);
        assert!(store.find_by_id("b").unwrap().speed().is_some());

        assert!(matches!(
            store.replace("b", run("c")),
            Err(Error::DuplicateId(_))
        ));
        assert!(matches!(
            store.replace("nope", run("d")),
            Err(Error::NotFound(_))
        ));
    }
}
