use tracing::{debug, info};

use crate::{
    storage::{
        key_value_store::{KeyValueStore, PersistenceError},
        workout_persistence::WorkoutPersistence,
    },
    workout::{Workout, WorkoutId},
};

/// Workouts in creation order. Every append rewrites the persisted list, so
/// the stored copy never lags behind the in-memory one.
pub struct WorkoutStore<S> {
    workouts: Vec<Workout>,
    persistence: WorkoutPersistence<S>,
}

impl<S> WorkoutStore<S>
where
    S: KeyValueStore,
{
    pub fn load_initial(storage: S) -> Self {
        let persistence = WorkoutPersistence::new(storage);
        let workouts = persistence.load();
        info!("Loaded {} stored workouts", workouts.len());

        Self {
            workouts,
            persistence,
        }
    }

    /// On a failed write the workout is dropped again and the error returned.
    pub fn append(&mut self, workout: Workout) -> Result<(), PersistenceError> {
        self.workouts.push(workout);

        if let Err(err) = self.persistence.save(&self.workouts) {
            self.workouts.pop();
            return Err(err);
        }

        debug!("Persisted {} workouts", self.workouts.len());
        Ok(())
    }

    pub fn find_by_id(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|workout| &workout.id == id)
    }

    /// Index in creation order.
    pub fn position(&self, id: &WorkoutId) -> Option<usize> {
        self.workouts.iter().position(|workout| &workout.id == id)
    }

    pub fn contains(&self, id: &WorkoutId) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Wipes the persisted list along with the in-memory one.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.persistence.clear()?;
        self.workouts.clear();
        Ok(())
    }
}
