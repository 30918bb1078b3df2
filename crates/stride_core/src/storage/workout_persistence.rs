use tracing::warn;

use crate::workout::Workout;

use super::key_value_store::{KeyValueStore, PersistenceError};

pub const WORKOUTS_KEY: &str = "workouts";

/// Reads and writes the whole workout list as one JSON blob.
pub struct WorkoutPersistence<S> {
    storage: S,
}

impl<S> WorkoutPersistence<S>
where
    S: KeyValueStore,
{
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Missing, unreadable or malformed data all load as "no workouts".
    pub fn load(&self) -> Vec<Workout> {
        let raw = match self.storage.get(WORKOUTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Could not read stored workouts: {}", err);
                return Vec::new();
            }
        };

        // `null` counts as an empty list
        match serde_json::from_str::<Option<Vec<Workout>>>(&raw) {
            Ok(workouts) => workouts.unwrap_or_default(),
            Err(err) => {
                warn!("Ignoring malformed stored workouts: {}", err);
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(workouts)?;
        self.storage.set(WORKOUTS_KEY, &json)
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.storage.remove(WORKOUTS_KEY)
    }
}
