use stride_core::storage::{file_store::FileStore, workout_persistence::WorkoutPersistence};
use tracing::info;

use crate::config::Config;

pub fn run(config: &Config) -> anyhow::Result<()> {
    let storage = FileStore::open(&config.data_dir)?;
    WorkoutPersistence::new(storage).clear()?;

    info!("Cleared stored workouts in {}", config.data_dir.display());

    Ok(())
}
