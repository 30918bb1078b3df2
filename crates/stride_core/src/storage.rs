pub mod file_store;
pub mod key_value_store;
pub mod memory_store;
pub mod workout_persistence;
