use std::{
    fs::File,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use super::key_value_store::{KeyValueStore, PersistenceError};

/// Stores every key as `<folder>/<key>.json`.
pub struct FileStore {
    folder: PathBuf,
}

impl FileStore {
    pub fn open(folder: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let folder = folder.as_ref();
        std::fs::create_dir_all(folder)?;

        if !folder.is_dir() {
            return Err(PersistenceError::Unavailable(format!(
                "Path {} is not a directory",
                folder.display()
            )));
        }

        Ok(Self {
            folder: folder.to_path_buf(),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.folder.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");

        let file = File::create(&staging)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        writer.write_all(value.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        // The rename keeps the previous value intact if the write above fails
        std::fs::rename(&staging, &path)?;
        debug!("FileStore: wrote {} bytes to {}", value.len(), path.display());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
