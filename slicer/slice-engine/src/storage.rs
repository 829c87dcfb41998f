//! Storage collaborators for run artifacts.
//!
//! A slicing run produces one PNG per layer plus the final print script.
//! The engine talks to storage through [`SliceStorage`] so runs can
//! target a directory on disk or stay in memory for tests.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Sink for the artifacts of one slicing run.
pub trait SliceStorage: Send + Sync {
    /// Clear any previous run and recreate an empty root. Idempotent.
    ///
    /// # Errors
    ///
    /// Propagates the underlying storage failure.
    fn prepare(&self) -> io::Result<()>;

    /// Write one layer image under `name`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying storage failure.
    fn write_image(&self, name: &str, bytes: &[u8]) -> io::Result<()>;

    /// Write a text artifact (the print script) under `name`.
    ///
    /// # Errors
    ///
    /// Propagates the underlying storage failure.
    fn write_text(&self, name: &str, text: &str) -> io::Result<()>;

    /// Where the artifacts end up, for reporting.
    fn root(&self) -> PathBuf;
}

/// Filesystem storage rooted at one output directory.
///
/// [`SliceStorage::prepare`] removes the whole root and recreates it, so
/// every run starts from an empty directory.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Storage rooted at `root`. Nothing is touched until
    /// [`SliceStorage::prepare`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SliceStorage for DirectoryStorage {
    fn prepare(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        fs::create_dir_all(&self.root)?;
        debug!(root = %self.root.display(), "storage prepared");
        Ok(())
    }

    fn write_image(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.path_for(name), bytes)
    }

    fn write_text(&self, name: &str, text: &str) -> io::Result<()> {
        fs::write(self.path_for(name), text)
    }

    fn root(&self) -> PathBuf {
        self.root.clone()
    }
}

/// In-memory storage for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The bytes stored under `name`, if any.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.files().get(name).cloned()
    }

    /// The stored text under `name`, if any and valid UTF-8.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.file(name)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// All stored names in sorted order.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.files().keys().cloned().collect()
    }

    /// How many stored artifacts are layer images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.files()
            .keys()
            .filter(|name| Path::new(name).extension().is_some_and(|ext| ext == "png"))
            .count()
    }
}

impl SliceStorage for MemoryStorage {
    fn prepare(&self) -> io::Result<()> {
        self.files().clear();
        Ok(())
    }

    fn write_image(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files().insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn write_text(&self, name: &str, text: &str) -> io::Result<()> {
        self.files().insert(name.to_string(), text.as_bytes().to_vec());
        Ok(())
    }

    fn root(&self) -> PathBuf {
        PathBuf::from("memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_prepare_clears_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path().join("out"));

        storage.prepare().unwrap();
        storage.write_image("1.png", b"left over").unwrap();
        assert!(storage.root().join("1.png").exists());

        storage.prepare().unwrap();
        assert!(!storage.root().join("1.png").exists());
        assert!(storage.root().exists());
    }

    #[test]
    fn directory_prepare_is_idempotent_on_a_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path().join("fresh"));
        storage.prepare().unwrap();
        storage.prepare().unwrap();
        assert!(storage.root().exists());
    }

    #[test]
    fn directory_prepare_fails_when_the_root_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, b"not a directory").unwrap();

        let storage = DirectoryStorage::new(&blocked);
        assert!(storage.prepare().is_err());
    }

    #[test]
    fn directory_round_trips_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path().join("run"));
        storage.prepare().unwrap();

        storage.write_image("7.png", &[1, 2, 3]).unwrap();
        storage.write_text("run.gcode", ";fileName:x").unwrap();

        assert_eq!(fs::read(storage.root().join("7.png")).unwrap(), [1, 2, 3]);
        assert_eq!(
            fs::read_to_string(storage.root().join("run.gcode")).unwrap(),
            ";fileName:x"
        );
    }

    #[test]
    fn memory_storage_tracks_images_and_text() {
        let storage = MemoryStorage::new();
        storage.prepare().unwrap();
        storage.write_image("1.png", &[9]).unwrap();
        storage.write_image("2.png", &[9, 9]).unwrap();
        storage.write_text("run.gcode", "script").unwrap();

        assert_eq!(storage.image_count(), 2);
        assert_eq!(storage.text("run.gcode").as_deref(), Some("script"));
        assert_eq!(storage.file_names(), ["1.png", "2.png", "run.gcode"]);

        storage.prepare().unwrap();
        assert_eq!(storage.image_count(), 0);
        assert!(storage.file_names().is_empty());
    }
}
