//! # Local Directory Backend

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::backend::BlobStore;
use super::errors::{BlobError, BlobResult};

/// Blob store over a single local directory.
///
/// Blob names are plain file names; separators and parent references are
/// rejected so every blob stays directly under the root.
#[derive(Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Open a store rooted at `root`, creating the directory if absent.
    pub fn open(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| BlobError::Io(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, name: &str) -> BlobResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl BlobStore for LocalBlobStore {
    fn write(&self, name: &str, data: &[u8]) -> BlobResult<()> {
        let full_path = self.full_path(name)?;
        fs::write(&full_path, data).map_err(|e| BlobError::Io(e.to_string()))
    }

    fn create(&self, name: &str, data: &[u8]) -> BlobResult<bool> {
        let full_path = self.full_path(name)?;
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(BlobError::Io(e.to_string())),
        };
        file.write_all(data)
            .map_err(|e| BlobError::Io(e.to_string()))?;
        Ok(true)
    }

    fn read(&self, name: &str) -> BlobResult<Vec<u8>> {
        let full_path = self.full_path(name)?;
        fs::read(&full_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BlobError::NotFound(name.to_string())
            } else {
                BlobError::Io(e.to_string())
            }
        })
    }

    fn exists(&self, name: &str) -> BlobResult<bool> {
        Ok(self.full_path(name)?.is_file())
    }

    fn list(&self, prefix: &str) -> BlobResult<Vec<String>> {
        let mut results = Vec::new();

        for entry in fs::read_dir(&self.root).map_err(|e| BlobError::Io(e.to_string()))? {
            let entry = entry.map_err(|e| BlobError::Io(e.to_string()))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) {
                    results.push(name.to_string());
                }
            }
        }

        Ok(results)
    }

    fn locate(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("backups");
        let store = LocalBlobStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::open(temp.path()).unwrap();

        store.write("test.avro", b"hello").unwrap();
        assert_eq!(store.read("test.avro").unwrap(), b"hello");
        assert!(store.exists("test.avro").unwrap());
    }

    #[test]
    fn test_write_replaces() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::open(temp.path()).unwrap();

        store.write("a", b"one").unwrap();
        store.write("a", b"two").unwrap();
        assert_eq!(store.read("a").unwrap(), b"two");
    }

    #[test]
    fn test_create_keeps_existing() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::open(temp.path()).unwrap();

        assert!(store.create("a", b"one").unwrap());
        assert!(!store.create("a", b"two").unwrap());
        assert_eq!(store.read("a").unwrap(), b"one");
        assert!(matches!(
            store.create("../a", b"x"),
            Err(BlobError::InvalidName(_))
        ));
    }

    #[test]
    fn test_list_by_prefix() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::open(temp.path()).unwrap();

        store.write("jobs_1.avro", b"").unwrap();
        store.write("jobs_2.avro", b"").unwrap();
        store.write("departments_1.avro", b"").unwrap();
        fs::create_dir(temp.path().join("jobs_dir")).unwrap();

        let mut names = store.list("jobs_").unwrap();
        names.sort();
        assert_eq!(names, vec!["jobs_1.avro", "jobs_2.avro"]);
    }

    #[test]
    fn test_rejects_path_names() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::open(temp.path()).unwrap();

        assert!(matches!(
            store.write("../escape", b"x"),
            Err(BlobError::InvalidName(_))
        ));
        assert!(matches!(store.read("a/b"), Err(BlobError::InvalidName(_))));
    }

    #[test]
    fn test_not_found() {
        let temp = TempDir::new().unwrap();
        let store = LocalBlobStore::open(temp.path()).unwrap();

        let result = store.read("nonexistent.avro");
        assert!(matches!(result, Err(BlobError::NotFound(_))));
    }
}
