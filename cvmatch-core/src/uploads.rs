//! Staging area for uploaded CVs.
//!
//! CVs are copied into one flat directory under sanitized names before a
//! batch is ingested. Sanitizing first means two source files can collide on
//! the same staged name; [`UploadStore::stage`] reports that instead of
//! silently overwriting.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{MatchError, Result};

/// Reduce a file name to characters safe for a flat staging directory.
///
/// Keeps alphanumerics plus space, `.`, `_` and `-`, drops everything else,
/// then turns spaces into underscores.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Outcome of staging one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    /// Where the staged copy lives.
    pub path: PathBuf,
    /// `true` when a file with the same sanitized name was already staged
    /// and nothing was written.
    pub already_present: bool,
}

/// A flat directory of staged CVs addressed by sanitized file name.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The staging directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `file_name` would be staged.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(sanitize_file_name(file_name))
    }

    /// `true` when a file with this sanitized name is already staged.
    pub fn contains(&self, file_name: &str) -> bool {
        self.path_for(file_name).exists()
    }

    /// Write `bytes` under the sanitized name, overwriting any previous copy.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| MatchError::Storage {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(file_name);
        fs::write(&path, bytes)
            .map_err(|source| MatchError::Storage { path: path.clone(), source })?;
        debug!(path = %path.display(), bytes = bytes.len(), "staged CV");
        Ok(path)
    }

    /// Stage `bytes` unless a file with the same sanitized name is already
    /// present, in which case nothing is written.
    pub fn stage(&self, file_name: &str, bytes: &[u8]) -> Result<StagedUpload> {
        let path = self.path_for(file_name);
        if path.exists() {
            return Ok(StagedUpload { path, already_present: true });
        }
        let path = self.save(file_name, bytes)?;
        Ok(StagedUpload { path, already_present: false })
    }

    /// Paths of every staged file, sorted by name for deterministic batch
    /// order. A missing staging directory reads as empty.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(MatchError::Storage { path: self.dir.clone(), source });
            }
        };
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|source| MatchError::Storage { path: self.dir.clone(), source })?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Remove one staged file. Returns `false` if it was not there.
    pub fn remove(&self, file_name: &str) -> Result<bool> {
        let path = self.path_for(file_name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(MatchError::Storage { path, source }),
        }
    }

    /// Remove every staged file, returning how many were deleted. Files that
    /// fail to delete are logged and skipped so one stuck file cannot wedge
    /// the whole reset.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for path in self.list()? {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "could not remove staged CV"),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, UploadStore) {
        let dir = TempDir::new().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));
        (dir, store)
    }

    #[test]
    fn sanitizing_keeps_safe_characters_and_replaces_spaces() {
        assert_eq!(sanitize_file_name("My Resume (v2).pdf"), "My_Resume_v2.pdf");
        assert_eq!(sanitize_file_name("john_doe-cv.pdf"), "john_doe-cv.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "....etcpasswd");
    }

    #[test]
    fn saving_creates_the_directory_and_writes_bytes() {
        let (_guard, store) = store();
        let path = store.save("John Doe.pdf", b"pdf bytes").unwrap();
        assert_eq!(path.file_name().unwrap(), "John_Doe.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"pdf bytes");
        assert!(store.contains("John Doe.pdf"));
    }

    #[test]
    fn staging_skips_names_that_collide_after_sanitizing() {
        let (_guard, store) = store();
        let first = store.stage("Jane Doe.pdf", b"one").unwrap();
        assert!(!first.already_present);

        // Different raw name, same sanitized target.
        let second = store.stage("Jane_Doe.pdf", b"two").unwrap();
        assert!(second.already_present);
        assert_eq!(fs::read(&second.path).unwrap(), b"one");
    }

    #[test]
    fn listing_is_sorted_and_tolerates_a_missing_directory() {
        let (_guard, store) = store();
        assert!(store.list().unwrap().is_empty());

        store.save("b.pdf", b"b").unwrap();
        store.save("a.pdf", b"a").unwrap();
        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn remove_reports_whether_anything_was_deleted() {
        let (_guard, store) = store();
        store.save("a.pdf", b"a").unwrap();
        assert!(store.remove("a.pdf").unwrap());
        assert!(!store.remove("a.pdf").unwrap());
    }

    #[test]
    fn clear_removes_everything_and_counts() {
        let (_guard, store) = store();
        store.save("a.pdf", b"a").unwrap();
        store.save("b.pdf", b"b").unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.list().unwrap().is_empty());
    }
}
