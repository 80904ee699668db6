//! Output collaborators for rendered bundles.
//!
//! The batch driver never touches the file system directly; it hands each rendered document to
//! a [`BundleSink`]. [`DirectorySink`] is the production implementation: one file per bundle in
//! a single flat directory.

use crate::{GeneratorError, GeneratorResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for rendered bundle documents.
pub trait BundleSink {
    /// Stores `contents` under `filename` and returns where it ended up.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] if the document could not be stored. Documents stored by
    /// earlier calls are left in place.
    fn write_bundle(&mut self, filename: &str, contents: &str) -> GeneratorResult<PathBuf>;
}

/// Writes each bundle to `<dir>/<filename>`, overwriting any existing file of the same name.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates the sink, creating `dir` (and any missing parents) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::OutputDirCreation`] if the directory cannot be created.
    pub fn create(dir: impl Into<PathBuf>) -> GeneratorResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| GeneratorError::OutputDirCreation {
            path: dir.clone(),
            source,
        })?;
        tracing::debug!(dir = %dir.display(), "output directory ready");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BundleSink for DirectorySink {
    fn write_bundle(&mut self, filename: &str, contents: &str) -> GeneratorResult<PathBuf> {
        let path = self.dir.join(filename);
        fs::write(&path, contents).map_err(|source| GeneratorError::FileWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_makes_missing_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("test-data").join("json-examples");

        let sink = DirectorySink::create(&nested).expect("create should succeed");

        assert!(nested.is_dir());
        assert_eq!(sink.dir(), nested.as_path());
    }

    #[test]
    fn create_accepts_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        assert!(DirectorySink::create(temp_dir.path()).is_ok());
        assert!(DirectorySink::create(temp_dir.path()).is_ok());
    }

    #[test]
    fn create_fails_when_path_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let err = DirectorySink::create(&file).expect_err("file in the way");
        assert!(matches!(err, GeneratorError::OutputDirCreation { .. }));
    }

    #[test]
    fn write_bundle_stores_utf8_contents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = DirectorySink::create(temp_dir.path()).unwrap();

        let path = sink
            .write_bundle("hemograma-01-normal-Jardim_Goiás.json", "{\"bairro\": \"Goiás\"}")
            .expect("write should succeed");

        assert_eq!(path, temp_dir.path().join("hemograma-01-normal-Jardim_Goiás.json"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"bairro\": \"Goiás\"}"
        );
    }

    #[test]
    fn write_bundle_reports_failing_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut sink = DirectorySink::create(temp_dir.path()).unwrap();
        fs::create_dir(temp_dir.path().join("taken.json")).unwrap();

        let err = sink.write_bundle("taken.json", "{}").expect_err("directory in the way");
        match err {
            GeneratorError::FileWrite { path, .. } => {
                assert_eq!(path, temp_dir.path().join("taken.json"))
            }
            other => panic!("expected FileWrite error, got {other:?}"),
        }
    }
}
