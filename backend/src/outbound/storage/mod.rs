//! Filesystem storage for uploaded cover images.
//!
//! Covers live flat inside one directory opened through `cap_std`, so a
//! filename can never reach outside it.

use std::io;
use std::path::{Component, Path};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{CoverImageStore, CoverStoreError};

/// Cover store rooted at a capability-scoped directory.
#[derive(Clone)]
pub struct CapStdCoverImageStore {
    dir: Arc<Dir>,
}

impl CapStdCoverImageStore {
    /// Open `path`, creating it first when absent.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, CoverStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| CoverStoreError::io(err.to_string()))?
            .map_err(|err| {
                debug!(error = %err, "cover storage operation failed");
                CoverStoreError::io(err.to_string())
            })
    }
}

/// Accept only a single plain path component.
fn checked_name(filename: &str) -> Result<String, CoverStoreError> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !filename.contains('\\') => {
            Ok(filename.to_owned())
        }
        _ => Err(CoverStoreError::invalid_name(filename)),
    }
}

#[async_trait]
impl CoverImageStore for CapStdCoverImageStore {
    async fn exists(&self, filename: &str) -> Result<bool, CoverStoreError> {
        let Ok(name) = checked_name(filename) else {
            return Ok(false);
        };
        self.blocking(move |dir| match dir.metadata(&name) {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        })
        .await
    }

    async fn save(&self, filename: &str, bytes: Vec<u8>) -> Result<(), CoverStoreError> {
        let name = checked_name(filename)?;
        self.blocking(move |dir| dir.write(&name, &bytes)).await
    }
}

#[cfg(test)]
mod tests {
    //! Cover storage against a scratch directory.
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn scratch() -> TempDir {
        tempfile::tempdir().expect("scratch dir")
    }

    fn read_back(scratch: &TempDir, name: &str) -> Vec<u8> {
        Dir::open_ambient_dir(scratch.path(), ambient_authority())
            .and_then(|dir| dir.read(name))
            .expect("read back")
    }

    #[rstest]
    #[tokio::test]
    async fn saved_covers_exist(scratch: TempDir) {
        let store = CapStdCoverImageStore::open(scratch.path()).expect("open store");
        assert!(!store.exists("AB12CD_dune.png").await.expect("exists"));

        store
            .save("AB12CD_dune.png", b"PNG".to_vec())
            .await
            .expect("save");

        assert!(store.exists("AB12CD_dune.png").await.expect("exists"));
        assert_eq!(read_back(&scratch, "AB12CD_dune.png"), b"PNG");
    }

    #[rstest]
    #[tokio::test]
    async fn saving_twice_keeps_last_write(scratch: TempDir) {
        let store = CapStdCoverImageStore::open(scratch.path()).expect("open store");
        store.save("c.png", b"one".to_vec()).await.expect("first");
        store.save("c.png", b"two".to_vec()).await.expect("second");
        assert_eq!(read_back(&scratch, "c.png"), b"two");
    }

    #[rstest]
    #[tokio::test]
    async fn open_creates_missing_directory(scratch: TempDir) {
        let nested = scratch.path().join("static").join("covers");
        CapStdCoverImageStore::open(&nested).expect("open store");
        assert!(nested.is_dir());
    }

    #[rstest]
    #[case("../escape.png")]
    #[case("nested/cover.png")]
    #[case("..")]
    #[case("")]
    #[case("back\\slash.png")]
    #[tokio::test]
    async fn path_like_names_are_rejected(scratch: TempDir, #[case] name: &str) {
        let store = CapStdCoverImageStore::open(scratch.path()).expect("open store");
        let err = store
            .save(name, b"x".to_vec())
            .await
            .expect_err("name rejected");
        assert!(matches!(err, CoverStoreError::InvalidName { .. }));
        assert!(!store.exists(name).await.expect("exists"));
    }
}
