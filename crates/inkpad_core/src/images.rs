//! App-owned image file store.
//!
//! # Responsibility
//! - Copy externally-referenced images into the app-private directory.
//! - Delete owned image files when their referencing note drops them.
//!
//! # Invariants
//! - The store owns exactly the files located under its root directory.
//! - `remove` never touches a file outside the root.
//! - An unreadable import source fails the whole operation; a silently-empty
//!   copy is never produced.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub type ImageStoreResult<T> = Result<T, ImageStoreError>;

/// Filesystem error raised by image store operations.
#[derive(Debug)]
pub enum ImageStoreError {
    /// The store root could not be created.
    RootUnavailable { root: PathBuf, source: io::Error },
    /// Copying an external source into the store failed.
    ImportFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// Deleting an owned file failed.
    RemoveFailed { path: PathBuf, source: io::Error },
}

impl Display for ImageStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootUnavailable { root, source } => {
                write!(
                    f,
                    "image store root `{}` is unavailable: {source}",
                    root.display()
                )
            }
            Self::ImportFailed { from, to, source } => write!(
                f,
                "failed to import image `{}` as `{}`: {source}",
                from.display(),
                to.display()
            ),
            Self::RemoveFailed { path, source } => {
                write!(f, "failed to remove image `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ImageStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RootUnavailable { source, .. }
            | Self::ImportFailed { source, .. }
            | Self::RemoveFailed { source, .. } => Some(source),
        }
    }
}

/// Store for note images under one app-private root directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> ImageStoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| ImageStoreError::RootUnavailable {
            root: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Returns the app-private root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copies an external image into the store under a unique name and
    /// returns the new internal path.
    ///
    /// # Errors
    /// Fails when the source cannot be read or the copy cannot be written.
    pub fn import(&self, source: impl AsRef<Path>) -> ImageStoreResult<PathBuf> {
        let source = source.as_ref();
        let target = self.root.join(format!("IMG_{}.jpg", Uuid::new_v4()));

        fs::copy(source, &target).map_err(|err| ImageStoreError::ImportFailed {
            from: source.to_path_buf(),
            to: target.clone(),
            source: err,
        })?;

        Ok(target)
    }

    /// Removes the file when it exists and the store owns it.
    ///
    /// Externally-referenced paths are left untouched.
    pub fn remove(&self, path: impl AsRef<Path>) -> ImageStoreResult<()> {
        let path = path.as_ref();
        if self.is_internal(path) && path.exists() {
            fs::remove_file(path).map_err(|source| ImageStoreError::RemoveFailed {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Prefix test against the store root.
    pub fn is_internal(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().starts_with(&self.root)
    }
}
