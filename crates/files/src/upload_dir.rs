//! Filesystem implementation of [`BlobStore`].
//!
//! [`UploadDirectory`] keeps every blob as a flat file directly inside one directory. Blob
//! names are validated to be a single path component, so no operation can reach outside the
//! directory.
//!
//! # Implementation Notes
//!
//! - Writes use `create_new`, so an existing file is never replaced
//! - The root is canonicalised once at construction
//! - Relative paths handed out are `<PUBLIC_PREFIX>/<name>`; `read` accepts
//!   exactly that form

use crate::constants::PUBLIC_PREFIX;
use crate::{BlobStore, FilesError, FilesResult, StoredBlob};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Flat upload directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct UploadDirectory {
    /// Canonicalised directory holding all blobs
    root_directory: PathBuf,
}

impl UploadDirectory {
    /// Opens an existing upload directory.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidRootDirectory` if the path does not exist, is not a
    /// directory, or cannot be canonicalised.
    pub fn new(root_directory: &Path) -> FilesResult<Self> {
        if !root_directory.exists() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Directory does not exist: {}",
                root_directory.display()
            )));
        }

        if !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        let root_directory = root_directory.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self { root_directory })
    }

    /// Opens the upload directory, creating it (and any parents) first when missing.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidRootDirectory` if the directory cannot be created or the
    /// path exists as something other than a directory.
    pub fn open_or_create(root_directory: &Path) -> FilesResult<Self> {
        if !root_directory.exists() {
            fs::create_dir_all(root_directory).map_err(|e| {
                FilesError::InvalidRootDirectory(format!(
                    "Cannot create directory {}: {}",
                    root_directory.display(),
                    e
                ))
            })?;
            tracing::info!("created upload directory {}", root_directory.display());
        }

        Self::new(root_directory)
    }

    /// Returns the canonicalised directory holding all blobs.
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    fn path_for_name(&self, file_name: &str) -> FilesResult<PathBuf> {
        validate_file_name(file_name)?;
        Ok(self.root_directory.join(file_name))
    }

    fn path_for_relative(&self, relative_path: &str) -> FilesResult<PathBuf> {
        let file_name = relative_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                FilesError::InvalidPath(format!(
                    "{} is not under {}/",
                    relative_path, PUBLIC_PREFIX
                ))
            })?;
        self.path_for_name(file_name)
    }
}

impl BlobStore for UploadDirectory {
    fn put_new(&self, file_name: &str, bytes: &[u8]) -> FilesResult<StoredBlob> {
        let path = self.path_for_name(file_name)?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(FilesError::AlreadyExists(file_name.to_string()));
            }
            Err(e) => {
                return Err(FilesError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create file {}: {}", path.display(), e),
                )));
            }
        };

        file.write_all(bytes).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write file {}: {}", path.display(), e),
            ))
        })?;
        file.sync_all()?;

        Ok(StoredBlob {
            relative_path: format!("{}/{}", PUBLIC_PREFIX, file_name),
            size_bytes: bytes.len() as u64,
        })
    }

    fn read(&self, relative_path: &str) -> FilesResult<Vec<u8>> {
        let path = self.path_for_relative(relative_path)?;

        if !path.is_file() {
            return Err(FilesError::NotFound(relative_path.to_string()));
        }

        fs::read(&path).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read file from {}: {}", path.display(), e),
            ))
        })
    }
}

/// Accepts only a single normal path component.
fn validate_file_name(file_name: &str) -> FilesResult<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !file_name.contains(['/', '\\']) => Ok(()),
        _ => Err(FilesError::InvalidPath(format!(
            "{:?} is not a plain file name",
            file_name
        ))),
    }
}
