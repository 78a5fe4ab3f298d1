//! DXReport File Storage
//!
//! This crate stores the two kinds of blob DXReport handles: the original report a center
//! uploads, and the plain-language summary generated from it.
//!
//! ## Design Principles
//!
//! - Blobs are addressed by a relative path string that is stored in the submission record
//! - Files are written once and never overwritten (new content creates a new file)
//! - The store performs no deduplication, integrity checking, or garbage collection
//! - Callers depend on the [`BlobStore`] trait, so the filesystem can later be swapped for
//!   object storage
//!
//! ## Storage Layout
//!
//! Everything lives flat in a single upload directory, which the HTTP server also exposes
//! under the same public prefix:
//!
//! ```text
//! uploads/
//! ├── report-1700000000000-482913377.txt     # original upload
//! └── simplified_report_1700000000123.txt    # generated summary
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use dxreport_files::{BlobStore, UploadDirectory};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = UploadDirectory::open_or_create(Path::new("uploads"))?;
//! let blob = store.put_new("simplified_report_1700000000123.txt", b"Your report looks normal.")?;
//! assert_eq!(blob.relative_path, "uploads/simplified_report_1700000000123.txt");
//! # Ok(())
//! # }
//! ```

mod constants;
mod naming;
mod upload_dir;

pub use constants::{DEFAULT_EXTENSION, PUBLIC_PREFIX};
pub use naming::{original_report_name, simplified_report_name};
pub use upload_dir::UploadDirectory;

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Root directory does not exist, is not a directory, or cannot be created
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// Name or relative path failed validation (separators, traversal, wrong prefix)
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A blob with this name already exists (immutability violation)
    #[error("File {0} already exists in storage")]
    AlreadyExists(String),

    /// No blob exists at the requested path
    #[error("File not found: {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = std::result::Result<T, FilesError>;

/// Location and size of a blob that has just been written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredBlob {
    /// Path relative to the server root, e.g. `uploads/report-...txt`
    pub relative_path: String,

    /// Size of the written content in bytes
    pub size_bytes: u64,
}

/// Path-based blob storage used for original and simplified reports.
///
/// Implementations must be safe to share across request handlers.
pub trait BlobStore: Send + Sync {
    /// Writes `bytes` under `file_name`, failing with [`FilesError::AlreadyExists`] instead of
    /// replacing an existing blob.
    fn put_new(&self, file_name: &str, bytes: &[u8]) -> FilesResult<StoredBlob>;

    /// Reads the full content of the blob at `relative_path`.
    fn read(&self, relative_path: &str) -> FilesResult<Vec<u8>>;
}
