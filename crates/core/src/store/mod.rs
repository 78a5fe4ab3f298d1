//! Submission record storage.
//!
//! The [`SubmissionStore`] trait exposes exactly the two operations the service needs:
//! insert a record, and list the records of one center in insertion order. There is no update
//! or delete.
//!
//! - [`SqliteSubmissionStore`] persists records in a SQLite database
//! - [`InMemorySubmissionStore`] keeps records in a vector, for tests and local experiments

mod memory;
mod sqlite;

pub use memory::InMemorySubmissionStore;
pub use sqlite::SqliteSubmissionStore;

use crate::error::StoreResult;
use crate::submission::{NewSubmission, Submission};

/// Persistent collection of submission records.
pub trait SubmissionStore: Send + Sync {
    /// Inserts a record and returns it with its generated identifier.
    fn insert(&self, submission: NewSubmission) -> StoreResult<Submission>;

    /// Returns the records whose `center_id` equals `center_id` exactly, in insertion order.
    ///
    /// `None` applies no filter and returns every record.
    fn find_by_center(&self, center_id: Option<&str>) -> StoreResult<Vec<Submission>>;
}
