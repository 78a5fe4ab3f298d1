use super::SubmissionStore;
use crate::error::{StoreError, StoreResult};
use crate::submission::{new_submission_id, NewSubmission, Submission};
use std::sync::Mutex;

/// Vector-backed store. Insertion order is the vector order.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    records: Mutex<Vec<Submission>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubmissionStore for InMemorySubmissionStore {
    fn insert(&self, submission: NewSubmission) -> StoreResult<Submission> {
        let stored = submission.into_submission(new_submission_id());
        self.records
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(stored.clone());
        Ok(stored)
    }

    fn find_by_center(&self, center_id: Option<&str>) -> StoreResult<Vec<Submission>> {
        let records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records
            .iter()
            .filter(|s| center_id.map_or(true, |c| s.center_id == c))
            .cloned()
            .collect())
    }
}
