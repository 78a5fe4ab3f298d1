//! SQLite-backed submission store.
//!
//! Records live in a single `submissions` table. The `seq` rowid column preserves insertion
//! order; `id` is the generated identifier handed to clients. The connection is serialised
//! behind a mutex, so the store can be shared by concurrent request handlers.

use super::SubmissionStore;
use crate::error::{StoreError, StoreResult};
use crate::submission::{new_submission_id, NewSubmission, Submission};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// Schema migrations, applied in order. `PRAGMA user_version` records the last one run.
const MIGRATIONS: &[(i64, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS submissions (
        seq                   INTEGER PRIMARY KEY AUTOINCREMENT,
        id                    TEXT NOT NULL UNIQUE,
        center_id             TEXT NOT NULL,
        patient_name          TEXT NOT NULL,
        phone_number          TEXT NOT NULL,
        email                 TEXT,
        original_report_url   TEXT NOT NULL,
        simplified_report_url TEXT,
        created_at            TEXT NOT NULL
    );",
)];

const SELECT_COLUMNS: &str = "id, center_id, patient_name, phone_number, email, \
     original_report_url, simplified_report_url, created_at";

/// Submission store persisted in SQLite.
#[derive(Debug)]
pub struct SqliteSubmissionStore {
    conn: Mutex<Connection>,
}

impl SqliteSubmissionStore {
    /// Opens the store named by a connection string.
    ///
    /// Accepted forms:
    /// - `sqlite://<path>` or `sqlite:<path>`
    /// - `:memory:` or `sqlite::memory:` for a private in-memory database
    /// - a bare filesystem path
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnsupportedUrl` for any other URL scheme, or a SQLite/migration
    /// error if the database cannot be opened.
    pub fn open(database_url: &str) -> StoreResult<Self> {
        let target = database_url.trim();
        let target = target
            .strip_prefix("sqlite://")
            .or_else(|| target.strip_prefix("sqlite:"))
            .unwrap_or(target);

        if target.is_empty() || (target.contains("://") && !target.starts_with('/')) {
            return Err(StoreError::UnsupportedUrl(database_url.to_string()));
        }

        if target == ":memory:" {
            Self::open_in_memory()
        } else {
            Self::open_path(Path::new(target))
        }
    }

    /// Opens (or creates) a database file and runs migrations.
    pub fn open_path(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        tracing::info!("opened submission store at {}", path.display());
        Self::from_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl SubmissionStore for SqliteSubmissionStore {
    fn insert(&self, submission: NewSubmission) -> StoreResult<Submission> {
        let stored = submission.into_submission(new_submission_id());
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO submissions (id, center_id, patient_name, phone_number, email,
                 original_report_url, simplified_report_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                stored.id,
                stored.center_id,
                stored.patient_name,
                stored.phone_number,
                stored.email,
                stored.original_report_url,
                stored.simplified_report_url,
                stored.created_at.to_rfc3339(),
            ],
        )?;

        Ok(stored)
    }

    fn find_by_center(&self, center_id: Option<&str>) -> StoreResult<Vec<Submission>> {
        let conn = self.lock()?;

        let rows = match center_id {
            Some(center_id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM submissions WHERE center_id = ?1 ORDER BY seq"
                ))?;
                let rows = stmt
                    .query_map(params![center_id], raw_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM submissions ORDER BY seq"
                ))?;
                let rows = stmt
                    .query_map([], raw_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        rows.into_iter().map(RawRow::decode).collect()
    }
}

/// Row as read from SQLite, before the timestamp is parsed.
struct RawRow {
    id: String,
    center_id: String,
    patient_name: String,
    phone_number: String,
    email: Option<String>,
    original_report_url: String,
    simplified_report_url: Option<String>,
    created_at: String,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        center_id: row.get(1)?,
        patient_name: row.get(2)?,
        phone_number: row.get(3)?,
        email: row.get(4)?,
        original_report_url: row.get(5)?,
        simplified_report_url: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl RawRow {
    fn decode(self) -> StoreResult<Submission> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Decode {
                id: self.id.clone(),
                reason: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(Submission {
            id: self.id,
            center_id: self.center_id,
            patient_name: self.patient_name,
            phone_number: self.phone_number,
            email: self.email,
            original_report_url: self.original_report_url,
            simplified_report_url: self.simplified_report_url,
            created_at,
        })
    }
}

/// Run all pending migrations.
fn run_migrations(conn: &Connection) -> StoreResult<()> {
    let current_version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .optional()?
        .unwrap_or(0);

    for &(version, sql) in MIGRATIONS {
        if version > current_version {
            tracing::info!("running submission store migration v{version}");
            conn.execute_batch(sql)
                .and_then(|_| conn.pragma_update(None, "user_version", version))
                .map_err(|e| StoreError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_submission(center: &str, patient: &str, email: Option<&str>) -> NewSubmission {
        NewSubmission {
            center_id: center.into(),
            patient_name: patient.into(),
            phone_number: "555-0100".into(),
            email: email.map(str::to_string),
            original_report_url: format!("uploads/report-{patient}.txt"),
            simplified_report_url: Some(format!("uploads/simplified_report_{patient}.txt")),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_assigns_identifier_and_round_trips_fields() {
        let store = SqliteSubmissionStore::open_in_memory().unwrap();

        let inserted = store
            .insert(new_submission("Center 1", "Jane", Some("jane@example.com")))
            .unwrap();
        assert_eq!(inserted.id.len(), 32);

        let found = store.find_by_center(Some("Center 1")).unwrap();
        assert_eq!(found.len(), 1);

        let got = &found[0];
        assert_eq!(got.id, inserted.id);
        assert_eq!(got.patient_name, "Jane");
        assert_eq!(got.phone_number, "555-0100");
        assert_eq!(got.email.as_deref(), Some("jane@example.com"));
        assert_eq!(got.original_report_url, "uploads/report-Jane.txt");
        assert_eq!(
            got.simplified_report_url.as_deref(),
            Some("uploads/simplified_report_Jane.txt")
        );
        assert_eq!(
            got.created_at.timestamp_micros(),
            inserted.created_at.timestamp_micros()
        );
    }

    #[test]
    fn null_email_reads_back_as_none() {
        let store = SqliteSubmissionStore::open_in_memory().unwrap();
        store.insert(new_submission("Center 1", "NoMail", None)).unwrap();

        let found = store.find_by_center(Some("Center 1")).unwrap();
        assert_eq!(found[0].email, None);
    }

    #[test]
    fn find_by_center_matches_exactly_and_keeps_insertion_order() {
        let store = SqliteSubmissionStore::open_in_memory().unwrap();
        for (center, patient) in [
            ("Center 1", "a"),
            ("Center 2", "b"),
            ("Center 1", "c"),
            ("center 1", "d"),
            ("Center 1", "e"),
        ] {
            store.insert(new_submission(center, patient, None)).unwrap();
        }

        let names: Vec<_> = store
            .find_by_center(Some("Center 1"))
            .unwrap()
            .into_iter()
            .map(|s| s.patient_name)
            .collect();
        assert_eq!(names, ["a", "c", "e"]);

        assert!(store.find_by_center(Some("Center 9")).unwrap().is_empty());
        assert_eq!(store.find_by_center(None).unwrap().len(), 5);
    }

    #[test]
    fn repeated_queries_return_identical_results() {
        let store = SqliteSubmissionStore::open_in_memory().unwrap();
        store.insert(new_submission("Center 3", "x", None)).unwrap();
        store.insert(new_submission("Center 3", "y", None)).unwrap();

        let first = store.find_by_center(Some("Center 3")).unwrap();
        let second = store.find_by_center(Some("Center 3")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn records_persist_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("submissions.db");
        let url = format!("sqlite://{}", path.display());

        {
            let store = SqliteSubmissionStore::open(&url).unwrap();
            store.insert(new_submission("Center 1", "kept", None)).unwrap();
        }

        let reopened = SqliteSubmissionStore::open(&url).unwrap();
        let found = reopened.find_by_center(Some("Center 1")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].patient_name, "kept");
    }

    #[test]
    fn open_accepts_memory_forms_and_rejects_other_schemes() {
        assert!(SqliteSubmissionStore::open(":memory:").is_ok());
        assert!(SqliteSubmissionStore::open("sqlite::memory:").is_ok());

        for bad in ["mongodb://localhost:27017/reports", "postgres://db/x", "  "] {
            assert!(
                matches!(
                    SqliteSubmissionStore::open(bad),
                    Err(StoreError::UnsupportedUrl(_))
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn migrations_set_schema_version() {
        let store = SqliteSubmissionStore::open_in_memory().unwrap();
        let conn = store.lock().unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
