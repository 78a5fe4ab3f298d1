//! File naming for stored reports.
//!
//! Names are derived from the wall clock so that concurrent uploads rarely collide; the
//! store's create-new semantics catch the cases that still do.

use crate::constants::{DEFAULT_EXTENSION, REPORT_FIELD_NAME, SIMPLIFIED_REPORT_STEM};
use chrono::{DateTime, Utc};
use rand::Rng;

const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;
const MAX_EXTENSION_LEN: usize = 16;

/// Builds the stored name for an uploaded original: `report-<millis>-<random>.<ext>`.
///
/// # Arguments
///
/// * `uploaded_name` - File name supplied by the client, if any
/// * `at` - Time of the upload
///
/// The extension is taken from `uploaded_name` and reduced to ASCII alphanumerics;
/// [`DEFAULT_EXTENSION`] is used when nothing usable remains.
pub fn original_report_name(uploaded_name: Option<&str>, at: DateTime<Utc>) -> String {
    let suffix = rand::thread_rng().gen_range(0..RANDOM_SUFFIX_BOUND);
    original_report_name_with_suffix(uploaded_name, at, suffix)
}

pub(crate) fn original_report_name_with_suffix(
    uploaded_name: Option<&str>,
    at: DateTime<Utc>,
    suffix: u32,
) -> String {
    format!(
        "{}-{}-{}.{}",
        REPORT_FIELD_NAME,
        at.timestamp_millis(),
        suffix,
        extension_of(uploaded_name)
    )
}

/// Builds the stored name for a generated summary: `simplified_report_<millis>.txt`.
///
/// `attempt` is zero for the first try; later attempts append `-<attempt>` so that a name
/// already taken within the same millisecond is never overwritten.
pub fn simplified_report_name(at: DateTime<Utc>, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}_{}.txt", SIMPLIFIED_REPORT_STEM, at.timestamp_millis())
    } else {
        format!(
            "{}_{}-{}.txt",
            SIMPLIFIED_REPORT_STEM,
            at.timestamp_millis(),
            attempt
        )
    }
}

fn extension_of(uploaded_name: Option<&str>) -> String {
    let ext: String = uploaded_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_EXTENSION_LEN)
        .collect();

    if ext.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        ext.to_ascii_lowercase()
    }
}
