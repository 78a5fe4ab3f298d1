//! Constants shared by the storage layout and the HTTP static route.

/// Public path prefix under which stored blobs are addressed and served.
pub const PUBLIC_PREFIX: &str = "uploads";

/// Extension used for uploads whose original file name has none.
pub const DEFAULT_EXTENSION: &str = "bin";

/// Form field name of the uploaded report; also the stem of stored originals.
pub(crate) const REPORT_FIELD_NAME: &str = "report";

/// Stem of generated summary files.
pub(crate) const SIMPLIFIED_REPORT_STEM: &str = "simplified_report";
