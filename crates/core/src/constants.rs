//! Constants used throughout the generator core.
//!
//! Batch defaults, filename layout and the bounds of the synthetic values that are not
//! scenario-specific.

/// Number of bundles a run produces when no count is given.
pub const DEFAULT_BUNDLE_COUNT: u32 = 20;

/// Output directory, relative to the workspace root, used when no directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "test-data/json-examples";

/// Leading component of every bundle filename.
pub const BUNDLE_FILENAME_PREFIX: &str = "hemograma";

/// Extension of every bundle filename.
pub const BUNDLE_FILENAME_EXTENSION: &str = "json";

/// Samples are collected between 0 and this many days before the run.
pub const MAX_DAYS_AGO: i64 = 7;

/// Days between sample collection and result issue.
pub const ISSUE_DELAY_DAYS: i64 = 1;

/// Offset all timestamps are rendered in (UTC-03:00, Brasília time).
pub const LOCAL_UTC_OFFSET_SECONDS: i32 = -3 * 60 * 60;

/// Smallest synthetic subject identifier (11 digits).
pub const SUBJECT_ID_MIN: u64 = 10_000_000_000;

/// Largest synthetic subject identifier (11 digits).
pub const SUBJECT_ID_MAX: u64 = 99_999_999_999;
