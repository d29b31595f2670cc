//! Blog version history rules: retention policy, numbering retry bound,
//! change-summary validation and default summaries.
//!
//! This module lives in `core` (zero internal deps) so the numbering and
//! eviction arithmetic can be tested without a database.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Policy defaults
// ---------------------------------------------------------------------------

/// Number of versions kept per blog when no policy is configured.
pub const DEFAULT_RETENTION_KEEP: i64 = 50;

/// How many times a capture is attempted when its version number collides
/// with a concurrently committed capture.
pub const DEFAULT_MAX_NUMBERING_ATTEMPTS: u32 = 3;

/// Maximum length of a free-text change summary.
pub const MAX_CHANGE_SUMMARY_LEN: usize = 500;

/// Summary stamped on explicit checkpoints that were given none.
pub const DEFAULT_CHECKPOINT_SUMMARY: &str = "Manual checkpoint";

// ---------------------------------------------------------------------------
// Blog payload constants
// ---------------------------------------------------------------------------
//
// Versions copy these verbatim; the engine never interprets them.

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

pub const VISIBILITY_PUBLIC: &str = "public";
pub const VISIBILITY_MEMBERS: &str = "members";
pub const VISIBILITY_PAID: &str = "paid";

// ---------------------------------------------------------------------------
// Retention policy
// ---------------------------------------------------------------------------

/// Per-capture retention settings, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Maximum number of versions kept per blog. Always at least 1, so the
    /// version that triggered a prune is never the one evicted.
    pub keep: i64,
    /// Bound on capture attempts after a version-number collision.
    pub max_numbering_attempts: u32,
}

impl RetentionPolicy {
    pub fn new(keep: i64, max_numbering_attempts: u32) -> Result<Self, CoreError> {
        if keep < 1 {
            return Err(CoreError::Validation(format!(
                "Retention keep must be at least 1, got {keep}"
            )));
        }
        if max_numbering_attempts < 1 {
            return Err(CoreError::Validation(
                "Numbering attempts must be at least 1".into(),
            ));
        }
        Ok(Self {
            keep,
            max_numbering_attempts,
        })
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            keep: DEFAULT_RETENTION_KEEP,
            max_numbering_attempts: DEFAULT_MAX_NUMBERING_ATTEMPTS,
        }
    }
}

/// How many of the oldest versions must go so that at most `keep` remain.
pub fn excess_versions(count: i64, keep: i64) -> i64 {
    (count - keep.max(0)).max(0)
}

// ---------------------------------------------------------------------------
// Change summaries
// ---------------------------------------------------------------------------

/// Validate an optional change summary (<= 500 chars when present).
pub fn validate_change_summary(summary: Option<&str>) -> Result<(), CoreError> {
    if let Some(s) = summary {
        if s.chars().count() > MAX_CHANGE_SUMMARY_LEN {
            return Err(CoreError::Validation(format!(
                "Change summary must be at most {MAX_CHANGE_SUMMARY_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Summary recorded on the version a restore appends.
pub fn restore_summary(restored_number: i32) -> String {
    format!("Restored to version {restored_number}")
}

/// Normalize a caller-supplied summary: blank strings count as absent.
pub fn normalize_summary(summary: Option<&str>) -> Option<String> {
    summary
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
