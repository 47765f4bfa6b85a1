//! Bounded retention engine for dump directories.
//!
//! The engine keeps a dump directory from growing without limit as crashes
//! accumulate. It runs in two steps:
//!
//! - **Plan**: enumerate names carrying the dump prefix under a bounded scan,
//!   order them, and split them into survivors and evictions.
//! - **Apply**: delete the evictions, tolerating peer instances racing on the
//!   same directory.
//!
//! Ordering is reverse lexicographic over the raw file name bytes. Because
//! the embedded date fields are unpadded (see [`crate::naming`]), this is a
//! textual ordering, not a chronological one: `core.2026-9-...` outranks
//! `core.2026-10-...` even though month 10 is later. Directories in the
//! field were rotated under this comparator, so it stays byte-for-byte as
//! is; switching to numeric comparison would reshuffle which files survive.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::naming::DUMP_PREFIX;

/// Upper bound on names collected by one scan.
///
/// Keeps memory flat on pathological directories. Candidates past the cap
/// are left alone until a later pass.
pub const SCAN_CAP: usize = 500_000;

/// Errors from one retention pass.
#[derive(Error, Debug)]
pub enum RetentionError {
    /// The dump directory could not be enumerated.
    #[error("dump directory {path} unavailable: {source}")]
    DirectoryUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A scheduled deletion failed for a reason other than a lost race.
    #[error("failed to delete {name}: {source}")]
    DeletionFailed {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// One enforcement pass, already ordered and partitioned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetentionPlan {
    /// Names kept, highest-ranked first.
    pub survivors: Vec<String>,
    /// Names scheduled for deletion, in deletion order.
    pub evictions: Vec<String>,
    /// Whether the scan stopped at the cap with candidates left unread.
    pub truncated: bool,
}

impl RetentionPlan {
    /// Total matching names the scan collected.
    #[must_use]
    pub fn scanned(&self) -> usize {
        self.survivors.len() + self.evictions.len()
    }
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct RetentionReport {
    /// Matching names the scan collected.
    pub scanned: usize,
    /// Whether the scan stopped at the cap.
    pub truncated: bool,
    /// Files removed this pass.
    pub deleted: usize,
    /// First hard deletion failure, if the pass stopped early.
    pub failure: Option<RetentionError>,
}

/// Scan `dir` and decide which dump files survive a `max_count` policy.
///
/// Read-only; nothing is deleted until [`apply_plan`]. Entry names that are
/// not valid UTF-8 cannot have come from the name generator and are skipped.
/// The entry name is the only identity consulted: no file type or metadata
/// check, matching what the directory was rotated with historically.
pub fn plan_retention(dir: &Path, max_count: usize) -> Result<RetentionPlan, RetentionError> {
    plan_with_cap(dir, max_count, SCAN_CAP)
}

fn plan_with_cap(
    dir: &Path,
    max_count: usize,
    cap: usize,
) -> Result<RetentionPlan, RetentionError> {
    let entries = fs::read_dir(dir).map_err(|source| RetentionError::DirectoryUnavailable {
        path: dir.display().to_string(),
        source,
    })?;

    let mut names: Vec<String> = Vec::new();
    let mut truncated = false;
    for entry in entries.filter_map(Result::ok) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with(DUMP_PREFIX) {
            continue;
        }
        if names.len() == cap {
            truncated = true;
            break;
        }
        names.push(name.to_owned());
    }

    // Reverse lexicographic over the raw bytes; `str` orders byte-wise.
    names.sort_unstable_by(|a, b| b.cmp(a));

    let evictions = names.split_off(max_count.min(names.len()));
    Ok(RetentionPlan {
        survivors: names,
        evictions,
        truncated,
    })
}

/// Delete every eviction in `plan` from `dir`.
///
/// A target that is already gone was removed by a racing peer and passes
/// silently without counting as deleted. Any other failure stops the pass;
/// the report keeps the count deleted so far.
#[must_use]
pub fn apply_plan(dir: &Path, plan: &RetentionPlan) -> RetentionReport {
    let mut report = RetentionReport {
        scanned: plan.scanned(),
        truncated: plan.truncated,
        ..Default::default()
    };

    for name in &plan.evictions {
        match fs::remove_file(dir.join(name)) {
            Ok(()) => {
                report.deleted += 1;
                tracing::debug!(name = %name, "Removed excess dump");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(name = %name, "Dump already removed by a peer");
            }
            Err(e) => {
                report.failure = Some(RetentionError::DeletionFailed {
                    name: name.clone(),
                    source: e,
                });
                break;
            }
        }
    }

    report
}

/// Enforce a `max_count` policy on `dir`: plan, then apply.
pub fn enforce_retention(dir: &Path, max_count: usize) -> Result<RetentionReport, RetentionError> {
    let plan = plan_retention(dir, max_count)?;
    Ok(apply_plan(dir, &plan))
}
