//! Dump file name generation.
//!
//! Every dump this handler writes is named
//! `core.<year>-<month>-<day>_<epoch-seconds>`, with an optional
//! `.<executable-name>` suffix. The prefix is shared with the retention
//! scanner so a generated file is always a retention candidate.

use chrono::{Datelike, Local};

/// Prefix every dump file name starts with.
///
/// The retention engine considers exactly the files carrying this prefix.
pub const DUMP_PREFIX: &str = "core.";

/// Build the file name for a dump captured now.
///
/// Date fields come from the local clock: calendar year, **zero-based**
/// month (0-11), and day of month, all unpadded, followed by the Unix
/// timestamp in whole seconds. Deployed directories were written with
/// exactly this layout; padding or renumbering any field would reorder
/// them against files already on disk.
#[must_use]
pub fn dump_file_name(exe_name: Option<&str>) -> String {
    let now = Local::now();
    render_name(
        exe_name,
        now.year(),
        now.month0(),
        now.day(),
        now.timestamp(),
    )
}

fn render_name(exe_name: Option<&str>, year: i32, month0: u32, day: u32, epoch: i64) -> String {
    match exe_name {
        Some(exe) => format!("{DUMP_PREFIX}{year}-{month0}-{day}_{epoch}.{exe}"),
        None => format!("{DUMP_PREFIX}{year}-{month0}-{day}_{epoch}"),
    }
}
