//! End-to-end crash handling pipeline.
//!
//! Ties the leaf modules together in the order the kernel expects: name the
//! dump, persist the stream, enforce retention, notify. Only a rejected
//! configuration or a failure to persist the stream is fatal; everything
//! after the dump is on disk runs best-effort so housekeeping can never
//! cost us the dump itself.

use std::io::Read;
use std::path::PathBuf;

use crate::config::HandlerConfig;
use crate::notify::{self, CrashNotice};
use crate::{Error, Result, ingest, naming, retention};

/// What one handler invocation did.
#[derive(Debug)]
pub struct CrashDigest {
    /// Full path of the dump that was written.
    pub dump_path: PathBuf,
    /// Bytes persisted.
    pub bytes: u64,
    /// Dumps deleted by the retention pass.
    pub deleted: usize,
}

/// Run the full pipeline for one crash event.
///
/// Retention and notification problems are logged and absorbed rather than
/// returned; the digest reports what actually happened.
pub fn handle_crash<R: Read>(config: &HandlerConfig, input: R) -> Result<CrashDigest> {
    config.validate().map_err(Error::Config)?;

    let name = naming::dump_file_name(Some(&config.exe_name));
    let dump_path = config.dump_dir.join(&name);
    let bytes = ingest::write_dump(input, &dump_path).map_err(Error::Ingest)?;

    let deleted = match retention::enforce_retention(&config.dump_dir, config.max_dumps) {
        Ok(report) => {
            if let Some(failure) = &report.failure {
                tracing::warn!(error = %failure, "Retention pass stopped early");
            }
            if report.truncated {
                tracing::warn!(scanned = report.scanned, "Retention scan hit its cap");
            }
            report.deleted
        }
        Err(e) => {
            tracing::warn!(error = %e, "Retention pass skipped");
            0
        }
    };

    if let Some(cmd) = &config.notify_cmd {
        let notice = CrashNotice {
            exe_name: config.exe_name.clone(),
            dump_dir: config.dump_dir.clone(),
            dump_name: name,
        };
        let message = notice.render(&notify::host_identity());
        if let Err(e) = notify::send_notification(cmd, &message) {
            tracing::warn!(error = %e, "Crash notice delivery failed");
        }
    }

    Ok(CrashDigest {
        dump_path,
        bytes,
        deleted,
    })
}
