//! Crash notices delivered through an external command.
//!
//! When the handler is configured with a notification command, it renders a
//! short mail-style notice and pipes it to the command's standard input via
//! `/bin/sh -c`, the same contract `popen(3)` gives shell one-liners. Host
//! identity for the banner is resolved best-effort and never fails the run.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Placeholder when no hostname can be determined at all.
const UNKNOWN_HOST: &str = "(unknown-host)";

/// Errors from handing a notice to the external command.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The command could not be spawned.
    #[error("cannot launch notify command `{cmd}`: {source}")]
    Launch {
        cmd: String,
        #[source]
        source: io::Error,
    },

    /// The notice could not be written to the command's stdin.
    #[error("cannot deliver notice: {source}")]
    Delivery {
        #[source]
        source: io::Error,
    },
}

/// Best-effort identity of the machine the crash happened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Short host name.
    pub hostname: String,
    /// Descriptive form for the banner, ideally fully qualified.
    pub fqdn: String,
}

/// What a notice says: which executable crashed and where the dump went.
#[derive(Debug, Clone)]
pub struct CrashNotice {
    /// Name of the crashing executable.
    pub exe_name: String,
    /// Directory the dump was written to.
    pub dump_dir: PathBuf,
    /// File name of the dump inside `dump_dir`.
    pub dump_name: String,
}

impl CrashNotice {
    /// Render the mail-style message, CRLF line endings included.
    ///
    /// The layout is what deployed mail filters already match on; treat it
    /// as a wire format.
    #[must_use]
    pub fn render(&self, host: &HostIdentity) -> String {
        format!(
            "Subject: [core_dump] {exe} crashed on {hostname}\r\n\r\n\
             !!!!! Crash encountered on {fqdn} !!!!!!!!!\r\n\
             executable name: {exe}\r\n\
             core file name: {dir}/{name}\r\n",
            exe = self.exe_name,
            hostname = host.hostname,
            fqdn = host.fqdn,
            dir = self.dump_dir.display(),
            name = self.dump_name,
        )
    }
}

/// Resolve the local host identity without ever failing.
///
/// The short name comes from `HOSTNAME`/`HOST`, then the kernel's
/// `/proc/sys/kernel/hostname`, then a fixed placeholder. The qualified form
/// comes from the canonical column of `/etc/hosts`, degrading to the short
/// name when nothing matches.
#[must_use]
pub fn host_identity() -> HostIdentity {
    let hostname = hostname();
    let fqdn = qualified_name(Path::new("/etc/hosts"), &hostname);
    HostIdentity { hostname, fqdn }
}

/// Pipe `message` to `cmd` run through `/bin/sh -c`.
///
/// A command that launches but exits nonzero is logged as a warning, not an
/// error: the dump is already on disk and the notice is best-effort.
pub fn send_notification(cmd: &str, message: &str) -> Result<(), NotifyError> {
    let mut child = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|source| NotifyError::Launch {
            cmd: cmd.to_string(),
            source,
        })?;

    // The stdin handle drops at the end of the match arm, closing the pipe
    // so the command sees EOF before we reap it.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(message.as_bytes()),
        None => Ok(()),
    };

    let status = child
        .wait()
        .map_err(|source| NotifyError::Delivery { source })?;
    written.map_err(|source| NotifyError::Delivery { source })?;

    if status.success() {
        tracing::debug!(cmd = %cmd, "Delivered crash notice");
    } else {
        tracing::warn!(cmd = %cmd, status = %status, "Notify command exited nonzero");
    }
    Ok(())
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("HOST"))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            fs::read_to_string("/proc/sys/kernel/hostname")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| {
            tracing::warn!("Hostname unavailable, using placeholder");
            UNKNOWN_HOST.to_string()
        })
}

/// Qualify `hostname` for the banner line.
fn qualified_name(hosts_path: &Path, hostname: &str) -> String {
    if hostname == UNKNOWN_HOST || hostname.contains('.') {
        return hostname.to_string();
    }
    match canonical_from_hosts(hosts_path, hostname) {
        Some(fqdn) => fqdn,
        None => {
            tracing::debug!(hostname = %hostname, "No hosts entry, using short name");
            hostname.to_string()
        }
    }
}

/// Find the canonical name for `hostname` in an `/etc/hosts`-format file.
///
/// A line matches when any of its names equals `hostname` or has it as the
/// first dot-separated label; the canonical name is the first name column.
fn canonical_from_hosts(path: &Path, hostname: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    for line in contents.lines() {
        let line = line.split('#').next().unwrap_or("");
        let mut fields = line.split_whitespace();
        if fields.next().is_none() {
            continue;
        }
        let names: Vec<&str> = fields.collect();
        let matches = names
            .iter()
            .any(|n| *n == hostname || n.split('.').next() == Some(hostname));
        if matches {
            return names.first().map(|n| (*n).to_string());
        }
    }
    None
}
