//! corekeep: userspace core-file handler.
//!
//! The kernel invokes this binary once per crash with the raw dump on
//! standard input:
//!
//! ```text
//! echo "|/usr/sbin/corekeep -e %e -d /var/core -m 10 \
//!       -s '/usr/sbin/sendmail -t sysadmin@example.com'" \
//!       > /proc/sys/kernel/core_pattern
//! ```
//!
//! The dump is persisted first; retention and notification run after and
//! never fail the process. Logs go to stderr, since stdin belongs to the
//! kernel pipe and stdout goes nowhere useful from a crash context.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use corekeep_core::Error;
use corekeep_core::config::{DEFAULT_DUMP_DIR, HandlerConfig};
use corekeep_core::handler;

/// Userspace core-file handler with bounded dump retention.
#[derive(Parser, Debug)]
#[command(name = "corekeep", version, about = "Userspace core-file handler for Linux")]
struct Cli {
    /// Directory to write core files into
    #[arg(short = 'd', long = "dir", default_value = DEFAULT_DUMP_DIR)]
    dir: PathBuf,

    /// Name of the executable that is core dumping
    #[arg(short = 'e', long = "exe")]
    exe: String,

    /// Maximum number of core files to keep before older ones are deleted
    #[arg(
        short = 'm',
        long = "max-dumps",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_dumps: u64,

    /// Shell command the crash notice is piped to
    /// (e.g. '/usr/sbin/sendmail -t sysadmin@example.com')
    #[arg(short = 's', long = "notify-cmd")]
    notify_cmd: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Map a raw OS error number onto the process exit status.
fn exit_code_for(os_code: i32) -> ExitCode {
    u8::try_from(os_code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = HandlerConfig {
        dump_dir: cli.dir,
        exe_name: cli.exe,
        max_dumps: usize::try_from(cli.max_dumps).unwrap_or(usize::MAX),
        notify_cmd: cli.notify_cmd,
    };

    match handler::handle_crash(&config, io::stdin().lock()) {
        Ok(digest) => {
            tracing::info!(
                path = %digest.dump_path.display(),
                bytes = digest.bytes,
                deleted = digest.deleted,
                "Wrote core dump"
            );
            ExitCode::SUCCESS
        }
        Err(Error::Ingest(e)) => {
            tracing::error!(error = %e, "Could not persist the dump");
            exit_code_for(e.os_code())
        }
        Err(e) => {
            tracing::error!(error = %e, "Handler failed");
            ExitCode::FAILURE
        }
    }
}
