//! Per-invocation handler configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory dumps land in when none is given.
pub const DEFAULT_DUMP_DIR: &str = "/var/core";

/// Retention maximum when none is given.
pub const DEFAULT_MAX_DUMPS: usize = 10;

/// Everything one handler invocation needs to know.
///
/// There is no config file; the kernel invokes the handler with arguments
/// baked into `core_pattern`, so this struct is built once per crash from
/// the command line and validated before anything touches the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Directory dump files are written to.
    pub dump_dir: PathBuf,

    /// Name of the crashing executable.
    pub exe_name: String,

    /// Maximum dump files to retain in `dump_dir`.
    pub max_dumps: usize,

    /// Optional shell command the crash notice is piped to.
    pub notify_cmd: Option<String>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            dump_dir: PathBuf::from(DEFAULT_DUMP_DIR),
            exe_name: String::new(),
            max_dumps: DEFAULT_MAX_DUMPS,
            notify_cmd: None,
        }
    }
}

impl HandlerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.exe_name.trim().is_empty() {
            return Err("exe_name must not be empty".to_string());
        }
        if self.max_dumps == 0 {
            return Err("max_dumps must be >= 1".to_string());
        }
        if self.dump_dir.as_os_str().is_empty() {
            return Err("dump_dir must not be empty".to_string());
        }
        Ok(())
    }
}
