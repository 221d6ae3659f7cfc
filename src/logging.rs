//! Diagnostics for the binding itself, never for the wrapped tool.
//!
//! `wgrib`/`wgrib2` print their inventory and data dumps on stdout, and
//! callers parse that stream. Nothing here may write to stdout or stderr
//! once a subscriber is installed, so events go to a file or nowhere.
//!
//! - `WGRIB_SHIM_LOG=/tmp/shim.log` enables logging to
//!   `/tmp/shim.log.{unix_secs}.{pid}`, one file per process.
//! - `RUST_LOG` overrides the default `wgrib_shim=info` directive, e.g.
//!   `RUST_LOG=wgrib_shim=debug` to see every forwarded `argc`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "WGRIB_SHIM_LOG";

/// Directive used when `RUST_LOG` is unset or unparsable. Scoped to this
/// crate so dependencies stay quiet.
const DEFAULT_DIRECTIVE: &str = "wgrib_shim=info";

/// Install the file subscriber if `WGRIB_SHIM_LOG` is set.
///
/// Returns the path actually written to. A file that cannot be created
/// leaves logging off; the warning is the one line this module ever puts
/// on stderr, and it is emitted before the tool runs.
pub fn init_tracing() -> Option<PathBuf> {
    let base = std::env::var_os(LOG_ENV)?;
    let path = log_file_path(Path::new(&base), unix_secs(), std::process::id());

    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("wgrib-shim: logging disabled, cannot create {}: {err}", path.display());
            return None;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .init();
    Some(path)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// `{base}.{secs}.{pid}`: concurrent processes never share a file.
fn log_file_path(base: &Path, secs: u64, pid: u32) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{secs}.{pid}"));
    PathBuf::from(name)
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
