//! tracing subscriber setup for the CLI.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter from `RUST_LOG` when it parses, else WARN (DEBUG when `verbose`).
fn filter_for(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "warn" };
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Install the global subscriber.
///
/// `target` is `off`, `stderr`, `stdout`, or a file path (appended, no ANSI).
pub fn init(target: &str, verbose: bool) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = || filter_for(rust_log.as_deref(), verbose);

    match target {
        "0" | "off" => {}
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("open log file {filename}"))?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_picks_default_level() {
        assert_eq!(filter_for(None, false).to_string(), "warn");
        assert_eq!(filter_for(None, true).to_string(), "debug");
        assert_eq!(filter_for(Some("  "), true).to_string(), "debug");
    }

    #[test]
    fn rust_log_overrides_verbose() {
        assert_eq!(filter_for(Some("tasket_core=trace"), false).to_string(), "tasket_core=trace");
    }
}
