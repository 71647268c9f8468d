//! Tracing setup for the dbchat binary.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Build the log filter from `DBCHAT_LOG`, then `RUST_LOG`, then `info`.
fn env_filter(dbchat_log: Option<String>) -> EnvFilter {
    dbchat_log
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Compose a dispatcher writing to `log_file` and to `console`, either of
/// which may be absent.
fn build_dispatch<W>(
    filter: EnvFilter,
    log_file: Option<&Path>,
    console: Option<W>,
) -> std::io::Result<Dispatch>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };
    let console_layer = console.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .compact()
    });

    Ok(Dispatch::new(
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer),
    ))
}

/// Install the global subscriber.
///
/// Logs go to `log_file` when given and to stderr when `to_stderr` is set;
/// both at once is fine. With neither, nothing is installed and all events
/// are dropped.
pub fn init_tracing(log_file: Option<&Path>, to_stderr: bool) -> std::io::Result<()> {
    if log_file.is_none() && !to_stderr {
        return Ok(());
    }

    let filter = env_filter(std::env::var("DBCHAT_LOG").ok());
    let dispatch = build_dispatch(filter, log_file, to_stderr.then_some(std::io::stderr))?;
    let _ = dispatch.try_init();
    Ok(())
}
