use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::home_dir;

pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let log_dir = home_dir().join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create log directory {}: {}", log_dir.display(), e);
    }

    let (guard, installed) = install(&log_dir, component, to_stderr);
    // An earlier subscriber keeps receiving events; this one is dropped.
    if let Err(e) = installed {
        tracing::warn!("Logging for {} not installed: {}", component, e);
    }
    guard
}

fn install(log_dir: &Path, component: &str, to_stderr: bool) -> (WorkerGuard, Result<(), TryInitError>) {
    // One file per component per day, e.g. cli.log.2026-10-19
    let file_appender = tracing_appender::rolling::daily(log_dir, format!("{component}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let installed = if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(stderr_layer).try_init()
    } else {
        registry.try_init()
    };
    (guard, installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_subscriber_reports_instead_of_replacing() {
        let dir = tempfile::tempdir().unwrap();
        let (_first, _) = install(dir.path(), "first", false);
        let (_second, installed) = install(dir.path(), "second", false);
        assert!(installed.is_err());
    }
}
