//! Logging setup
//!
//! Human-readable logs go to stderr, filtered by `RUST_LOG`. Unless disabled,
//! every run also keeps a JSON log file with debug detail.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::CommonArgs;

const DEFAULT_FILTER: &str = "freeze=info,freeze_orchestrator=info,freeze_client=info";
const FILE_FILTER: &str = "freeze=debug,freeze_orchestrator=debug,freeze_client=debug";

/// Where the JSON log file goes, if anywhere
pub fn log_file(args: &CommonArgs) -> Option<PathBuf> {
    if args.no_log_file {
        return None;
    }
    Some(args.log_file.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "output-{}.log",
            chrono::Utc::now().timestamp_millis()
        ))
    }))
}

/// Initialize logging
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        );

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Unable to create log file \"{}\"", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_filter(EnvFilter::new(FILE_FILTER)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
