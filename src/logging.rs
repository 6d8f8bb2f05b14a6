//! Logger setup for the binary
//!
//! The terminal front-end owns stderr, so without a log file no logger is
//! installed and every record is dropped, whatever `RUST_LOG` says. With a
//! log file the filter defaults to `info` and `RUST_LOG` overrides it.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::File;
use std::path::Path;

pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialise logger")?;

    log::info!("logging to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_file_keeps_logging_off() {
        assert!(init(None).is_ok());
        assert_eq!(log::max_level(), log::LevelFilter::Off);
        assert!(!log::log_enabled!(log::Level::Error));
    }
}
