//! Log file setup
//!
//! The terminal belongs to the UI, so events go to `~/.acctdesk/acctdesk.log`.
//! `ACCTDESK_LOG` takes the usual `EnvFilter` directives and defaults to `info`.

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "ACCTDESK_LOG";
const LOG_FILE: &str = "acctdesk.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber and return the log file path
pub fn init() -> Result<PathBuf> {
    let dir = Config::config_dir().ok_or_else(|| anyhow!("HOME is not set"))?;
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))?;

    Ok(path)
}
