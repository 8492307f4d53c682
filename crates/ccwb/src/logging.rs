use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::paths::Paths;

/// Returns `<state>/logs/<component>`, creating it when `create` is set.
pub fn prepare_log_directory(component: &str, create: bool) -> Result<PathBuf> {
    let log_dir = Paths::logs_dir().join(component);
    if create {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    }
    Ok(log_dir)
}
