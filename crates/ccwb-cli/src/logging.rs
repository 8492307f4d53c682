use anyhow::{Context, Result};
use std::sync::Once;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

// Used to ensure we only set up tracing once
static INIT: Once = Once::new();

/// Sets up file-based JSON logging for the CLI.
///
/// Logs go to `<state>/logs/cli/<timestamp>.log`; nothing is written to the
/// console. `RUST_LOG` replaces the default filter.
pub fn setup_logging(name: Option<&str>) -> Result<()> {
    setup_logging_internal(name, false)
}

fn default_filter() -> EnvFilter {
    EnvFilter::new("")
        .add_directive("ccwb=debug".parse().unwrap())
        .add_directive("ccwb_cli=info".parse().unwrap())
        .add_directive(LevelFilter::WARN.into())
}

/// Internal function that allows bypassing the Once check for testing
fn setup_logging_internal(name: Option<&str>, force: bool) -> Result<()> {
    let mut result = Ok(());

    let mut setup = || {
        result = (|| {
            let log_dir = ccwb::logging::prepare_log_directory("cli", true)?;
            let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
            let log_filename = if let Some(n) = name {
                format!("{}-{}.log", timestamp, n)
            } else {
                format!("{}.log", timestamp)
            };
            let file_appender = tracing_appender::rolling::RollingFileAppender::new(
                Rotation::NEVER,
                log_dir,
                log_filename,
            );

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(file_appender)
                .with_ansi(false)
                .json();

            let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

            let subscriber = Registry::default().with(file_layer.with_filter(env_filter));

            if force {
                // For testing, use the subscriber without setting it globally
                let _guard = subscriber.set_default();
                tracing::warn!("Test log entry from setup");
                tracing::info!("Another test log entry from setup");
                Ok(())
            } else {
                subscriber
                    .try_init()
                    .context("Failed to set global subscriber")?;
                Ok(())
            }
        })();
    };

    if force {
        setup();
    } else {
        INIT.call_once(setup);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccwb::config::paths::PATH_ROOT_ENV;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn setup_temp_root() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        env::set_var(PATH_ROOT_ENV, temp_dir.path());
        temp_dir
    }

    #[test]
    #[serial]
    fn test_log_directory_creation() {
        let temp_dir = setup_temp_root();
        let log_dir = ccwb::logging::prepare_log_directory("cli", true).unwrap();
        assert!(log_dir.exists());
        assert!(log_dir.is_dir());
        assert!(log_dir.starts_with(temp_dir.path()));

        let path_components: Vec<_> = log_dir.components().collect();
        assert!(path_components.iter().any(|c| c.as_os_str() == "logs"));
        assert!(path_components.iter().any(|c| c.as_os_str() == "cli"));

        env::remove_var(PATH_ROOT_ENV);
    }

    #[test]
    #[serial]
    fn test_forced_setup_writes_log_file() {
        let temp_dir = setup_temp_root();
        setup_logging_internal(Some("test"), true).unwrap();

        let log_dir = temp_dir.path().join("state").join("logs").join("cli");
        let files: Vec<_> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("-test.log"));

        env::remove_var(PATH_ROOT_ENV);
    }
}
