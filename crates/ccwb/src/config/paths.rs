use etcetera::{choose_app_strategy, AppStrategy, AppStrategyArgs};
use std::path::PathBuf;

pub const PATH_ROOT_ENV: &str = "CCWB_PATH_ROOT";
const LOGS_DIR_NAME: &str = "logs";

pub struct Paths;

impl Paths {
    fn get_dir(dir_type: DirType) -> PathBuf {
        if let Ok(test_root) = std::env::var(PATH_ROOT_ENV) {
            let base = PathBuf::from(test_root);
            match dir_type {
                DirType::Config => base.join("config"),
                DirType::State => base.join("state"),
            }
        } else {
            let strategy = choose_app_strategy(AppStrategyArgs {
                top_level_domain: "com".to_string(),
                author: "Amazon".to_string(),
                app_name: "ccwb".to_string(),
            })
            .expect("ccwb requires a home dir");

            match dir_type {
                DirType::Config => strategy.config_dir(),
                DirType::State => strategy.state_dir().unwrap_or(strategy.data_dir()),
            }
        }
    }

    pub fn config_dir() -> PathBuf {
        Self::get_dir(DirType::Config)
    }

    pub fn state_dir() -> PathBuf {
        Self::get_dir(DirType::State)
    }

    /// Root of every component's log files.
    pub fn logs_dir() -> PathBuf {
        Self::state_dir().join(LOGS_DIR_NAME)
    }
}

enum DirType {
    Config,
    State,
}
