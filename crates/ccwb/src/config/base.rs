use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::paths::Paths;
use super::profile::Profile;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const PROFILES_DIR_NAME: &str = "profiles";
pub const SCHEMA_VERSION: &str = "2.0";
pub const DEFAULT_PROFILE_NAME: &str = "default";

const LEGACY_PROFILES_KEY: &str = "profiles";
const LEGACY_DEFAULT_PROFILE_KEY: &str = "default_profile";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Invalid profile name '{0}': use letters, digits, '.', '_' or '-' and do not start with '.'")]
    InvalidProfileName(String),
    #[error("Failed to read or write config file: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Failed to deserialize value: {0}")]
    DeserializeError(String),
    #[error("Failed to serialize value: {0}")]
    SerializeError(String),
    #[error("Failed to access config directory: {0}")]
    DirectoryError(String),
    #[error("Invalid profiles directory '{0}': expected a single directory name inside the config root")]
    InvalidProfilesDir(String),
    #[error("Profile '{name}' is defined more than once: {source_path}")]
    DuplicateProfile { name: String, source_path: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigIndex {
    #[serde(default)]
    schema_version: Option<String>,
    #[serde(default = "default_active_profile")]
    active_profile: String,
    #[serde(default = "default_profiles_dir")]
    profiles_dir: String,
}

fn default_active_profile() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

fn default_profiles_dir() -> String {
    PROFILES_DIR_NAME.to_string()
}

/// Profile names become file names, so they are kept to a portable subset.
pub fn validate_profile_name(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidProfileName(name.to_string()))
    }
}

fn validate_profiles_dir(dir: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(dir).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::InvalidProfilesDir(dir.to_string())),
    }
}

/// The set of named profiles stored under one config directory.
///
/// On disk this is an index file (`config.json`) holding the schema version
/// and the active profile, plus one `profiles/<name>.json` per profile.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    active_profile: String,
    profiles_dir: String,
    profiles: BTreeMap<String, Profile>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active_profile: DEFAULT_PROFILE_NAME.to_string(),
            profiles_dir: PROFILES_DIR_NAME.to_string(),
            profiles: BTreeMap::new(),
        }
    }

    /// Loads from the user's config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Paths::config_dir())
    }

    pub fn load_from(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::new(root);
        let index_path = config.index_path();

        if !index_path.exists() {
            debug!(path = %index_path.display(), "no config index, starting empty");
            return Ok(config);
        }

        let index_value = read_json(&index_path)?;

        if index_value.get(LEGACY_PROFILES_KEY).is_some_and(Value::is_object) {
            config.load_legacy(index_value, &index_path)?;
            return Ok(config);
        }

        let index: ConfigIndex = serde_json::from_value(index_value).map_err(|e| {
            ConfigError::DeserializeError(format!("{}: {}", index_path.display(), e))
        })?;

        match index.schema_version.as_deref() {
            Some(SCHEMA_VERSION) => {}
            other => info!(
                found = other.unwrap_or("<missing>"),
                expected = SCHEMA_VERSION,
                "config schema version differs, migrating profiles on load"
            ),
        }

        validate_profiles_dir(&index.profiles_dir)?;
        config.active_profile = index.active_profile;
        config.profiles_dir = index.profiles_dir;
        for path in profile_files(&config.profiles_dir())? {
            let profile = Profile::from_value(read_json(&path)?).map_err(|e| match e {
                ConfigError::DeserializeError(msg) => {
                    ConfigError::DeserializeError(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?;

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            if stem != profile.name {
                warn!(
                    file = %path.display(),
                    name = %profile.name,
                    "profile file name does not match profile name"
                );
            }
            config.insert_loaded(profile, &path.display().to_string())?;
        }

        debug!(
            root = %config.root.display(),
            profiles = config.profiles.len(),
            active = %config.active_profile,
            "loaded config"
        );
        Ok(config)
    }

    // Older releases kept every profile inline in config.json.
    fn load_legacy(&mut self, index_value: Value, index_path: &Path) -> Result<(), ConfigError> {
        info!(path = %index_path.display(), "migrating single-file config layout");

        let Value::Object(mut legacy) = index_value else {
            return Err(ConfigError::DeserializeError(format!(
                "{}: expected an object",
                index_path.display()
            )));
        };

        if let Some(active) = legacy
            .get(LEGACY_DEFAULT_PROFILE_KEY)
            .and_then(Value::as_str)
        {
            self.active_profile = active.to_string();
        }

        if let Some(Value::Object(profiles)) = legacy.remove(LEGACY_PROFILES_KEY) {
            for (name, mut record) in profiles {
                if let Value::Object(fields) = &mut record {
                    fields
                        .entry("name")
                        .or_insert_with(|| Value::String(name.clone()));
                }
                let profile = Profile::from_value(record).map_err(|e| match e {
                    ConfigError::DeserializeError(msg) => ConfigError::DeserializeError(format!(
                        "{}: profile '{}': {}",
                        index_path.display(),
                        name,
                        msg
                    )),
                    other => other,
                })?;
                let source = format!("{} (profile '{}')", index_path.display(), name);
                self.insert_loaded(profile, &source)?;
            }
        }
        Ok(())
    }

    // Stored names get the same checks as `add_profile`. Two records may not
    // claim one name.
    fn insert_loaded(&mut self, profile: Profile, source: &str) -> Result<(), ConfigError> {
        validate_profile_name(&profile.name)?;
        if self.profiles.contains_key(&profile.name) {
            return Err(ConfigError::DuplicateProfile {
                name: profile.name,
                source_path: source.to_string(),
            });
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Writes the index and every profile, replacing each file atomically.
    /// Profile files whose profile was removed are deleted.
    pub fn save(&self) -> Result<(), ConfigError> {
        let profiles_dir = self.profiles_dir();
        fs::create_dir_all(&profiles_dir).map_err(|e| {
            ConfigError::DirectoryError(format!("{}: {}", profiles_dir.display(), e))
        })?;

        for profile in self.profiles.values() {
            let path = profiles_dir.join(format!("{}.json", profile.name));
            write_json_atomic(&path, &profile.to_value()?)?;
        }

        let keep: BTreeSet<&str> = self.profiles.keys().map(String::as_str).collect();
        for path in profile_files(&profiles_dir)? {
            let stale = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| !keep.contains(stem));
            if stale {
                debug!(path = %path.display(), "removing stale profile file");
                fs::remove_file(&path)?;
            }
        }

        let index = ConfigIndex {
            schema_version: Some(SCHEMA_VERSION.to_string()),
            active_profile: self.active_profile.clone(),
            profiles_dir: self.profiles_dir.clone(),
        };
        let index_value = serde_json::to_value(&index)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        write_json_atomic(&self.index_path(), &index_value)?;

        debug!(root = %self.root.display(), profiles = self.profiles.len(), "saved config");
        Ok(())
    }

    /// Registers a profile under its name, replacing any profile with the
    /// same name.
    pub fn add_profile(&mut self, profile: Profile) -> Result<(), ConfigError> {
        validate_profile_name(&profile.name)?;
        let name = profile.name.clone();
        if self.profiles.insert(name.clone(), profile).is_some() {
            debug!(profile = %name, "replaced existing profile");
        }
        Ok(())
    }

    /// Returns the named profile, or the active profile when `name` is `None`.
    pub fn get_profile(&self, name: Option<&str>) -> Result<&Profile, ConfigError> {
        let name = name.unwrap_or(&self.active_profile);
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    pub fn get_profile_mut(&mut self, name: Option<&str>) -> Result<&mut Profile, ConfigError> {
        let name = name.unwrap_or(&self.active_profile).to_string();
        self.profiles
            .get_mut(&name)
            .ok_or(ConfigError::ProfileNotFound(name))
    }

    pub fn remove_profile(&mut self, name: &str) -> Result<Profile, ConfigError> {
        self.profiles
            .remove(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    pub fn set_active_profile(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.profiles.contains_key(name) {
            return Err(ConfigError::ProfileNotFound(name.to_string()));
        }
        self.active_profile = name.to_string();
        Ok(())
    }

    pub fn active_profile(&self) -> &str {
        &self.active_profile
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(&self.profiles_dir)
    }
}

fn read_json(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ConfigError::DeserializeError(format!("{}: {}", path.display(), e)))
}

fn profile_files(dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.extension()? == "json").then_some(path)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .ok_or_else(|| ConfigError::DirectoryError(format!("{} has no parent", path.display())))?;

    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| ConfigError::FileError(e.error))?;
    Ok(())
}
