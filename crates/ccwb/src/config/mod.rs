pub mod base;
pub mod migrations;
pub mod paths;
pub mod profile;

pub use base::{
    validate_profile_name, Config, ConfigError, CONFIG_FILE_NAME, DEFAULT_PROFILE_NAME,
    PROFILES_DIR_NAME, SCHEMA_VERSION,
};
pub use profile::{CredentialStorage, FederationType, Profile, ProfileInit, ProviderType};
