use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::migrations::run_migrations;
use super::ConfigError;
use crate::models::CrossRegionProfile;
use crate::quota::{warning_thresholds, DEFAULT_MONTHLY_TOKEN_LIMIT};

pub const DEFAULT_MAX_SESSION_DURATION: u32 = 28_800;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStorage {
    Keyring,
    Session,
}

impl FromStr for CredentialStorage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyring" => Ok(CredentialStorage::Keyring),
            "session" => Ok(CredentialStorage::Session),
            _ => Err(format!("invalid credential storage: {}", s)),
        }
    }
}

impl fmt::Display for CredentialStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialStorage::Keyring => f.write_str("keyring"),
            CredentialStorage::Session => f.write_str("session"),
        }
    }
}

/// Identity provider behind the OIDC domain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    Okta,
    Auth0,
    Azure,
    Cognito,
}

impl ProviderType {
    pub fn detect(provider_domain: &str) -> Option<Self> {
        let domain = provider_domain.to_ascii_lowercase();
        if domain.contains("okta.com") || domain.contains("oktapreview.com") {
            Some(ProviderType::Okta)
        } else if domain.contains("auth0.com") {
            Some(ProviderType::Auth0)
        } else if domain.contains("microsoftonline.com") || domain.contains("windows.net") {
            Some(ProviderType::Azure)
        } else if domain.contains("amazoncognito.com") {
            Some(ProviderType::Cognito)
        } else {
            None
        }
    }

    pub fn is_cognito_user_pool(&self) -> bool {
        matches!(self, ProviderType::Cognito)
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "okta" => Ok(ProviderType::Okta),
            "auth0" => Ok(ProviderType::Auth0),
            "azure" => Ok(ProviderType::Azure),
            "cognito" => Ok(ProviderType::Cognito),
            _ => Err(format!("invalid provider type: {}", s)),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderType::Okta => "okta",
            ProviderType::Auth0 => "auth0",
            ProviderType::Azure => "azure",
            ProviderType::Cognito => "cognito",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FederationType {
    #[default]
    Cognito,
    Direct,
}

impl FromStr for FederationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cognito" => Ok(FederationType::Cognito),
            "direct" => Ok(FederationType::Direct),
            _ => Err(format!("invalid federation type: {}", s)),
        }
    }
}

impl fmt::Display for FederationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FederationType::Cognito => f.write_str("cognito"),
            FederationType::Direct => f.write_str("direct"),
        }
    }
}

/// Fields every profile must be created with.
#[derive(Debug, Clone)]
pub struct ProfileInit {
    pub name: String,
    pub provider_domain: String,
    pub client_id: String,
    pub credential_storage: CredentialStorage,
    pub aws_region: String,
    pub identity_pool_name: String,
}

/// One named deployment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub provider_domain: String,
    pub client_id: String,
    pub credential_storage: CredentialStorage,
    pub aws_region: String,
    pub identity_pool_name: String,

    #[serde(default)]
    pub provider_type: Option<ProviderType>,
    #[serde(default)]
    pub cognito_user_pool_id: Option<String>,
    #[serde(default)]
    pub federation_type: FederationType,
    #[serde(default)]
    pub federated_role_arn: Option<String>,
    #[serde(default = "default_max_session_duration")]
    pub max_session_duration: u32,

    #[serde(default)]
    pub allowed_bedrock_regions: Vec<String>,
    #[serde(default)]
    pub cross_region_profile: Option<CrossRegionProfile>,
    #[serde(default)]
    pub selected_source_region: Option<String>,
    #[serde(default)]
    pub selected_model: Option<String>,

    #[serde(default)]
    pub stack_names: BTreeMap<String, String>,
    #[serde(default)]
    pub monitoring_config: Map<String, Value>,
    #[serde(default = "default_true")]
    pub monitoring_enabled: bool,
    #[serde(default = "default_true")]
    pub analytics_enabled: bool,
    #[serde(default)]
    pub enable_codebuild: bool,
    #[serde(default)]
    pub enable_distribution: bool,

    #[serde(default)]
    pub quota_monitoring_enabled: bool,
    #[serde(default = "default_monthly_token_limit")]
    monthly_token_limit: u64,
    // Always present after migration; see `run_migrations`.
    warning_threshold_80: u64,
    warning_threshold_90: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_max_session_duration() -> u32 {
    DEFAULT_MAX_SESSION_DURATION
}

fn default_monthly_token_limit() -> u64 {
    DEFAULT_MONTHLY_TOKEN_LIMIT
}

impl Profile {
    pub fn new(init: ProfileInit) -> Self {
        let now = Utc::now();
        let (warning_threshold_80, warning_threshold_90) =
            warning_thresholds(DEFAULT_MONTHLY_TOKEN_LIMIT);

        Self {
            name: init.name,
            provider_domain: init.provider_domain,
            client_id: init.client_id,
            credential_storage: init.credential_storage,
            aws_region: init.aws_region,
            identity_pool_name: init.identity_pool_name,
            provider_type: None,
            cognito_user_pool_id: None,
            federation_type: FederationType::default(),
            federated_role_arn: None,
            max_session_duration: DEFAULT_MAX_SESSION_DURATION,
            allowed_bedrock_regions: Vec::new(),
            cross_region_profile: None,
            selected_source_region: None,
            selected_model: None,
            stack_names: BTreeMap::new(),
            monitoring_config: Map::new(),
            monitoring_enabled: true,
            analytics_enabled: true,
            enable_codebuild: false,
            enable_distribution: false,
            quota_monitoring_enabled: false,
            monthly_token_limit: DEFAULT_MONTHLY_TOKEN_LIMIT,
            warning_threshold_80,
            warning_threshold_90,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a profile from a stored record, filling in anything older
    /// records lack.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let mut record = match value {
            Value::Object(record) => record,
            other => {
                return Err(ConfigError::DeserializeError(format!(
                    "expected a profile object, found {}",
                    json_kind(&other)
                )))
            }
        };

        if run_migrations(&mut record) {
            let name = record
                .get("name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("<unnamed>");
            tracing::debug!(profile = name, "migrated legacy profile record");
        }

        serde_json::from_value(Value::Object(record))
            .map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    pub fn to_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    pub fn monthly_token_limit(&self) -> u64 {
        self.monthly_token_limit
    }

    pub fn warning_threshold_80(&self) -> u64 {
        self.warning_threshold_80
    }

    pub fn warning_threshold_90(&self) -> u64 {
        self.warning_threshold_90
    }

    /// Sets the monthly budget and recomputes both warning thresholds from it.
    pub fn set_monthly_token_limit(&mut self, limit: u64) {
        let (warning_threshold_80, warning_threshold_90) = warning_thresholds(limit);
        self.monthly_token_limit = limit;
        self.warning_threshold_80 = warning_threshold_80;
        self.warning_threshold_90 = warning_threshold_90;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn uses_cognito_user_pool(&self) -> bool {
        self.provider_type
            .is_some_and(|provider| provider.is_cognito_user_pool())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
pub(crate) fn test_profile(name: &str) -> Profile {
    Profile::new(ProfileInit {
        name: name.to_string(),
        provider_domain: "company.okta.com".to_string(),
        client_id: "0oa1example".to_string(),
        credential_storage: CredentialStorage::Session,
        aws_region: "us-east-1".to_string(),
        identity_pool_name: "claude-code-auth".to_string(),
    })
}
