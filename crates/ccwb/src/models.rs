use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BEDROCK_DOC_LINK: &str =
    "https://docs.aws.amazon.com/bedrock/latest/userguide/cross-region-inference.html";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Unknown cross-region profile: {0}")]
    UnknownProfile(String),

    #[error("Model {model} is not available with the {profile} cross-region profile")]
    ProfileNotSupported { model: String, profile: String },
}

/// Routing policy controlling which regions a model's inference may span.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossRegionProfile {
    Us,
    Europe,
    Apac,
}

impl CrossRegionProfile {
    pub const ALL: [CrossRegionProfile; 3] = [Self::Us, Self::Europe, Self::Apac];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Europe => "europe",
            Self::Apac => "apac",
        }
    }

    /// Every region routed under this profile starts with this prefix.
    pub fn region_prefix(&self) -> &'static str {
        match self {
            Self::Us => "us-",
            Self::Europe => "eu-",
            Self::Apac => "ap-",
        }
    }

    /// Prefix of the inference profile ids Bedrock publishes for this geography.
    pub fn inference_prefix(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Europe => "eu",
            Self::Apac => "apac",
        }
    }

    pub fn default_source_region(&self) -> &'static str {
        match self {
            Self::Us => "us-east-1",
            Self::Europe => "eu-west-3",
            Self::Apac => "ap-northeast-1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Europe => "Europe",
            Self::Apac => "APAC",
        }
    }
}

impl fmt::Display for CrossRegionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossRegionProfile {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "us" => Ok(Self::Us),
            "europe" => Ok(Self::Europe),
            "apac" => Ok(Self::Apac),
            _ => Err(ModelError::UnknownProfile(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileAvailability {
    pub model_id: String,
    pub description: &'static str,
    pub source_regions: &'static [&'static str],
    pub allowed_regions: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub base_model_id: &'static str,
    pub profiles: IndexMap<CrossRegionProfile, ProfileAvailability>,
}

impl ModelEntry {
    fn new(key: &'static str, name: &'static str, base_model_id: &'static str) -> Self {
        Self {
            key,
            name,
            base_model_id,
            profiles: IndexMap::new(),
        }
    }

    fn with_profile(
        mut self,
        profile: CrossRegionProfile,
        description: &'static str,
        source_regions: &'static [&'static str],
        allowed_regions: &'static [&'static str],
    ) -> Self {
        let model_id = format!("{}.{}", profile.inference_prefix(), self.base_model_id);
        self.profiles.insert(
            profile,
            ProfileAvailability {
                model_id,
                description,
                source_regions,
                allowed_regions,
            },
        );
        self
    }

    pub fn supports(&self, profile: CrossRegionProfile) -> bool {
        self.profiles.contains_key(&profile)
    }
}

const US_SOURCE_REGIONS: &[&str] = &["us-east-1", "us-east-2", "us-west-2"];
const US_OPUS_ALLOWED_REGIONS: &[&str] = &["us-east-1", "us-east-2", "us-west-2"];
const US_ALLOWED_REGIONS: &[&str] = &["us-east-1", "us-east-2", "us-west-1", "us-west-2"];

const EU_SOURCE_REGIONS: &[&str] = &["eu-west-1", "eu-west-3", "eu-central-1", "eu-north-1"];
const EU_ALLOWED_REGIONS: &[&str] = &[
    "eu-central-1",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-3",
];

const APAC_SOURCE_REGIONS: &[&str] = &[
    "ap-northeast-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-south-1",
];
const APAC_ALLOWED_REGIONS: &[&str] = &[
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-4",
];

pub const DEFAULT_MODEL: &str = "sonnet-4";

/// Every Claude model the tool can configure, keyed by short model key.
pub static CLAUDE_MODELS: Lazy<IndexMap<&'static str, ModelEntry>> = Lazy::new(|| {
    use CrossRegionProfile::*;

    [
        ModelEntry::new(
            "opus-4-1",
            "Claude Opus 4.1",
            "anthropic.claude-opus-4-1-20250805-v1:0",
        )
        .with_profile(
            Us,
            "US regions only",
            US_SOURCE_REGIONS,
            US_OPUS_ALLOWED_REGIONS,
        ),
        ModelEntry::new(
            "opus-4",
            "Claude Opus 4",
            "anthropic.claude-opus-4-20250514-v1:0",
        )
        .with_profile(
            Us,
            "US regions only",
            US_SOURCE_REGIONS,
            US_OPUS_ALLOWED_REGIONS,
        ),
        ModelEntry::new(
            "sonnet-4-5",
            "Claude Sonnet 4.5",
            "anthropic.claude-sonnet-4-5-20250929-v1:0",
        )
        .with_profile(Us, "US regions", US_SOURCE_REGIONS, US_ALLOWED_REGIONS)
        .with_profile(
            Europe,
            "European regions",
            EU_SOURCE_REGIONS,
            EU_ALLOWED_REGIONS,
        ),
        ModelEntry::new(
            "sonnet-4",
            "Claude Sonnet 4",
            "anthropic.claude-sonnet-4-20250514-v1:0",
        )
        .with_profile(Us, "US regions", US_SOURCE_REGIONS, US_ALLOWED_REGIONS)
        .with_profile(
            Europe,
            "European regions",
            EU_SOURCE_REGIONS,
            EU_ALLOWED_REGIONS,
        )
        .with_profile(
            Apac,
            "Asia-Pacific regions",
            APAC_SOURCE_REGIONS,
            APAC_ALLOWED_REGIONS,
        ),
        ModelEntry::new(
            "sonnet-3-7",
            "Claude 3.7 Sonnet",
            "anthropic.claude-3-7-sonnet-20250219-v1:0",
        )
        .with_profile(Us, "US regions", US_SOURCE_REGIONS, US_ALLOWED_REGIONS)
        .with_profile(
            Europe,
            "European regions",
            EU_SOURCE_REGIONS,
            EU_ALLOWED_REGIONS,
        )
        .with_profile(
            Apac,
            "Asia-Pacific regions",
            APAC_SOURCE_REGIONS,
            APAC_ALLOWED_REGIONS,
        ),
    ]
    .into_iter()
    .map(|entry| (entry.key, entry))
    .collect()
});

pub fn get_model(model_key: &str) -> Result<&'static ModelEntry, ModelError> {
    CLAUDE_MODELS
        .get(model_key)
        .ok_or_else(|| ModelError::UnknownModel(model_key.to_string()))
}

pub fn all_models() -> impl Iterator<Item = &'static ModelEntry> {
    CLAUDE_MODELS.values()
}

fn lookup(model_key: &str, profile_key: &str) -> Result<&'static ProfileAvailability, ModelError> {
    let model = get_model(model_key)?;
    let profile = CrossRegionProfile::from_str(profile_key)?;
    model
        .profiles
        .get(&profile)
        .ok_or_else(|| ModelError::ProfileNotSupported {
            model: model_key.to_string(),
            profile: profile_key.to_string(),
        })
}

pub fn get_source_regions_for_model_profile(
    model_key: &str,
    profile_key: &str,
) -> Result<&'static [&'static str], ModelError> {
    lookup(model_key, profile_key).map(|availability| availability.source_regions)
}

pub fn list_allowed_regions(
    model_key: &str,
    profile_key: &str,
) -> Result<&'static [&'static str], ModelError> {
    lookup(model_key, profile_key).map(|availability| availability.allowed_regions)
}

pub fn get_model_id_for_profile(
    model_key: &str,
    profile_key: &str,
) -> Result<&'static str, ModelError> {
    lookup(model_key, profile_key).map(|availability| availability.model_id.as_str())
}

pub fn get_available_profiles_for_model(
    model_key: &str,
) -> Result<Vec<CrossRegionProfile>, ModelError> {
    let model = get_model(model_key)?;
    Ok(CrossRegionProfile::ALL
        .into_iter()
        .filter(|profile| model.supports(*profile))
        .collect())
}

pub fn get_default_region_for_profile(profile_key: &str) -> Result<&'static str, ModelError> {
    CrossRegionProfile::from_str(profile_key).map(|profile| profile.default_source_region())
}
