use std::fmt;

use crate::config::{FederationType, Profile};
use crate::quota::{QuotaError, QuotaSettings};

/// One `Key=Value` pair passed to `aws cloudformation deploy --parameter-overrides`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for StackParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StackKind {
    Auth,
    Quota,
}

impl StackKind {
    pub fn key(&self) -> &'static str {
        match self {
            StackKind::Auth => "auth",
            StackKind::Quota => "quota",
        }
    }
}

/// The CloudFormation stack name for `kind`, preferring the name recorded on
/// the profile.
pub fn stack_name(profile: &Profile, kind: StackKind) -> String {
    profile
        .stack_names
        .get(kind.key())
        .cloned()
        .unwrap_or_else(|| format!("{}-{}", profile.identity_pool_name, kind.key()))
}

pub fn auth_stack_parameters(profile: &Profile) -> Vec<StackParameter> {
    let mut params = vec![
        StackParameter::new("IdentityPoolName", &profile.identity_pool_name),
        StackParameter::new(
            "AllowedBedrockRegions",
            profile.allowed_bedrock_regions.join(","),
        ),
        StackParameter::new("ProviderDomain", &profile.provider_domain),
        StackParameter::new("ClientId", &profile.client_id),
        StackParameter::new("FederationType", profile.federation_type),
        StackParameter::new("MaxSessionDuration", profile.max_session_duration),
        StackParameter::new(
            "EnableMonitoring",
            if profile.monitoring_enabled {
                "true"
            } else {
                "false"
            },
        ),
    ];

    if let Some(pool_id) = &profile.cognito_user_pool_id {
        params.push(StackParameter::new("CognitoUserPoolId", pool_id));
    }

    if profile.federation_type == FederationType::Direct {
        if let Some(role_arn) = &profile.federated_role_arn {
            params.push(StackParameter::new("FederatedRoleArn", role_arn));
        }
    }

    params
}

pub fn quota_stack_parameters(profile: &Profile) -> Result<Vec<StackParameter>, QuotaError> {
    let settings = QuotaSettings::from_profile(profile);
    if !settings.enabled {
        return Err(QuotaError::Disabled(profile.name.clone()));
    }
    Ok(settings.stack_parameters())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::test_profile;

    fn find<'a>(params: &'a [StackParameter], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    #[test]
    fn test_auth_stack_parameters() {
        let mut profile = test_profile("prod");
        profile.allowed_bedrock_regions = vec!["us-east-1".to_string(), "us-west-2".to_string()];

        let params = auth_stack_parameters(&profile);
        assert_eq!(
            find(&params, "AllowedBedrockRegions"),
            Some("us-east-1,us-west-2")
        );
        assert_eq!(find(&params, "FederationType"), Some("cognito"));
        assert_eq!(find(&params, "MaxSessionDuration"), Some("28800"));
        assert_eq!(find(&params, "CognitoUserPoolId"), None);
        assert_eq!(find(&params, "FederatedRoleArn"), None);
    }

    #[test]
    fn test_auth_stack_parameters_direct_federation() {
        let mut profile = test_profile("prod");
        profile.federation_type = FederationType::Direct;
        profile.federated_role_arn = Some("arn:aws:iam::123456789012:role/Claude".to_string());
        profile.cognito_user_pool_id = Some("us-east-1_pool".to_string());

        let params = auth_stack_parameters(&profile);
        assert_eq!(
            find(&params, "FederatedRoleArn"),
            Some("arn:aws:iam::123456789012:role/Claude")
        );
        assert_eq!(find(&params, "CognitoUserPoolId"), Some("us-east-1_pool"));
    }

    #[test]
    fn test_quota_stack_parameters_require_monitoring() {
        let mut profile = test_profile("prod");
        assert_eq!(
            quota_stack_parameters(&profile),
            Err(QuotaError::Disabled("prod".to_string()))
        );

        profile.quota_monitoring_enabled = true;
        let params = quota_stack_parameters(&profile).unwrap();
        assert_eq!(find(&params, "MonthlyTokenLimit"), Some("225000000"));
        assert_eq!(find(&params, "WarningThreshold80"), Some("180000000"));
        assert_eq!(find(&params, "WarningThreshold90"), Some("202500000"));
    }

    #[test]
    fn test_stack_name_prefers_recorded_name() {
        let mut profile = test_profile("prod");
        assert_eq!(stack_name(&profile, StackKind::Quota), "claude-code-auth-quota");

        profile
            .stack_names
            .insert("auth".to_string(), "my-auth-stack".to_string());
        assert_eq!(stack_name(&profile, StackKind::Auth), "my-auth-stack");
    }
}
