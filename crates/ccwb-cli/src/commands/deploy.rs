use anyhow::Result;
use ccwb::config::Config;
use ccwb::deploy::{auth_stack_parameters, quota_stack_parameters, stack_name, StackKind, StackParameter};
use clap::ValueEnum;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StackArg {
    Auth,
    Quota,
}

impl From<StackArg> for StackKind {
    fn from(arg: StackArg) -> Self {
        match arg {
            StackArg::Auth => StackKind::Auth,
            StackArg::Quota => StackKind::Quota,
        }
    }
}

pub fn deploy_params(
    config: &Config,
    profile: Option<&str>,
    stack: StackArg,
) -> Result<(String, Vec<StackParameter>)> {
    let profile = config.get_profile(profile)?;
    let kind = StackKind::from(stack);
    let params = match kind {
        StackKind::Auth => auth_stack_parameters(profile),
        StackKind::Quota => quota_stack_parameters(profile)?,
    };
    Ok((stack_name(profile, kind), params))
}

pub fn handle_deploy_params(config: &Config, profile: Option<&str>, stack: StackArg) -> Result<()> {
    let (name, params) = deploy_params(config, profile, stack)?;
    println!("# stack: {}", name);
    for param in params {
        println!("{}", param);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccwb::config::{CredentialStorage, Profile, ProfileInit};

    fn config_with_profile(quota: bool) -> Config {
        let mut profile = Profile::new(ProfileInit {
            name: "default".to_string(),
            provider_domain: "company.okta.com".to_string(),
            client_id: "client".to_string(),
            credential_storage: CredentialStorage::Session,
            aws_region: "us-east-1".to_string(),
            identity_pool_name: "claude-code-auth".to_string(),
        });
        profile.quota_monitoring_enabled = quota;
        let mut config = Config::new("/unused");
        config.add_profile(profile).unwrap();
        config
    }

    #[test]
    fn test_quota_params_need_monitoring() {
        assert!(deploy_params(&config_with_profile(false), None, StackArg::Quota).is_err());

        let (name, params) = deploy_params(&config_with_profile(true), None, StackArg::Quota).unwrap();
        assert_eq!(name, "claude-code-auth-quota");
        let keys: Vec<_> = params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["MonthlyTokenLimit", "WarningThreshold80", "WarningThreshold90"]
        );
    }

    #[test]
    fn test_auth_params() {
        let (name, params) = deploy_params(&config_with_profile(false), None, StackArg::Auth).unwrap();
        assert_eq!(name, "claude-code-auth-auth");
        assert!(params.iter().any(|p| p.key == "IdentityPoolName"));
    }
}
