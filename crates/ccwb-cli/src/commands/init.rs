use anyhow::{bail, Result};
use ccwb::config::{
    validate_profile_name, Config, CredentialStorage, FederationType, Profile, ProfileInit,
    ProviderType,
};
use ccwb::models::CrossRegionProfile;
use ccwb::quota::validate_limit;
use ccwb::region::{apply_model_selection, get_source_region_for_profile};
use clap::Args;
use console::style;

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Profile name
    #[arg(long, default_value = ccwb::config::DEFAULT_PROFILE_NAME)]
    pub name: String,

    /// OIDC provider domain, e.g. company.okta.com
    #[arg(long)]
    pub provider_domain: String,

    /// OIDC application client id
    #[arg(long)]
    pub client_id: String,

    /// Where end users keep their credentials: keyring or session
    #[arg(long, default_value = "session")]
    pub credential_storage: CredentialStorage,

    /// Region the infrastructure is deployed to
    #[arg(long)]
    pub aws_region: String,

    #[arg(long, default_value = "claude-code-auth")]
    pub identity_pool_name: String,

    /// okta, auth0, azure or cognito; detected from the domain when omitted
    #[arg(long)]
    pub provider_type: Option<ProviderType>,

    #[arg(long)]
    pub cognito_user_pool_id: Option<String>,

    #[arg(long, default_value = "cognito")]
    pub federation_type: FederationType,

    #[arg(long)]
    pub federated_role_arn: Option<String>,

    #[arg(long)]
    pub max_session_duration: Option<u32>,

    /// Claude model key, see `ccwb models`
    #[arg(long)]
    pub model: Option<String>,

    /// us, europe or apac
    #[arg(long)]
    pub cross_region: Option<CrossRegionProfile>,

    #[arg(long, requires = "model")]
    pub source_region: Option<String>,

    /// Bedrock regions to allow when no model is selected
    #[arg(long, value_delimiter = ',', conflicts_with = "model")]
    pub allowed_regions: Vec<String>,

    /// Enable quota monitoring with this monthly token limit
    #[arg(long)]
    pub monthly_token_limit: Option<u64>,

    #[arg(long)]
    pub disable_monitoring: bool,

    #[arg(long)]
    pub disable_analytics: bool,

    #[arg(long)]
    pub enable_codebuild: bool,

    #[arg(long)]
    pub enable_distribution: bool,

    /// Replace an existing profile with the same name
    #[arg(long)]
    pub force: bool,

    /// Make this the active profile
    #[arg(long)]
    pub activate: bool,
}

pub fn build_profile(args: InitArgs) -> Result<Profile> {
    validate_profile_name(&args.name)?;

    let provider_type = args
        .provider_type
        .or_else(|| ProviderType::detect(&args.provider_domain));
    if provider_type.is_some_and(|p| p.is_cognito_user_pool()) && args.cognito_user_pool_id.is_none()
    {
        bail!("--cognito-user-pool-id is required for Cognito user pool providers");
    }
    if args.federation_type == FederationType::Direct && args.federated_role_arn.is_none() {
        bail!("--federated-role-arn is required with --federation-type direct");
    }

    let mut profile = Profile::new(ProfileInit {
        name: args.name,
        provider_domain: args.provider_domain,
        client_id: args.client_id,
        credential_storage: args.credential_storage,
        aws_region: args.aws_region,
        identity_pool_name: args.identity_pool_name,
    });
    profile.provider_type = provider_type;
    profile.cognito_user_pool_id = args.cognito_user_pool_id;
    profile.federation_type = args.federation_type;
    profile.federated_role_arn = args.federated_role_arn;
    if let Some(duration) = args.max_session_duration {
        profile.max_session_duration = duration;
    }
    profile.monitoring_enabled = !args.disable_monitoring;
    profile.analytics_enabled = !args.disable_analytics;
    profile.enable_codebuild = args.enable_codebuild;
    profile.enable_distribution = args.enable_distribution;

    if let Some(model) = &args.model {
        let cross_region = args.cross_region.unwrap_or(CrossRegionProfile::Us);
        apply_model_selection(
            &mut profile,
            model,
            cross_region,
            args.source_region.as_deref(),
        )?;
    } else {
        profile.allowed_bedrock_regions = args.allowed_regions;
        profile.cross_region_profile = args.cross_region;
    }

    if let Some(limit) = args.monthly_token_limit {
        validate_limit(limit)?;
        profile.quota_monitoring_enabled = true;
        profile.set_monthly_token_limit(limit);
    }

    Ok(profile)
}

pub fn handle_init(config: &mut Config, args: InitArgs) -> Result<()> {
    let force = args.force;
    let activate = args.activate;
    let profile = build_profile(args)?;
    let name = profile.name.clone();

    if !force && config.get_profile(Some(&name)).is_ok() {
        bail!(
            "Profile '{}' already exists, pass --force to replace it",
            name
        );
    }

    let first_profile = config.is_empty();
    let source_region = get_source_region_for_profile(&profile);
    config.add_profile(profile)?;
    if activate || first_profile {
        config.set_active_profile(&name)?;
    }
    config.save()?;

    tracing::info!(profile = %name, "profile initialized");
    println!(
        "{} Saved profile {} (source region {})",
        style("✓").green().bold(),
        style(&name).cyan(),
        source_region
    );
    if config.active_profile() == name {
        println!("  {} is the active profile", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: InitArgs,
    }

    fn parse(extra: &[&str]) -> InitArgs {
        let mut argv = vec![
            "ccwb",
            "--provider-domain",
            "company.okta.com",
            "--client-id",
            "0oa1example",
            "--aws-region",
            "us-east-1",
        ];
        argv.extend_from_slice(extra);
        Harness::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_build_profile_detects_provider_and_defaults() {
        let profile = build_profile(parse(&[])).unwrap();
        assert_eq!(profile.name, "default");
        assert_eq!(profile.provider_type, Some(ProviderType::Okta));
        assert_eq!(profile.credential_storage, CredentialStorage::Session);
        assert_eq!(profile.cross_region_profile, None);
        assert!(!profile.quota_monitoring_enabled);
    }

    #[test]
    fn test_build_profile_with_model_selection() {
        let profile = build_profile(parse(&[
            "--model",
            "sonnet-4",
            "--cross-region",
            "europe",
            "--source-region",
            "eu-central-1",
            "--monthly-token-limit",
            "500000000",
        ]))
        .unwrap();

        assert_eq!(profile.cross_region_profile, Some(CrossRegionProfile::Europe));
        assert_eq!(profile.selected_source_region.as_deref(), Some("eu-central-1"));
        assert!(profile
            .allowed_bedrock_regions
            .iter()
            .all(|r| r.starts_with("eu-")));
        assert!(profile.quota_monitoring_enabled);
        assert_eq!(profile.warning_threshold_90(), 450_000_000);
    }

    #[test]
    fn test_build_profile_rejects_unoffered_combination() {
        assert!(build_profile(parse(&["--model", "opus-4-1", "--cross-region", "apac"])).is_err());
        assert!(build_profile(parse(&["--monthly-token-limit", "0"])).is_err());
        assert!(build_profile(parse(&["--monthly-token-limit", "1"])).is_err());
        assert!(build_profile(parse(&["--name", "../etc"])).is_err());
    }

    #[test]
    fn test_build_profile_requires_cognito_pool_id() {
        let args = parse(&["--provider-type", "cognito"]);
        assert!(build_profile(args).is_err());

        let args = parse(&[
            "--provider-type",
            "cognito",
            "--cognito-user-pool-id",
            "us-east-1_abc",
        ]);
        assert!(build_profile(args).unwrap().uses_cognito_user_pool());
    }

    #[test]
    fn test_handle_init_persists_and_activates_first_profile() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new(temp_dir.path());

        handle_init(&mut config, parse(&["--name", "prod"])).unwrap();
        assert_eq!(config.active_profile(), "prod");

        handle_init(&mut config, parse(&["--name", "staging"])).unwrap();
        assert_eq!(config.active_profile(), "prod");

        let reloaded = Config::load_from(temp_dir.path()).unwrap();
        assert_eq!(
            reloaded.profile_names().collect::<Vec<_>>(),
            vec!["prod", "staging"]
        );
    }

    #[test]
    fn test_handle_init_refuses_to_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new(temp_dir.path());

        handle_init(&mut config, parse(&["--name", "prod"])).unwrap();
        assert!(handle_init(&mut config, parse(&["--name", "prod"])).is_err());
        assert!(handle_init(&mut config, parse(&["--name", "prod", "--force"])).is_ok());
    }
}
