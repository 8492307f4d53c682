use ccwb::config::Config;
use ccwb::models::CrossRegionProfile;
use ccwb::region::get_source_region_for_profile;
use ccwb_cli::cli::{run, Cli};
use clap::Parser;
use tempfile::TempDir;

fn ccwb(root: &TempDir, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["ccwb", "--config-dir", root.path().to_str().unwrap()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?)
}

#[test]
fn test_init_select_region_and_quota() {
    let root = TempDir::new().unwrap();

    ccwb(
        &root,
        &[
            "init",
            "--name",
            "eu",
            "--provider-domain",
            "company.okta.com",
            "--client-id",
            "0oa1example",
            "--aws-region",
            "us-east-1",
        ],
    )
    .unwrap();
    ccwb(
        &root,
        &[
            "region",
            "set",
            "--model",
            "sonnet-4",
            "--cross-region",
            "europe",
        ],
    )
    .unwrap();
    ccwb(&root, &["quota", "set", "--limit", "1000000000"]).unwrap();

    let config = Config::load_from(root.path()).unwrap();
    let profile = config.get_profile(None).unwrap();
    assert_eq!(profile.cross_region_profile, Some(CrossRegionProfile::Europe));
    assert_eq!(get_source_region_for_profile(profile), "eu-west-3");
    assert_eq!(profile.warning_threshold_80(), 800_000_000);
    assert_eq!(profile.warning_threshold_90(), 900_000_000);

    ccwb(&root, &["deploy-params", "quota"]).unwrap();
    ccwb(&root, &["package", "--settings"]).unwrap();
    ccwb(&root, &["profile", "show", "--format", "json"]).unwrap();
}

#[test]
fn test_commands_on_missing_profile_fail() {
    let root = TempDir::new().unwrap();

    assert!(ccwb(&root, &["region", "show"]).is_err());
    assert!(ccwb(&root, &["--profile", "ghost", "quota", "show"]).is_err());
    assert!(ccwb(&root, &["profile", "list"]).is_ok());
}
