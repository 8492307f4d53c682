use anyhow::{Context, Result};
use ccwb::config::Config;
use ccwb::package::{claude_settings, client_config};

pub fn render_package(config: &Config, profile: Option<&str>, settings: bool) -> Result<String> {
    let profile = config.get_profile(profile)?;
    let document = if settings {
        claude_settings(profile)?
    } else {
        client_config(profile)
    };
    serde_json::to_string_pretty(&document).context("Failed to render package configuration")
}

pub fn handle_package(config: &Config, profile: Option<&str>, settings: bool) -> Result<()> {
    println!("{}", render_package(config, profile, settings)?);
    Ok(())
}
