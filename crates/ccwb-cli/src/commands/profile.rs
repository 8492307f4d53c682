use anyhow::{Context, Result};
use ccwb::config::Config;
use ccwb::region::get_source_region_for_profile;
use clap::ValueEnum;
use console::style;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

pub fn handle_profile_list(config: &Config) -> Result<()> {
    if config.is_empty() {
        println!("  No profiles configured");
        println!("  Run '{}' to create one", style("ccwb init").cyan());
        return Ok(());
    }

    for profile in config.profiles() {
        let marker = if profile.name == config.active_profile() {
            style("*").green().bold().to_string()
        } else {
            " ".to_string()
        };
        let cross_region = profile
            .cross_region_profile
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {:<20} {:<12} {:<8} {}",
            marker,
            profile.name,
            profile.aws_region,
            cross_region,
            get_source_region_for_profile(profile)
        );
    }
    Ok(())
}

pub fn render_profile(config: &Config, name: Option<&str>, format: OutputFormat) -> Result<String> {
    let value = config.get_profile(name)?.to_value()?;
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&value).context("Failed to render profile as JSON")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&value).context("Failed to render profile as YAML")?
        }
    };
    Ok(rendered)
}

pub fn handle_profile_show(config: &Config, name: Option<&str>, format: OutputFormat) -> Result<()> {
    println!("{}", render_profile(config, name, format)?);
    Ok(())
}

pub fn handle_profile_use(config: &mut Config, name: &str) -> Result<()> {
    config.set_active_profile(name)?;
    config.save()?;
    println!(
        "{} Active profile is now {}",
        style("✓").green().bold(),
        style(name).cyan()
    );
    Ok(())
}

pub fn handle_profile_delete(config: &mut Config, name: &str) -> Result<()> {
    config.remove_profile(name)?;
    config.save()?;
    tracing::info!(profile = name, "profile deleted");
    println!("{} Deleted profile {}", style("✓").green().bold(), name);
    if config.active_profile() == name {
        println!(
            "  {}: {} was the active profile, run '{}' to pick another",
            style("Warning").yellow().italic(),
            name,
            style("ccwb profile use").cyan()
        );
    }
    Ok(())
}
