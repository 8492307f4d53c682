use anyhow::Result;
use ccwb::config::Config;
use ccwb::models::CrossRegionProfile;
use ccwb::region::{apply_model_selection, get_source_region_for_profile};
use clap::Args;
use console::style;

#[derive(Args, Debug, Clone)]
pub struct RegionSetArgs {
    /// Claude model key, see `ccwb models`
    #[arg(long)]
    pub model: String,

    /// us, europe or apac
    #[arg(long, default_value = "us")]
    pub cross_region: CrossRegionProfile,

    /// Pin client traffic to this region instead of the profile default
    #[arg(long)]
    pub source_region: Option<String>,
}

pub fn handle_region_set(config: &mut Config, profile: Option<&str>, args: RegionSetArgs) -> Result<()> {
    let target = config.get_profile_mut(profile)?;
    apply_model_selection(
        target,
        &args.model,
        args.cross_region,
        args.source_region.as_deref(),
    )?;
    let name = target.name.clone();
    let source_region = get_source_region_for_profile(&*target);
    let allowed = target.allowed_bedrock_regions.join(", ");
    config.save()?;

    println!(
        "{} {} now routes {} through {} ({})",
        style("✓").green().bold(),
        style(&name).cyan(),
        args.model,
        source_region,
        args.cross_region.display_name()
    );
    println!("  Inference allowed in: {}", allowed);
    Ok(())
}

pub fn handle_region_show(config: &Config, profile: Option<&str>) -> Result<()> {
    let profile = config.get_profile(profile)?;
    let source_region = get_source_region_for_profile(profile);

    println!("{}", style(format!("Profile {}:", profile.name)).cyan().bold());
    println!("  {:<24} {}", "Infrastructure region:", profile.aws_region);
    println!(
        "  {:<24} {}",
        "Cross-region profile:",
        profile
            .cross_region_profile
            .map(|p| p.to_string())
            .unwrap_or_else(|| "not set".to_string())
    );
    println!(
        "  {:<24} {}",
        "Model:",
        profile.selected_model.as_deref().unwrap_or("not set")
    );
    match &profile.selected_source_region {
        Some(region) => println!("  {:<24} {} (selected)", "Source region:", region),
        None => println!("  {:<24} {} (default)", "Source region:", source_region),
    }
    println!(
        "  {:<24} {}",
        "Allowed Bedrock regions:",
        profile.allowed_bedrock_regions.join(", ")
    );
    Ok(())
}
