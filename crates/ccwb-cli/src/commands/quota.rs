use anyhow::Result;
use ccwb::config::Config;
use ccwb::quota::{validate_limit, QuotaSettings};
use console::style;

pub fn handle_quota_set(config: &mut Config, profile: Option<&str>, limit: u64) -> Result<()> {
    validate_limit(limit)?;

    let target = config.get_profile_mut(profile)?;
    target.quota_monitoring_enabled = true;
    target.set_monthly_token_limit(limit);
    let settings = QuotaSettings::from_profile(target);
    let name = target.name.clone();
    config.save()?;

    tracing::info!(profile = %name, limit, "quota monitoring enabled");
    println!(
        "{} Quota monitoring enabled for {}",
        style("✓").green().bold(),
        style(&name).cyan()
    );
    print_settings(&settings);
    Ok(())
}

pub fn handle_quota_disable(config: &mut Config, profile: Option<&str>) -> Result<()> {
    let target = config.get_profile_mut(profile)?;
    target.quota_monitoring_enabled = false;
    target.touch();
    let name = target.name.clone();
    config.save()?;

    println!(
        "{} Quota monitoring disabled for {}",
        style("✓").green().bold(),
        style(&name).cyan()
    );
    Ok(())
}

pub fn handle_quota_show(config: &Config, profile: Option<&str>) -> Result<()> {
    let profile = config.get_profile(profile)?;
    let settings = QuotaSettings::from_profile(profile);

    println!(
        "{}",
        style(format!("Quota for {}:", profile.name)).cyan().bold()
    );
    println!(
        "  {:<20} {}",
        "Monitoring:",
        if settings.enabled { "enabled" } else { "disabled" }
    );
    print_settings(&settings);
    Ok(())
}

fn print_settings(settings: &QuotaSettings) {
    println!("  {:<20} {}", "Monthly limit:", settings.monthly_token_limit);
    println!("  {:<20} {}", "80% warning:", settings.warning_threshold_80);
    println!("  {:<20} {}", "90% warning:", settings.warning_threshold_90);
}
