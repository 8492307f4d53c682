use anyhow::Result;
use ccwb::config::paths::Paths;
use ccwb::config::{Config, CONFIG_FILE_NAME};
use ccwb::region::get_source_region_for_profile;
use console::style;
use std::fs;
use std::path::Path;

fn print_aligned(label: &str, value: &str, width: usize) {
    println!("  {:<width$} {}", label, value, width = width);
}

fn check_path_status(path: &Path) -> String {
    if path.exists() {
        "".to_string()
    } else {
        let mut current = path.parent();
        while let Some(parent) = current {
            if parent.exists() {
                return match fs::metadata(parent).map(|m| !m.permissions().readonly()) {
                    Ok(true) => style("missing (can create)").dim().to_string(),
                    Ok(false) => style("missing (read-only parent)").red().to_string(),
                    Err(_) => style("missing (cannot check)").red().to_string(),
                };
            }
            current = parent.parent();
        }
        style("missing (no writable parent)").red().to_string()
    }
}

pub fn handle_info(config: &Config, verbose: bool) -> Result<()> {
    let logs_dir = Paths::logs_dir();
    let config_dir = config.root().to_path_buf();
    let index_file = config_dir.join(CONFIG_FILE_NAME);
    let profiles_dir = config.profiles_dir();

    let paths = [
        ("Config dir:", &config_dir),
        ("Config index:", &index_file),
        ("Profiles dir:", &profiles_dir),
        ("Logs dir:", &logs_dir),
    ];

    let label_padding = paths.iter().map(|(l, _)| l.len()).max().unwrap_or(0) + 4;
    let path_padding = paths
        .iter()
        .map(|(_, p)| p.display().to_string().len())
        .max()
        .unwrap_or(0)
        + 4;

    println!("{}", style("ccwb Version:").cyan().bold());
    print_aligned("Version:", env!("CARGO_PKG_VERSION"), label_padding);
    println!();

    println!("{}", style("Paths:").cyan().bold());
    for (label, path) in &paths {
        println!(
            "{:<label_padding$}{:<path_padding$}{}",
            label,
            path.display(),
            check_path_status(path)
        );
    }

    if verbose {
        println!("\n{}", style("Profiles:").cyan().bold());
        if config.is_empty() {
            println!("  No profiles configured");
            println!("  Run '{}' to configure ccwb", style("ccwb init").cyan());
        } else {
            for profile in config.profiles() {
                let active = if profile.name == config.active_profile() {
                    " (active)"
                } else {
                    ""
                };
                print_aligned(
                    &format!("{}{}:", profile.name, active),
                    &get_source_region_for_profile(profile),
                    label_padding,
                );
            }
        }
    }

    Ok(())
}
