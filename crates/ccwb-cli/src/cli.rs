use std::path::PathBuf;

use anyhow::Result;
use ccwb::config::paths::Paths;
use ccwb::config::{Config, ConfigError};
use ccwb::models::ModelError;
use ccwb::region::RegionError;
use clap::{Parser, Subcommand};
use console::style;

use crate::commands::deploy::{handle_deploy_params, StackArg};
use crate::commands::info::handle_info;
use crate::commands::init::{handle_init, InitArgs};
use crate::commands::models::handle_models;
use crate::commands::package::handle_package;
use crate::commands::profile::{
    handle_profile_delete, handle_profile_list, handle_profile_show, handle_profile_use,
    OutputFormat,
};
use crate::commands::quota::{handle_quota_disable, handle_quota_set, handle_quota_show};
use crate::commands::region::{handle_region_set, handle_region_show, RegionSetArgs};

#[derive(Parser)]
#[command(
    name = "ccwb",
    author,
    version,
    about = "Configure Claude Code access to Amazon Bedrock",
    long_about = None
)]
pub struct Cli {
    /// Operate on this profile instead of the active one
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Use this config directory instead of the default
    #[arg(long, global = true, env = "CCWB_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or replace a profile
    Init(InitArgs),

    /// Manage saved profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// List the Claude models and the regions they can route through
    Models {
        /// Show a single model
        #[arg(long)]
        model: Option<String>,
    },

    /// Choose or inspect cross-region routing
    #[command(subcommand)]
    Region(RegionCommand),

    /// Configure monthly token quota monitoring
    #[command(subcommand)]
    Quota(QuotaCommand),

    /// Print CloudFormation parameter overrides for a stack
    DeployParams {
        #[arg(value_enum, default_value_t = StackArg::Auth)]
        stack: StackArg,
    },

    /// Print the configuration generated for end-user installs
    Package {
        /// Print the Claude Code settings.json instead of the credential process config
        #[arg(long)]
        settings: bool,
    },

    /// Show paths and version information
    Info {
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// List profiles
    List,
    /// Print a profile
    Show {
        name: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
    /// Make a profile the active one
    Use { name: String },
    /// Delete a profile
    Delete { name: String },
}

#[derive(Subcommand)]
enum RegionCommand {
    /// Select a model, cross-region profile and optional source region
    Set(RegionSetArgs),
    /// Show the effective source region
    Show,
}

#[derive(Subcommand)]
enum QuotaCommand {
    /// Enable quota monitoring with a monthly token limit
    Set {
        #[arg(long)]
        limit: u64,
    },
    /// Disable quota monitoring
    Disable,
    /// Show quota settings
    Show,
}

pub fn cli() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let root = cli.config_dir.unwrap_or_else(Paths::config_dir);
    let mut config = Config::load_from(root)?;
    let profile = cli.profile.as_deref();

    match cli.command {
        Command::Init(args) => handle_init(&mut config, args),
        Command::Profile(ProfileCommand::List) => handle_profile_list(&config),
        Command::Profile(ProfileCommand::Show { name, format }) => {
            handle_profile_show(&config, name.as_deref().or(profile), format)
        }
        Command::Profile(ProfileCommand::Use { name }) => handle_profile_use(&mut config, &name),
        Command::Profile(ProfileCommand::Delete { name }) => {
            handle_profile_delete(&mut config, &name)
        }
        Command::Models { model } => handle_models(model.as_deref()),
        Command::Region(RegionCommand::Set(args)) => handle_region_set(&mut config, profile, args),
        Command::Region(RegionCommand::Show) => handle_region_show(&config, profile),
        Command::Quota(QuotaCommand::Set { limit }) => {
            handle_quota_set(&mut config, profile, limit)
        }
        Command::Quota(QuotaCommand::Disable) => handle_quota_disable(&mut config, profile),
        Command::Quota(QuotaCommand::Show) => handle_quota_show(&config, profile),
        Command::DeployParams { stack } => handle_deploy_params(&config, profile, stack),
        Command::Package { settings } => handle_package(&config, profile, settings),
        Command::Info { verbose } => handle_info(&config, verbose),
    }
}

/// Prints a failed command's error the way the rest of the CLI styles output.
pub fn report_error(e: &anyhow::Error) {
    let label = style("Error").red().italic();

    if let Some(err) = e.downcast_ref::<ConfigError>() {
        match err {
            ConfigError::ProfileNotFound(name) => eprintln!(
                "\n  {} Profile '{}' not found \n  Run '{}' to create it or '{}' to see saved profiles",
                label,
                name,
                style("ccwb init").cyan(),
                style("ccwb profile list").cyan()
            ),
            ConfigError::DeserializeError(msg) => eprintln!(
                "\n  {} Invalid configuration: {} \n  Fix or remove the file and run the command again",
                label, msg
            ),
            ConfigError::FileError(io) => eprintln!(
                "\n  {} Failed to access config file: {} \n  Please check file permissions",
                label, io
            ),
            ConfigError::DirectoryError(msg) => eprintln!(
                "\n  {} Failed to access config directory: {} \n  Please check directory permissions",
                label, msg
            ),
            other => eprintln!("\n  {} {}", label, other),
        }
        return;
    }

    let catalog_error = e
        .downcast_ref::<RegionError>()
        .map(ToString::to_string)
        .or_else(|| e.downcast_ref::<ModelError>().map(ToString::to_string));
    if let Some(msg) = catalog_error {
        eprintln!(
            "\n  {} {} \n  Run '{}' to see which models and regions are offered",
            label,
            msg,
            style("ccwb models").cyan()
        );
        return;
    }

    eprintln!("\n  {} {:#}", label, e);
}
