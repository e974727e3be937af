use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, warn};

use pim::commands::{self, AutoConfirm, Prompt, Session, StdinPrompt};
use pim::config::{self, Config, DEFAULT_REFRESH_INTERVAL_MS};
use pim::install::{ProcessInstaller, PythonOrgDownloader, RegistryInstalledVersions};
use pim::logging;
use pim::version::cache::CatalogCache;
use pim::version::error::CacheError;
use pim::version::feeds::GitHubTagFeed;
use pim::version::fetcher::CatalogFetcher;
use pim::version::service::CatalogService;

#[derive(Parser)]
#[command(name = "pim")]
#[command(version, about = "Install and update CPython with selected or latest versions")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/pim/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Allow pre-release versions
    #[arg(short = 'p', long, global = true)]
    pre_release: bool,

    /// Install for all users
    #[arg(short = 'a', long, global = true)]
    all_user: bool,

    /// Install target directory
    #[arg(short = 't', long, global = true)]
    target_directory: Option<PathBuf>,

    /// Additional installer option, e.g. `-o CompileAll=1`
    #[arg(short = 'o', long = "additional-option", global = true, value_parser = parse_key_value)]
    additional_options: Vec<(String, String)>,

    /// Skip confirmation
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Session(SessionCommand),
    /// Delete the catalog cache and downloaded installers
    CleanCache,
}

/// Subcommands that need the catalog and the installer
#[derive(Subcommand)]
enum SessionCommand {
    /// Install a Python version
    Install {
        version: String,
        /// Install the latest version of the given MAJOR.MINOR line
        #[arg(short = 'l', long)]
        latest: bool,
    },
    /// Update an installed Python line to its latest release
    Update {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        version: Option<String>,
        /// Update every updatable line
        #[arg(short = 'A', long)]
        all: bool,
    },
    /// Uninstall the installed version of a MAJOR.MINOR line
    Uninstall { version: String },
    /// Show installed versions and available updates
    Status,
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", input)),
    }
}

/// Flags only ever switch settings on; they never clear the config file's values
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    config.allow_pre_release |= cli.pre_release;
    config.for_all_user |= cli.all_user;
    if let Some(dir) = &cli.target_directory {
        config.target_directory = Some(dir.clone());
    }
    for (key, value) in &cli.additional_options {
        config
            .additional_installer_options
            .insert(key.clone(), value.clone());
    }
    config
}

fn open_cache() -> Result<CatalogCache, CacheError> {
    CatalogCache::open(&config::catalog_db_path(), DEFAULT_REFRESH_INTERVAL_MS).or_else(|e| {
        warn!("Failed to open catalog cache, continuing without it: {}", e);
        CatalogCache::in_memory(DEFAULT_REFRESH_INTERVAL_MS)
    })
}

fn build_session(config: Config, force: bool) -> Result<Session, CacheError> {
    let feed = GitHubTagFeed::default().with_token(std::env::var("GITHUB_TOKEN").ok());
    let service = CatalogService::new(
        CatalogFetcher::new(Box::new(feed)),
        open_cache()?,
        config.allow_pre_release,
    );
    let prompt: Box<dyn Prompt> = if force {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinPrompt)
    };

    Ok(Session::new(
        config,
        service,
        Box::new(PythonOrgDownloader::default()),
        Box::new(ProcessInstaller),
        Box::new(RegistryInstalledVersions),
        prompt,
    ))
}

async fn run(command: SessionCommand, config: Config, force: bool) -> anyhow::Result<()> {
    let mut session = build_session(config, force)?;
    let mut out = std::io::stdout();

    match command {
        SessionCommand::Install { version, latest } => {
            session.install(&version, latest, &mut out).await?
        }
        SessionCommand::Update { all: true, .. } => session.update_all(&mut out).await?,
        SessionCommand::Update { version, .. } => {
            let version = version.unwrap_or_default();
            session.update(&version, &mut out).await?
        }
        SessionCommand::Uninstall { version } => session.uninstall(&version, &mut out).await?,
        SessionCommand::Status => session.status(&mut out).await?,
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The log file lives in the cache directory, which clean-cache deletes
    let log_dir = (!matches!(cli.command, Command::CleanCache)).then(config::cache_dir);
    let _guard = logging::init(cli.verbose, log_dir.as_deref());

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = apply_overrides(Config::load(&config_path)?, &cli);
    debug!("config: {:?}", config);

    match cli.command {
        Command::CleanCache => {
            Ok(commands::clean_cache(&config::cache_dir(), &mut std::io::stdout())?)
        }
        Command::Session(command) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(run(command, config, cli.force)),
    }
}
