use std::io::{self, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use gateway_sync::client::AdminClient;
use gateway_sync::config::{
    discover_credentials, Credentials, SyncConfig, DEFAULT_PROFILE,
};
use gateway_sync::reconcile::{self, AutoConfirm, ConfirmPrompt};
use gateway_sync::{Error, Result};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register services, routes and plugins from the config file
    Register(RegisterArgs),
    /// Update a registered service and prune entries removed from the config
    Update(ServiceArgs),
    /// Remove a service and its routes from the gateway
    Remove(ServiceArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Path to the declarative config file
    #[arg(long, env = "GATEWAY_SYNC_CONFIG", default_value = "gateway.yml")]
    config: PathBuf,

    /// Admin API base URL (overrides the config and credentials files)
    #[arg(long, env = "GATEWAY_ADMIN_URL")]
    admin_url: Option<String>,

    /// Credentials profile to use
    #[arg(long, env = "GATEWAY_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,
}

#[derive(Parser, Debug)]
struct RegisterArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Register only the named service (e.g. "--service my-service", "-n my-service")
    #[arg(long, short = 'n')]
    service: Option<String>,
}

#[derive(Parser, Debug)]
struct ServiceArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// The service to operate on
    #[arg(long, short = 'n')]
    service: String,

    /// Skip the interactive confirmation prompt
    #[arg(long)]
    yes: bool,
}

/// Blocking stdin prompt, run off the async runtime.
struct StdinPrompt;

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn confirm(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || -> Result<String> {
            print!("{prompt}");
            io::stdout().flush()?;
            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;
            Ok(answer.trim().to_string())
        })
        .await
        .map_err(|e| Error::Config(format!("confirmation prompt interrupted: {e}")))?
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Register(register_args) => run_register(register_args).await,
        Commands::Update(service_args) => run_update(service_args).await,
        Commands::Remove(service_args) => run_remove(service_args).await,
    }
}

/// Resolve the admin endpoint: explicit flag, then the config file's URL,
/// then the discovered credentials file. Headers always come from the
/// credentials file when one exists.
fn resolve_credentials(common: &CommonArgs, config: &SyncConfig) -> Result<Credentials> {
    let discovered = discover_credentials(&common.profile)?;

    let admin_api_url = common
        .admin_url
        .clone()
        .or_else(|| config.admin_api_url.clone())
        .or_else(|| {
            discovered
                .as_ref()
                .map(|credentials| credentials.admin_api_url.clone())
        })
        .ok_or_else(|| {
            Error::Config(
                "no admin API URL configured: pass --admin-url, set admin_api_url in the \
                 config file, or provide a credentials file"
                    .to_string(),
            )
        })?;

    let headers = discovered
        .map(|credentials| credentials.headers)
        .unwrap_or_default();

    Ok(Credentials {
        admin_api_url,
        headers,
    })
}

async fn run_register(args: RegisterArgs) -> Result<()> {
    let config = SyncConfig::from_file(&args.common.config)?;
    let client = AdminClient::new(&resolve_credentials(&args.common, &config)?)?;

    let services = config.selected_services(args.service.as_deref());
    if services.is_empty() {
        match &args.service {
            Some(name) => info!("there is no service configured with the name \"{name}\""),
            None => info!("there is no service configured to register"),
        }
        return Ok(());
    }

    reconcile::register_services(&client, &services).await
}

async fn run_update(args: ServiceArgs) -> Result<()> {
    let config = SyncConfig::from_file(&args.common.config)?;
    let client = AdminClient::new(&resolve_credentials(&args.common, &config)?)?;

    let services = config.selected_services(Some(&args.service));
    if services.is_empty() {
        info!(
            "there is no service configured with the name \"{}\"",
            args.service
        );
        return Ok(());
    }

    let prompt: &dyn ConfirmPrompt = if args.yes { &AutoConfirm } else { &StdinPrompt };
    for definition in services {
        reconcile::update_service(&client, definition, prompt).await?;
    }

    Ok(())
}

async fn run_remove(args: ServiceArgs) -> Result<()> {
    let config = SyncConfig::from_file(&args.common.config)?;
    let client = AdminClient::new(&resolve_credentials(&args.common, &config)?)?;

    let prompt: &dyn ConfirmPrompt = if args.yes { &AutoConfirm } else { &StdinPrompt };
    reconcile::remove_service(&client, &args.service, prompt).await
}
