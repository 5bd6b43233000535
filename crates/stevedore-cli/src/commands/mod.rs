//! CLI command definitions and dispatch.

pub mod create;
pub mod images;
pub mod inspect;
pub mod kill;
pub mod logs;
pub mod ps;
pub mod rm;
pub mod start;
pub mod stop;
pub mod system;
pub mod wait;

use std::time::Duration;

use clap::{Parser, Subcommand};
use stevedore_client::Client;
use stevedore_common::config::ClientConfig;
use stevedore_common::constants::{
    BIN_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, ENV_HOST, ENV_PORT, ENV_TIMEOUT,
};

/// stevedore: drive a container daemon over its remote API.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Daemon host.
    #[arg(long, global = true, env = ENV_HOST, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Daemon TCP port.
    #[arg(long, global = true, env = ENV_PORT, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Per-request timeout in seconds (0 disables).
    #[arg(long, global = true, env = ENV_TIMEOUT, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Cli {
    /// Client configuration assembled from the global flags.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let timeout = (self.timeout > 0).then(|| Duration::from_secs(self.timeout));
        ClientConfig::new(self.host.clone(), self.port).with_timeout(timeout)
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show daemon-wide counters and capabilities.
    Info,
    /// Show the daemon's build information.
    Version,
    /// List containers.
    Ps(ps::PsArgs),
    /// List images.
    Images(images::ImagesArgs),
    /// Create a container from an image.
    Create(create::CreateArgs),
    /// Start a created container.
    Start(start::StartArgs),
    /// Stop a running container.
    Stop(stop::StopArgs),
    /// Restart a container.
    Restart(stop::StopArgs),
    /// Kill a running container.
    Kill(kill::KillArgs),
    /// Remove a container.
    Rm(rm::RmArgs),
    /// Block until a container exits and print its exit code.
    Wait(wait::WaitArgs),
    /// Show the low-level details of a container.
    Inspect(inspect::InspectArgs),
    /// Print the output of a container.
    Logs(logs::LogsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the daemon address is invalid or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.client_config();
    tracing::debug!(host = %config.host, port = config.port, "using daemon");
    let client = Client::new(config)?;

    match cli.command {
        Command::Info => system::info(&client),
        Command::Version => system::version(&client),
        Command::Ps(args) => ps::execute(&args, &client),
        Command::Images(args) => images::execute(&args, &client),
        Command::Create(args) => create::execute(&args, &client),
        Command::Start(args) => start::execute(&args, &client),
        Command::Stop(args) => stop::execute(&args, &client),
        Command::Restart(args) => stop::restart(&args, &client),
        Command::Kill(args) => kill::execute(&args, &client),
        Command::Rm(args) => rm::execute(&args, &client),
        Command::Wait(args) => wait::execute(&args, &client),
        Command::Inspect(args) => inspect::execute(&args, &client),
        Command::Logs(args) => logs::execute(&args, &client),
    }
}
