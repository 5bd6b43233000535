//! `stv kill`: kill a running container.

use clap::Args;
use stevedore_client::Client;

/// Arguments for the `kill` command.
#[derive(Args, Debug)]
pub struct KillArgs {
    /// Container ID or name.
    pub container: String,
}

/// Executes the `kill` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached.
pub fn execute(args: &KillArgs, client: &Client) -> anyhow::Result<()> {
    let _ = client.container_handle(args.container.as_str()).kill()?;
    println!("{}", args.container);
    Ok(())
}
