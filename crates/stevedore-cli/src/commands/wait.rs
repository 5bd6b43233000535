//! `stv wait`: block until a container exits.

use clap::Args;
use stevedore_client::Client;

/// Arguments for the `wait` command.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Container ID or name.
    pub container: String,
}

/// Executes the `wait` command and prints the exit code.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached or reports no exit code.
pub fn execute(args: &WaitArgs, client: &Client) -> anyhow::Result<()> {
    let code = client.container_handle(args.container.as_str()).wait()?;
    println!("{code}");
    Ok(())
}
