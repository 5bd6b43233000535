//! `stv rm`: remove a container.

use clap::Args;
use stevedore_client::{Client, Options};

/// Arguments for the `rm` command.
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Container ID or name.
    pub container: String,

    /// Also remove the volumes associated with the container.
    #[arg(short, long)]
    pub volumes: bool,
}

/// Executes the `rm` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached.
pub fn execute(args: &RmArgs, client: &Client) -> anyhow::Result<()> {
    let options = Options::new().set("v", args.volumes);
    let _ = client
        .container_handle(args.container.as_str())
        .delete(&options)?;
    println!("{}", args.container);
    Ok(())
}
