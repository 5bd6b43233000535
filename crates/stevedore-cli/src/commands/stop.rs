//! `stv stop` and `stv restart`: stop or restart a container.

use clap::Args;
use stevedore_client::{Client, Options};

/// Arguments for the `stop` and `restart` commands.
#[derive(Args, Debug)]
pub struct StopArgs {
    /// Container ID or name.
    pub container: String,

    /// Seconds to wait for the container to stop before killing it.
    #[arg(short, long)]
    pub time: Option<u32>,
}

impl StopArgs {
    fn options(&self) -> Options {
        self.time
            .map_or_else(Options::new, |t| Options::new().set("t", t))
    }
}

/// Executes the `stop` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached.
pub fn execute(args: &StopArgs, client: &Client) -> anyhow::Result<()> {
    let _ = client
        .container_handle(args.container.as_str())
        .stop(&args.options())?;
    println!("{}", args.container);
    Ok(())
}

/// Executes the `restart` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached.
pub fn restart(args: &StopArgs, client: &Client) -> anyhow::Result<()> {
    let _ = client
        .container_handle(args.container.as_str())
        .restart(&args.options())?;
    println!("{}", args.container);
    Ok(())
}
