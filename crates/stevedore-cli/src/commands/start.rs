//! `stv start`: start a created container.

use clap::Args;
use stevedore_client::{Client, Options};

use super::create::bind_mounts;

/// Arguments for the `start` command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Container ID or name.
    pub container: String,

    /// Bind mount to apply (repeatable); mounts given at create time are
    /// not remembered across invocations.
    #[arg(short, long = "volume", value_name = "SRC:DST[:MODE]")]
    pub volumes: Vec<String>,

    /// Run the container in privileged mode.
    #[arg(long)]
    pub privileged: bool,
}

/// Executes the `start` command.
///
/// # Errors
///
/// Returns an error if a volume is malformed or the daemon cannot be reached.
pub fn execute(args: &StartArgs, client: &Client) -> anyhow::Result<()> {
    let mut options = Options::new();
    if let Some(mounts) = bind_mounts(&args.volumes)? {
        let _ = options.insert("bind_mounts", mounts);
    }
    if args.privileged {
        let _ = options.insert("privileged", true);
    }

    let mut container = client.container_handle(args.container.as_str());
    let _ = container.start(&options)?;
    println!("{}", args.container);

    Ok(())
}
