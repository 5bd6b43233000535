//! `stv inspect`: show the low-level details of a container.

use clap::Args;
use stevedore_client::Client;

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container ID or name.
    pub container: String,

    /// Print a one-line summary instead of the full document.
    #[arg(short, long)]
    pub summary: bool,
}

/// Executes the `inspect` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be reached or the document is
/// malformed.
pub fn execute(args: &InspectArgs, client: &Client) -> anyhow::Result<()> {
    let mut container = client.container_handle(args.container.as_str());
    let details = container.info()?;

    if args.summary {
        let state = if details.is_running() { "running" } else { "stopped" };
        println!(
            "{} {} {} {}",
            details.id.short(),
            state,
            details.created.to_rfc3339(),
            details.command()
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&details.document)?);
    }

    Ok(())
}
