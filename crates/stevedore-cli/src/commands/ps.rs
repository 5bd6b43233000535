//! `stv ps`: list containers.

use clap::Args;
use stevedore_client::{Client, Options};

use crate::output::{format_created, format_size, truncate};

/// Arguments for the `ps` command.
#[derive(Args, Debug)]
pub struct PsArgs {
    /// Show all containers (including stopped).
    #[arg(short, long)]
    pub all: bool,

    /// Show only the N most recently created containers.
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Display container filesystem sizes.
    #[arg(short, long)]
    pub size: bool,

    /// Only display container IDs.
    #[arg(short, long)]
    pub quiet: bool,
}

impl PsArgs {
    fn options(&self) -> Options {
        let mut options = Options::new().set("all", self.all).set("size", self.size);
        if let Some(limit) = self.limit {
            let _ = options.insert("limit", limit);
        }
        options
    }
}

/// Executes the `ps` command.
///
/// # Errors
///
/// Returns an error if the daemon cannot be queried.
pub fn execute(args: &PsArgs, client: &Client) -> anyhow::Result<()> {
    let containers = client.containers(&args.options())?;

    if args.quiet {
        for c in &containers {
            println!("{}", c.id().short());
        }
        return Ok(());
    }

    if containers.is_empty() {
        println!("No containers found.");
        return Ok(());
    }

    print!(
        "{:<14} {:<20} {:<24} {:<16} {:<20}",
        "CONTAINER ID", "IMAGE", "COMMAND", "CREATED", "STATUS"
    );
    if args.size {
        print!(" {:<12}", "SIZE");
    }
    println!();

    for c in &containers {
        print!(
            "{:<14} {:<20} {:<24} {:<16} {:<20}",
            c.id().short(),
            truncate(c.image.as_deref().unwrap_or("-"), 20),
            truncate(c.command.as_deref().unwrap_or("-"), 24),
            format_created(c.created),
            c.status.as_deref().unwrap_or("-"),
        );
        if args.size {
            print!(" {:<12}", format_size(c.size_rw));
        }
        println!();
    }

    Ok(())
}
